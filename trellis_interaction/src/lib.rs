// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Interaction: the runtime bridging FSMs to host input sources.
//!
//! An interaction pairs one [`trellis_fsm::Fsm`] with one accumulated data
//! payload and a set of live, host-addressed nodes. Its job is listener
//! hygiene: at any point in time, the host is subscribed to exactly the
//! event-type labels the FSM's *current* state can consume, per registered
//! node. Never a static superset, so idle interactions cost next to nothing
//! and unrelated events are never intercepted.
//!
//! ## Host capabilities
//!
//! The crate does not embed any environment API. The host supplies:
//!
//! - an [`EventBinder`]: `addEventListener`-style subscription keyed by a
//!   copyable node id and an event-type label;
//! - structural-change reports for observed containers (see
//!   [`Interaction::observe_container`]), the narrow equivalent of a DOM
//!   mutation observer;
//! - a [`trellis_fsm::TimerHost`] if the machine uses timeout transitions.
//!
//! ## Listener lifecycle
//!
//! On every FSM state change the runtime applies the symmetric difference
//! between the old and new accepted-label sets: labels no longer consumable
//! are unsubscribed, newly consumable ones subscribed, for ordinary nodes
//! and observed-container children. *Target* nodes (a drop zone, as opposed
//! to a drag source) receive listeners only once the machine has left its
//! initial state. Machines with a single transition skip recomputation
//! entirely; their listener set is fixed at registration.
//!
//! ## Activation
//!
//! [`Interaction::set_activated`] gates event processing;
//! deactivation abandons any in-flight recognition via a full
//! reinitialisation. [`Interaction::uninstall`] releases every subscription
//! for good.
//!
//! This crate is `no_std` compatible (with `alloc`).

#![no_std]

extern crate alloc;

mod binder;
mod interaction;
mod registry;

pub use binder::EventBinder;
pub use interaction::{Interaction, InteractionData};
