// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Gestures: a concrete input-event model and gesture library.
//!
//! This crate instantiates the generic Trellis engine for ordinary UI input:
//! [`UiEvent`] is the raw-event alphabet (mouse, touch, keyboard, scroll),
//! [`EventLabel`] the subscription vocabulary, and the gesture constructors
//! each compose an FSM with its data payload into a ready
//! [`Interaction`](trellis_interaction::Interaction).
//!
//! ## Gestures
//!
//! Each gesture illustrates one structural pattern of the engine:
//!
//! - [`mouse_down`]: a two-state machine (fixed listener set).
//! - [`keys_down`]: self-loop accumulation with a guarded completion.
//! - [`long_touch`]: a timeout transition driven by a host timer.
//! - [`swipe`]: a continuous gesture with a designated starting state,
//!   streaming updates, and threshold-guarded completion.
//!
//! New gestures follow the same recipe: build a [`trellis_fsm::Fsm`] over
//! [`UiEvent`], capture the payload handle in transition actions and guards,
//! and wrap the pair in an `Interaction`. No trait hierarchy is involved;
//! composition with closures is the whole mechanism.
//!
//! ## Example
//!
//! ```
//! use trellis_gestures::{keys_down, EventLabel, UiEvent, KeyPayload, Modifiers};
//! use trellis_interaction::EventBinder;
//!
//! struct NoBinder;
//! impl EventBinder<u32, EventLabel> for NoBinder {
//!     fn listen(&mut self, _: u32, _: EventLabel) {}
//!     fn unlisten(&mut self, _: u32, _: EventLabel) {}
//! }
//!
//! let mut combo = keys_down::<u32>(Box::new(NoBinder));
//! combo.process_event(&UiEvent::KeyDown(KeyPayload {
//!     code: "ControlLeft".into(),
//!     modifiers: Modifiers::empty(),
//!     target: 1,
//! }));
//! assert_eq!(combo.data().codes, ["ControlLeft"]);
//! ```
//!
//! This crate is `no_std` compatible (with `alloc`); enable the `libm`
//! feature instead of `std` for no_std numeric support in Kurbo.

#![no_std]

extern crate alloc;

mod data;
mod event;
mod keys;
mod long_touch;
mod press;
mod swipe;

use trellis_interaction::Interaction;

pub use data::{KeysData, PointData, SrcTgtData};
pub use event::{
    EventLabel, KeyPayload, Modifiers, MouseButton, MousePayload, ScrollPayload, TouchPayload,
    UiEvent,
};
pub use keys::keys_down;
pub use long_touch::long_touch;
pub use press::mouse_down;
pub use swipe::{swipe, SwipeConfig};

/// An interaction over the concrete [`UiEvent`] alphabet.
pub type UiInteraction<D, N> = Interaction<D, UiEvent<N>, EventLabel, N>;
