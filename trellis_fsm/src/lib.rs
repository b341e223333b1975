// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis FSM: finite-state machines for UI interaction recognition.
//!
//! This crate is the execution core of Trellis. A user interaction (a click,
//! a key combo, a swipe) is declared as an explicit finite-state machine over
//! raw input events: states model the stages of the gesture, transitions
//! carry an acceptance test, an optional guard, and an optional data-copying
//! action. The engine dispatches events with a first-match-wins rule and
//! reports the recognition lifecycle to registered handlers.
//!
//! ## Model
//!
//! - [`StateId`] / [`StateKind`] / [`State`]: arena-stored named nodes. Every
//!   machine has exactly one *initial* state; *terminal* and *cancelling*
//!   states are absorbing and mark the outcome of a recognition cycle.
//! - [`Transition`]: a guarded edge between two states, subscribing to a
//!   static set of event-type labels used for listener bookkeeping.
//! - [`Fsm`]: the machine itself. [`Fsm::process`] fires at most one
//!   transition per event; reaching a terminal or cancelling state notifies
//!   the outcome and automatically returns the cursor to the initial state,
//!   so one instance recognizes any number of consecutive occurrences.
//!
//! ## Quick start
//!
//! ```
//! use trellis_fsm::{Fsm, StateId, Transition};
//!
//! #[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
//! enum Label { Down, Up }
//!
//! enum Event { Down, Up }
//!
//! // A press-release recognizer: init -down-> pressed -up-> released.
//! let mut fsm: Fsm<Event, Label> = Fsm::new();
//! let pressed = fsm.add_standard_state("pressed");
//! let released = fsm.add_terminal_state("released");
//! fsm.add_transition(
//!     StateId::INITIAL,
//!     Transition::new(pressed, [Label::Down], |e: &Event| matches!(e, Event::Down)),
//! )
//! .unwrap();
//! fsm.add_transition(
//!     pressed,
//!     Transition::new(released, [Label::Up], |e: &Event| matches!(e, Event::Up)),
//! )
//! .unwrap();
//!
//! assert!(fsm.process(&Event::Down));
//! assert!(fsm.is_started());
//! assert!(fsm.process(&Event::Up));
//! // Terminal reached: the machine reported a stop and is ready again.
//! assert_eq!(fsm.current_state(), StateId::INITIAL);
//! ```
//!
//! ## Notifications
//!
//! [`FsmHandler`] carries the semantic lifecycle (*starts*, *updates*,
//! *stops*, *cancels*, *error*); [`Fsm::observe_changes`] carries the raw
//! `(previous, next)` cursor stream the interaction runtime uses to keep
//! event-listener registrations in sync with the current state. The two
//! channels are independent by design.
//!
//! ## Timeouts
//!
//! States may be timed with [`Fsm::set_timeout`]. Scheduling is delegated to
//! a host-supplied [`TimerHost`]; expiry re-enters the machine through
//! [`Fsm::on_timeout`] and is dispatched like any other event. Tokens are
//! generation-stamped so a late host callback after a reinitialisation or
//! state change is ignored.
//!
//! ## Concurrency
//!
//! Everything is single-threaded and synchronous: all mutation happens
//! inside the call stack of a dispatched event, and control returns to the
//! caller as soon as `process` does. Timer callbacks are just another entry
//! point on the same thread.
//!
//! This crate is `no_std` compatible (with `alloc`).

#![no_std]

extern crate alloc;

mod engine;
mod handler;
mod state;
mod timeout;
mod transition;

pub use engine::{Fsm, FsmBuildError, FsmError, StateChange};
pub use handler::{FsmHandler, HandlerError};
pub use state::{State, StateId, StateKind};
pub use timeout::{TimeoutToken, TimerHost};
pub use transition::{ActionError, Transition};
