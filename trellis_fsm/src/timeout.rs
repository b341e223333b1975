// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Timeout-driven transitions via a host-supplied timer capability.
//!
//! The engine never waits. A state may be associated with a duration and an
//! event factory through [`Fsm::set_timeout`](crate::Fsm::set_timeout); when
//! such a state is entered, the engine asks the host's [`TimerHost`] to
//! schedule a callback carrying a [`TimeoutToken`]. On expiry the host calls
//! [`Fsm::on_timeout`](crate::Fsm::on_timeout); a still-valid token
//! synthesizes the timeout event and routes it through the ordinary
//! [`process`](crate::Fsm::process) path, so timeout handling follows the
//! same transition rules as any external event.
//!
//! Tokens are generation-stamped: leaving the timed state, reinitialising, or
//! uninstalling invalidates every outstanding token, so a late host callback
//! is ignored rather than corrupting the next recognition cycle.

use alloc::boxed::Box;

/// Opaque handle identifying one scheduled timeout.
///
/// Produced by the engine when it arms a timer; handed back by the host on
/// expiry. Stale tokens (from before a reinit or a state change) are ignored.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct TimeoutToken {
    pub(crate) generation: u64,
}

/// Host capability for scheduling and cancelling one-shot timers.
///
/// The framework is single-threaded and event-driven; wall-clock waiting is
/// the host environment's job. Implementations deliver expiry by calling
/// [`Fsm::on_timeout`](crate::Fsm::on_timeout) with the scheduled token, on
/// the same thread that drives event dispatch.
pub trait TimerHost {
    /// Schedules a one-shot timer firing after `duration_ms` milliseconds.
    fn schedule(&mut self, token: TimeoutToken, duration_ms: u64);

    /// Cancels a previously scheduled timer. Cancelling an already-fired or
    /// unknown token is a no-op.
    fn cancel(&mut self, token: TimeoutToken);
}

/// Per-state timeout configuration: a duration plus the factory synthesizing
/// the event fed back through `process` on expiry.
pub(crate) struct TimeoutSpec<E> {
    duration_ms: u64,
    make_event: Box<dyn Fn() -> E>,
}

impl<E> TimeoutSpec<E> {
    pub(crate) fn new(duration_ms: u64, make_event: impl Fn() -> E + 'static) -> Self {
        Self {
            duration_ms,
            make_event: Box::new(make_event),
        }
    }

    pub(crate) fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    pub(crate) fn synthesize(&self) -> E {
        (self.make_event)()
    }
}
