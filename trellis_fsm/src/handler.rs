// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Semantic lifecycle observers for an FSM.
//!
//! Handlers receive the recognition-level notifications (*starts*,
//! *updates*, *stops*, *cancels*) plus a generic error channel. They are
//! distinct from the [`StateChange`](crate::StateChange) observation stream,
//! which reports raw cursor movements and exists to drive listener
//! re-registration.
//!
//! Every callback defaults to a no-op so implementors override only what
//! they consume. A callback returning an error does not unwind into the
//! dispatch caller; the engine reports it through [`FsmHandler::fsm_error`]
//! on every handler and carries on.

use alloc::borrow::Cow;
use core::fmt;

use crate::engine::FsmError;

/// Error returned by a failing handler callback.
#[derive(Clone, PartialEq, Eq)]
pub struct HandlerError {
    message: Cow<'static, str>,
}

impl HandlerError {
    /// Creates a handler error with the given message.
    pub fn new(message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The failure message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Debug for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HandlerError({:?})", self.message)
    }
}

impl fmt::Display for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "handler callback failed: {}", self.message)
    }
}

impl core::error::Error for HandlerError {}

/// Observer of an FSM's recognition lifecycle.
///
/// Registered with [`Fsm::add_handler`](crate::Fsm::add_handler). For one
/// recognition cycle the engine guarantees: *starts* fires exactly once,
/// strictly before any *updates*, and the cycle closes with exactly one of
/// *stops* or *cancels* (each followed by an automatic reinitialisation).
pub trait FsmHandler {
    /// The FSM entered its starting state: a recognition cycle begins.
    fn fsm_starts(&mut self) -> Result<(), HandlerError> {
        Ok(())
    }

    /// The started FSM progressed through a non-absorbing state; continuous
    /// gestures use this to stream intermediate data.
    fn fsm_updates(&mut self) -> Result<(), HandlerError> {
        Ok(())
    }

    /// The FSM reached a terminal state: the interaction was recognized.
    fn fsm_stops(&mut self) -> Result<(), HandlerError> {
        Ok(())
    }

    /// The FSM reached a cancelling state or was cancelled explicitly.
    fn fsm_cancels(&mut self) -> Result<(), HandlerError> {
        Ok(())
    }

    /// An action or handler callback failed during dispatch.
    fn fsm_error(&mut self, _error: &FsmError) {}
}

