// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! FSM edges: event-triggered, guarded transitions with optional actions.
//!
//! A transition carries three layered predicates/effects:
//!
//! - `accept`: a pure shape test ("is this a touch-move event"). It must not
//!   inspect accumulated interaction data.
//! - `guard`: an optional richer predicate over an accepted event (same touch
//!   id, modifier held, distance threshold met). Defaults to true.
//! - `action`: an optional side effect run when the transition fires,
//!   typically copying event fields into the interaction's data payload.
//!
//! The set of event-type labels a transition subscribes to is static and
//! independent of the current data. It is used purely for listener
//! bookkeeping by the interaction runtime; acceptance can still reject an
//! event carrying one of these labels.

use alloc::borrow::Cow;
use alloc::boxed::Box;
use core::fmt;

use smallvec::SmallVec;

use crate::state::StateId;

/// Error carried out of a failed transition action.
///
/// Action failures do not unwind into the caller of
/// [`Fsm::process`](crate::Fsm::process); they are surfaced through the
/// handlers' error channel while the transition is still considered fired.
#[derive(Clone, PartialEq, Eq)]
pub struct ActionError {
    message: Cow<'static, str>,
}

impl ActionError {
    /// Creates an action error with the given message.
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

impl fmt::Debug for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ActionError({:?})", self.message)
    }
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "transition action failed: {}", self.message)
    }
}

impl core::error::Error for ActionError {}

type AcceptFn<E> = Box<dyn Fn(&E) -> bool>;
type GuardFn<E> = Box<dyn Fn(&E) -> bool>;
type ActionFn<E> = Box<dyn FnMut(&E) -> Result<(), ActionError>>;

/// A directed, guarded edge between two FSM states.
///
/// The source state owns the transition in its outgoing list; the target is
/// referenced by [`StateId`]. Within a state, transitions fire with
/// first-match-wins priority in insertion order.
pub struct Transition<E, L> {
    target: StateId,
    labels: SmallVec<[L; 2]>,
    accept: AcceptFn<E>,
    guard: Option<GuardFn<E>>,
    action: Option<ActionFn<E>>,
}

impl<E, L> Transition<E, L> {
    /// Creates a transition to `target`.
    ///
    /// `labels` is the static set of event-type labels this transition
    /// subscribes to; `accept` is the pure shape test run per event.
    pub fn new(
        target: StateId,
        labels: impl IntoIterator<Item = L>,
        accept: impl Fn(&E) -> bool + 'static,
    ) -> Self {
        Self {
            target,
            labels: labels.into_iter().collect(),
            accept: Box::new(accept),
            guard: None,
            action: None,
        }
    }

    /// Attaches a guard predicate, replacing any previous one.
    #[must_use]
    pub fn with_guard(mut self, guard: impl Fn(&E) -> bool + 'static) -> Self {
        self.guard = Some(Box::new(guard));
        self
    }

    /// Attaches a fallible action, replacing any previous one.
    #[must_use]
    pub fn with_action(
        mut self,
        action: impl FnMut(&E) -> Result<(), ActionError> + 'static,
    ) -> Self {
        self.action = Some(Box::new(action));
        self
    }

    /// Attaches an infallible action, replacing any previous one.
    #[must_use]
    pub fn on_fire(mut self, mut action: impl FnMut(&E) + 'static) -> Self {
        self.action = Some(Box::new(move |event| {
            action(event);
            Ok(())
        }));
        self
    }

    /// The state this transition leads to.
    #[must_use]
    pub fn target(&self) -> StateId {
        self.target
    }

    /// The static event-type labels this transition subscribes to.
    #[must_use]
    pub fn labels(&self) -> &[L] {
        &self.labels
    }

    /// Whether both the acceptance test and the guard pass for `event`.
    #[must_use]
    pub fn accepts(&self, event: &E) -> bool {
        (self.accept)(event) && self.guard.as_ref().is_none_or(|guard| guard(event))
    }

    pub(crate) fn fire_action(&mut self, event: &E) -> Result<(), ActionError> {
        match &mut self.action {
            Some(action) => action(event),
            None => Ok(()),
        }
    }
}

impl<E, L: fmt::Debug> fmt::Debug for Transition<E, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("target", &self.target)
            .field("labels", &self.labels)
            .field("guarded", &self.guard.is_some())
            .field("action", &self.action.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_requires_shape_test() {
        let tr: Transition<u32, u8> = Transition::new(StateId::new(1), [0_u8], |e| *e > 10);
        assert!(tr.accepts(&11));
        assert!(!tr.accepts(&10));
    }

    #[test]
    fn guard_defaults_to_true_and_layers_on_accept() {
        let plain: Transition<u32, u8> = Transition::new(StateId::new(1), [0_u8], |_| true);
        assert!(plain.accepts(&0));

        let guarded = Transition::new(StateId::new(1), [0_u8], |_: &u32| true)
            .with_guard(|e: &u32| e % 2 == 0);
        assert!(guarded.accepts(&4));
        assert!(!guarded.accepts(&5));
    }

    #[test]
    fn guard_not_consulted_when_accept_rejects() {
        // The guard would panic on odd input; accept must short-circuit first.
        let tr = Transition::new(StateId::new(1), [0_u8], |e: &u32| *e % 2 == 0)
            .with_guard(|e: &u32| {
                assert!(e % 2 == 0, "guard ran on a rejected event");
                true
            });
        assert!(!tr.accepts(&3));
    }

    #[test]
    fn fire_action_reports_failure() {
        let mut tr = Transition::new(StateId::new(1), [0_u8], |_: &u32| true)
            .with_action(|_: &u32| Err(ActionError::new("boom")));
        let err = tr.fire_action(&1).unwrap_err();
        assert_eq!(err.message(), "boom");
    }

    #[test]
    fn fire_action_without_action_is_ok() {
        let mut tr: Transition<u32, u8> = Transition::new(StateId::new(1), [0_u8], |_| true);
        assert!(tr.fire_action(&1).is_ok());
    }
}
