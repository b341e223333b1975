// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The FSM execution engine: state storage, event dispatch, notifications.
//!
//! ## Dispatch model
//!
//! [`Fsm::process`] scans the current state's outgoing transitions in
//! insertion order and fires the first one whose acceptance test and guard
//! both pass. At most one transition fires per dispatched event; an event no
//! transition accepts leaves the machine untouched, so feeding unrelated
//! events is always safe.
//!
//! ## Notifications
//!
//! Two independent channels observe the machine:
//!
//! - [`FsmHandler`] receives the semantic lifecycle: *starts* when the
//!   starting state is entered (by default, when the machine first leaves
//!   its initial state), *updates* on progress through standard states,
//!   *stops* on terminal entry, *cancels* on cancelling entry or an explicit
//!   [`Fsm::cancel`], and *error* for failures inside actions or callbacks.
//! - [`Fsm::observe_changes`] receives every raw cursor movement as a
//!   [`StateChange`], including the synthetic move back to the initial state
//!   after an automatic reinitialisation. The interaction runtime consumes
//!   this stream to recompute event listeners.
//!
//! ## Fail-forward
//!
//! A failing transition action or handler callback never unwinds into the
//! caller of `process`. The error is reported through the handlers' error
//! channel, the cursor still moves, and the event's remaining notifications
//! are still delivered, so the machine cannot get stuck mid-gesture.

use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;

use crate::handler::{FsmHandler, HandlerError};
use crate::state::{State, StateId, StateKind};
use crate::timeout::{TimeoutSpec, TimeoutToken, TimerHost};
use crate::transition::{ActionError, Transition};

/// Error raised while assembling an FSM's structure.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FsmBuildError {
    /// The state id does not belong to this FSM.
    UnknownState(StateId),
    /// Terminal and cancelling states cannot have outgoing transitions.
    AbsorbingSource(StateId),
    /// The initial state cannot be the target of a transition.
    InitialTarget,
}

impl fmt::Display for FsmBuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownState(id) => write!(f, "state {id:?} does not belong to this FSM"),
            Self::AbsorbingSource(id) => {
                write!(f, "state {id:?} is absorbing and cannot have outgoing transitions")
            }
            Self::InitialTarget => f.write_str("the initial state cannot be a transition target"),
        }
    }
}

impl core::error::Error for FsmBuildError {}

/// Error surfaced through [`FsmHandler::fsm_error`] during dispatch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FsmError {
    /// A transition action failed while leaving `state`.
    Action {
        /// Name of the state the transition was leaving.
        state: String,
        /// The underlying action failure.
        source: ActionError,
    },
    /// A handler callback failed during the named notification.
    Handler {
        /// Which notification was being delivered.
        notification: &'static str,
        /// The underlying callback failure.
        source: HandlerError,
    },
    /// A timeout callback arrived for `state`, which has no timeout
    /// configured. Indicates a host/token mismatch.
    Timer {
        /// Name of the current state when the callback arrived.
        state: String,
    },
}

impl fmt::Display for FsmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Action { state, source } => {
                write!(f, "action failed leaving state {state:?}: {source}")
            }
            Self::Handler { notification, source } => {
                write!(f, "handler failed during {notification}: {source}")
            }
            Self::Timer { state } => {
                write!(f, "timeout fired in state {state:?} which has no timeout")
            }
        }
    }
}

impl core::error::Error for FsmError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Action { source, .. } => Some(source),
            Self::Handler { source, .. } => Some(source),
            Self::Timer { .. } => None,
        }
    }
}

/// One raw cursor movement, as delivered to change observers.
///
/// Carries the accepted-event-label sets of both endpoint states so the
/// single internal consumer (the interaction runtime) can recompute its
/// listener registrations without reaching back into the FSM.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StateChange<L> {
    /// The state the cursor left.
    pub previous: StateId,
    /// The state the cursor entered.
    pub next: StateId,
    /// Accepted event labels of the previous state.
    pub previous_labels: Vec<L>,
    /// Accepted event labels of the new state.
    pub next_labels: Vec<L>,
}

impl<L> StateChange<L> {
    /// Whether this change put the machine back in its initial state.
    #[must_use]
    pub fn at_initial(&self) -> bool {
        self.next == StateId::INITIAL
    }
}

type ChangeObserver<L> = Box<dyn FnMut(&StateChange<L>)>;
type Hook = Box<dyn FnMut()>;

/// A finite-state machine recognizing one user interaction.
///
/// The machine owns its states and transitions in an arena; [`StateId`]
/// handles index into it. It is single-threaded: all mutation happens
/// synchronously inside [`Fsm::process`] (or the timer re-entry point
/// [`Fsm::on_timeout`]), and control returns to the caller as soon as the
/// dispatch completes.
pub struct Fsm<E, L> {
    states: Vec<State<E, L>>,
    current: StateId,
    starting: StateId,
    started: bool,
    handlers: Vec<Rc<RefCell<dyn FsmHandler>>>,
    observers: Vec<ChangeObserver<L>>,
    reinit_hooks: Vec<Hook>,
    full_reinit_hooks: Vec<Hook>,
    timer: Option<Rc<RefCell<dyn TimerHost>>>,
    timer_generation: u64,
    pending_timeout: Option<TimeoutToken>,
    logging: bool,
}

impl<E, L: Copy + Eq> Fsm<E, L> {
    /// Creates an FSM containing only its initial state.
    #[must_use]
    pub fn new() -> Self {
        let mut states = Vec::new();
        states.push(State::new("init", StateKind::Initial));
        Self {
            states,
            current: StateId::INITIAL,
            starting: StateId::INITIAL,
            started: false,
            handlers: Vec::new(),
            observers: Vec::new(),
            reinit_hooks: Vec::new(),
            full_reinit_hooks: Vec::new(),
            timer: None,
            timer_generation: 0,
            pending_timeout: None,
            logging: false,
        }
    }

    fn add_state(&mut self, name: impl Into<Cow<'static, str>>, kind: StateKind) -> StateId {
        debug_assert!(
            u32::try_from(self.states.len()).is_ok(),
            "state arena exceeds u32 indexing"
        );
        #[expect(clippy::cast_possible_truncation, reason = "guarded by the debug_assert above")]
        let id = StateId::new(self.states.len() as u32);
        self.states.push(State::new(name, kind));
        id
    }

    /// Adds an intermediate state.
    pub fn add_standard_state(&mut self, name: impl Into<Cow<'static, str>>) -> StateId {
        self.add_state(name, StateKind::Standard)
    }

    /// Adds a terminal state (recognition success).
    pub fn add_terminal_state(&mut self, name: impl Into<Cow<'static, str>>) -> StateId {
        self.add_state(name, StateKind::Terminal)
    }

    /// Adds a cancelling state (recognition aborted).
    pub fn add_cancelling_state(&mut self, name: impl Into<Cow<'static, str>>) -> StateId {
        self.add_state(name, StateKind::Cancelling)
    }

    /// Appends `transition` to `source`'s outgoing list.
    ///
    /// Insertion order defines firing priority; duplicates are not detected.
    pub fn add_transition(
        &mut self,
        source: StateId,
        transition: Transition<E, L>,
    ) -> Result<(), FsmBuildError> {
        if transition.target() == StateId::INITIAL {
            return Err(FsmBuildError::InitialTarget);
        }
        if self.state(transition.target()).is_none() {
            return Err(FsmBuildError::UnknownState(transition.target()));
        }
        let Some(src) = self.states.get_mut(source.idx()) else {
            return Err(FsmBuildError::UnknownState(source));
        };
        if src.kind().is_absorbing() {
            return Err(FsmBuildError::AbsorbingSource(source));
        }
        src.push_transition(transition);
        Ok(())
    }

    /// Like [`Fsm::add_transition`], for statically known machine shapes.
    ///
    /// Gesture definitions build their machines from constants; a malformed
    /// structure there is a programmer error, surfaced immediately.
    ///
    /// # Panics
    ///
    /// Panics if the transition violates the machine structure (absorbing
    /// source, initial-state target, unknown id). Use
    /// [`Fsm::add_transition`] when building machines dynamically.
    #[track_caller]
    pub fn transition(&mut self, source: StateId, transition: Transition<E, L>) {
        if let Err(err) = self.add_transition(source, transition) {
            panic!("malformed FSM structure: {err}");
        }
    }

    /// Designates the state whose entry notifies *starts*.
    ///
    /// Defaults to the initial state, in which case *starts* fires when the
    /// machine first leaves it. Gestures that must not start on their first
    /// transition (a swipe starts on its first valid move, not on the touch
    /// press) designate a later state.
    pub fn set_starting_state(&mut self, state: StateId) {
        debug_assert!(self.state(state).is_some(), "starting state must exist");
        if self.state(state).is_some() {
            self.starting = state;
        }
    }

    /// Associates a timeout with `state`.
    ///
    /// On entry a timer of `duration_ms` is scheduled through the installed
    /// [`TimerHost`]; if it elapses before any transition fires, the event
    /// built by `make_event` is dispatched through [`Fsm::process`].
    pub fn set_timeout(
        &mut self,
        state: StateId,
        duration_ms: u64,
        make_event: impl Fn() -> E + 'static,
    ) {
        debug_assert!(self.state(state).is_some(), "timed state must exist");
        debug_assert!(
            self.state(state).is_none_or(|s| !s.kind().is_absorbing()),
            "absorbing states cannot be timed"
        );
        if let Some(s) = self.states.get_mut(state.idx()) {
            if !s.kind().is_absorbing() {
                s.set_timeout(TimeoutSpec::new(duration_ms, make_event));
            }
        }
    }

    /// Installs the host timer capability used for timeout transitions.
    pub fn set_timer_host(&mut self, host: Rc<RefCell<dyn TimerHost>>) {
        self.timer = Some(host);
    }

    /// Registers a semantic lifecycle handler.
    pub fn add_handler(&mut self, handler: Rc<RefCell<dyn FsmHandler>>) {
        self.handlers.push(handler);
    }

    /// Subscribes to the raw state-change stream.
    ///
    /// Every actual cursor movement is reported, including the synthetic
    /// move back to initial after an automatic reinitialisation.
    pub fn observe_changes(&mut self, observer: impl FnMut(&StateChange<L>) + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Registers a hook run on every [`Fsm::reinit`] (manual or automatic).
    pub fn add_reinit_hook(&mut self, hook: impl FnMut() + 'static) {
        self.reinit_hooks.push(Box::new(hook));
    }

    /// Registers a hook run only on [`Fsm::full_reinit`].
    pub fn add_full_reinit_hook(&mut self, hook: impl FnMut() + 'static) {
        self.full_reinit_hooks.push(Box::new(hook));
    }

    /// The state the cursor is on.
    #[must_use]
    pub fn current_state(&self) -> StateId {
        self.current
    }

    /// The designated starting state.
    #[must_use]
    pub fn starting_state(&self) -> StateId {
        self.starting
    }

    /// Whether a recognition cycle is underway (*starts* notified, no
    /// *stops*/*cancels* yet).
    #[must_use]
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Number of states, the initial state included.
    #[must_use]
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Looks up a state by id.
    #[must_use]
    pub fn state(&self, id: StateId) -> Option<&State<E, L>> {
        self.states.get(id.idx())
    }

    /// Outgoing transitions of `state`, in insertion order.
    ///
    /// Returns an empty slice for unknown ids and absorbing states.
    #[must_use]
    pub fn transitions(&self, state: StateId) -> &[Transition<E, L>] {
        self.state(state).map_or(&[], State::transitions)
    }

    /// Deduplicated accepted-event labels of `state`, in first-seen order.
    ///
    /// This is the union of the label sets of the state's outgoing
    /// transitions: the events the machine could possibly consume there.
    #[must_use]
    pub fn accepted_labels(&self, state: StateId) -> Vec<L> {
        let mut labels = Vec::new();
        for tr in self.transitions(state) {
            for &label in tr.labels() {
                if !labels.contains(&label) {
                    labels.push(label);
                }
            }
        }
        labels
    }

    /// Toggles trace logging of transitions and notifications.
    pub fn set_logging(&mut self, logging: bool) {
        self.logging = logging;
    }

    /// Whether trace logging is enabled.
    #[must_use]
    pub fn logging(&self) -> bool {
        self.logging
    }

    fn state_name(&self, id: StateId) -> &str {
        self.state(id).map_or("<unknown>", State::name)
    }

    /// Dispatches `event`, firing the first matching transition of the
    /// current state.
    ///
    /// Returns `true` if a transition fired. Events nothing accepts return
    /// `false` and leave the machine untouched, so calling this with
    /// unrelated events is a no-op.
    pub fn process(&mut self, event: &E) -> bool {
        let source = self.current;
        let fired = self.states[source.idx()]
            .transitions()
            .iter()
            .enumerate()
            .find(|(_, tr)| tr.accepts(event))
            .map(|(index, tr)| (index, tr.target()));
        let Some((index, target)) = fired else {
            return false;
        };

        if self.logging {
            log::trace!(
                "fsm: firing {} -> {}",
                self.state_name(source),
                self.state_name(target),
            );
        }

        self.cancel_pending_timeout();

        let action_result = self.states[source.idx()].transitions_mut()[index].fire_action(event);
        if let Err(source_err) = action_result {
            let error = FsmError::Action {
                state: String::from(self.state_name(source)),
                source: source_err,
            };
            self.notify_error(&error);
        }

        // Default starting state: the cycle begins on the first departure
        // from the initial state.
        if !self.started && source == StateId::INITIAL && self.starting == StateId::INITIAL {
            self.on_starting();
        }

        self.enter(source, target);
        true
    }

    /// Timer re-entry point, called by the host on expiry.
    ///
    /// Stale tokens (the machine changed state, reinitialised, or was
    /// uninstalled since scheduling) are ignored. A valid token synthesizes
    /// the timed state's event and routes it through [`Fsm::process`].
    pub fn on_timeout(&mut self, token: TimeoutToken) {
        if self.pending_timeout != Some(token) {
            return;
        }
        self.pending_timeout = None;
        let event = match self.states[self.current.idx()].timeout() {
            Some(spec) => spec.synthesize(),
            None => {
                let error = FsmError::Timer {
                    state: String::from(self.state_name(self.current)),
                };
                self.notify_error(&error);
                return;
            }
        };
        if self.logging {
            log::trace!("fsm: timeout elapsed in {}", self.state_name(self.current));
        }
        self.process(&event);
    }

    /// Explicitly aborts the recognition in progress.
    ///
    /// Notifies *cancels* if a cycle had started, then reinitialises.
    /// Synchronous and immediate; a no-op on an idle machine.
    pub fn cancel(&mut self) {
        if self.started {
            if self.logging {
                log::trace!("fsm: cancelling");
            }
            self.notify("cancels", |h| h.fsm_cancels());
        }
        self.reinit();
    }

    /// Returns the cursor to the initial state without destroying structure.
    ///
    /// Clears the started flag, invalidates any pending timeout, runs the
    /// reinit hooks, and emits the resulting state change (if the cursor
    /// actually moved) on the observation stream.
    pub fn reinit(&mut self) {
        self.cancel_pending_timeout();
        let previous = self.current;
        self.current = StateId::INITIAL;
        self.started = false;
        for hook in &mut self.reinit_hooks {
            hook();
        }
        if previous != StateId::INITIAL {
            if self.logging {
                log::trace!("fsm: reinit from {}", self.state_name(previous));
            }
            self.emit_change(previous, StateId::INITIAL);
        }
    }

    /// [`Fsm::reinit`] plus the full-reinit hooks, which clear accumulated
    /// interaction data (tracked touch ids, key-press sets, payloads).
    ///
    /// Used when an interaction is deactivated or uninstalled mid-gesture.
    pub fn full_reinit(&mut self) {
        self.reinit();
        for hook in &mut self.full_reinit_hooks {
            hook();
        }
    }

    /// Releases every subscription: handlers, change observers, hooks, and
    /// any pending timer. The structure itself is kept but the machine must
    /// not be reused afterward.
    pub fn uninstall(&mut self) {
        self.cancel_pending_timeout();
        self.handlers.clear();
        self.observers.clear();
        self.reinit_hooks.clear();
        self.full_reinit_hooks.clear();
        self.timer = None;
    }

    fn enter(&mut self, previous: StateId, target: StateId) {
        self.current = target;
        self.emit_change(previous, target);
        match self.states[target.idx()].kind() {
            // Unreachable while running: the initial state is never a
            // transition target. Reinit moves the cursor directly.
            StateKind::Initial => {}
            StateKind::Standard => {
                if !self.started && target == self.starting {
                    self.on_starting();
                }
                // A started machine entering (or re-entering) a standard
                // state is progressing: stream an update, on the entry that
                // started the cycle too.
                if self.started {
                    if self.logging {
                        log::trace!("fsm: updating in {}", self.state_name(target));
                    }
                    self.notify("updates", |h| h.fsm_updates());
                }
                self.arm_timeout(target);
            }
            StateKind::Terminal => {
                if !self.started && target == self.starting {
                    self.on_starting();
                }
                if self.started {
                    if self.logging {
                        log::trace!("fsm: stopping in {}", self.state_name(target));
                    }
                    self.notify("stops", |h| h.fsm_stops());
                }
                self.reinit();
            }
            StateKind::Cancelling => {
                if self.started {
                    if self.logging {
                        log::trace!("fsm: cancelling in {}", self.state_name(target));
                    }
                    self.notify("cancels", |h| h.fsm_cancels());
                }
                self.reinit();
            }
        }
    }

    fn on_starting(&mut self) {
        self.started = true;
        if self.logging {
            log::trace!("fsm: starting");
        }
        self.notify("starts", |h| h.fsm_starts());
    }

    fn notify(
        &mut self,
        notification: &'static str,
        call: impl Fn(&mut dyn FsmHandler) -> Result<(), HandlerError>,
    ) {
        let handlers: Vec<_> = self.handlers.clone();
        for handler in handlers {
            let result = call(&mut *handler.borrow_mut());
            if let Err(source) = result {
                let error = FsmError::Handler { notification, source };
                self.notify_error(&error);
            }
        }
    }

    fn notify_error(&mut self, error: &FsmError) {
        if self.logging {
            log::trace!("fsm: error: {error}");
        }
        let handlers: Vec<_> = self.handlers.clone();
        for handler in handlers {
            handler.borrow_mut().fsm_error(error);
        }
    }

    fn emit_change(&mut self, previous: StateId, next: StateId) {
        if self.observers.is_empty() {
            return;
        }
        let change = StateChange {
            previous,
            next,
            previous_labels: self.accepted_labels(previous),
            next_labels: self.accepted_labels(next),
        };
        for observer in &mut self.observers {
            observer(&change);
        }
    }

    fn arm_timeout(&mut self, state: StateId) {
        let Some(duration_ms) = self.states[state.idx()].timeout().map(TimeoutSpec::duration_ms)
        else {
            return;
        };
        let Some(timer) = self.timer.clone() else {
            return;
        };
        self.timer_generation += 1;
        let token = TimeoutToken {
            generation: self.timer_generation,
        };
        self.pending_timeout = Some(token);
        if self.logging {
            log::trace!(
                "fsm: arming {duration_ms}ms timeout in {}",
                self.state_name(state),
            );
        }
        timer.borrow_mut().schedule(token, duration_ms);
    }

    fn cancel_pending_timeout(&mut self) {
        // Bump the generation so any callback already in flight goes stale.
        self.timer_generation += 1;
        if let Some(token) = self.pending_timeout.take() {
            if let Some(timer) = self.timer.clone() {
                timer.borrow_mut().cancel(token);
            }
        }
    }
}

impl<E, L: Copy + Eq> Default for Fsm<E, L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E, L> fmt::Debug for Fsm<E, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fsm")
            .field("states", &self.states.len())
            .field("current", &self.current)
            .field("started", &self.started)
            .field("handlers", &self.handlers.len())
            .field("observers", &self.observers.len())
            .field("pending_timeout", &self.pending_timeout)
            .finish()
    }
}
