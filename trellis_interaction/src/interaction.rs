// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The interaction runtime: one FSM, one data payload, live listener
//! bookkeeping.
//!
//! An [`Interaction`] bridges an abstract recognizer to real input sources.
//! It owns its FSM exclusively, keeps the accumulated gesture data in a
//! shared handle (transition actions and the binding layer both read it),
//! and subscribes to the FSM's state-change stream so that, at any instant,
//! the host listens only for the events the *current* state can consume.

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::{Ref, RefCell};
use core::fmt;
use core::hash::Hash;

use trellis_fsm::{Fsm, FsmHandler, StateId};

use crate::binder::EventBinder;
use crate::registry::ListenerRegistry;

/// Accumulated result of a gesture (points, key codes, touch ids).
///
/// Payloads are flushed on reinitialisation so one recognition cycle's data
/// never leaks into the next.
pub trait InteractionData {
    /// Resets the payload to its pristine state.
    fn flush(&mut self);
}

/// A user-interaction recognizer: an FSM paired with its data payload and a
/// dynamic set of listened-to nodes.
///
/// Type parameters: `D` the payload, `E` the raw event type, `L` the
/// event-type label, `N` the host's node key.
///
/// Constructed once per recognizer; nodes are registered and unregistered
/// dynamically. [`Interaction::uninstall`] releases everything; the instance
/// must not be used afterward.
pub struct Interaction<D, E, L, N>
where
    D: InteractionData,
{
    fsm: Fsm<E, L>,
    data: Rc<RefCell<D>>,
    registry: Rc<RefCell<ListenerRegistry<N, L>>>,
    activated: bool,
    logging: bool,
}

impl<D, E, L, N> Interaction<D, E, L, N>
where
    D: InteractionData + 'static,
    E: 'static,
    L: Copy + Eq + Hash + 'static,
    N: Copy + Eq + Hash + 'static,
{
    /// Wraps `fsm` and `data` into an activated interaction listening
    /// through `binder`.
    ///
    /// The FSM is subscribed to immediately: its state changes drive
    /// listener recomputation, and its reinitialisation flushes the payload
    /// (after stop/cancel handlers have read it). Machines with a single
    /// transition keep a fixed listener set for their whole life.
    pub fn new(
        mut fsm: Fsm<E, L>,
        data: Rc<RefCell<D>>,
        binder: Box<dyn EventBinder<N, L>>,
    ) -> Self {
        let fixed = fsm.state_count() == 2;
        let registry = Rc::new(RefCell::new(ListenerRegistry::new(
            binder,
            fsm.accepted_labels(StateId::INITIAL),
            fixed,
        )));

        let ledger = Rc::clone(&registry);
        fsm.observe_changes(move |change| {
            ledger
                .borrow_mut()
                .apply_labels(&change.next_labels, change.at_initial());
        });

        let payload = Rc::clone(&data);
        fsm.add_reinit_hook(move || payload.borrow_mut().flush());

        Self {
            fsm,
            data,
            registry,
            activated: true,
            logging: false,
        }
    }

    /// Forwards `event` to the FSM if the interaction is activated.
    ///
    /// Deactivated interactions drop events silently. Returns whether a
    /// transition fired.
    pub fn process_event(&mut self, event: &E) -> bool {
        if !self.activated {
            return false;
        }
        self.fsm.process(event)
    }

    /// Adds `nodes` to the listened-to set, subscribing them to the current
    /// state's accepted events immediately.
    pub fn register_to_nodes(&mut self, nodes: impl IntoIterator<Item = N>) {
        let mut registry = self.registry.borrow_mut();
        for node in nodes {
            registry.add_node(node);
        }
    }

    /// Removes `nodes` from the listened-to set, unsubscribing their current
    /// listeners.
    pub fn unregister_from_nodes(&mut self, nodes: impl IntoIterator<Item = N>) {
        let mut registry = self.registry.borrow_mut();
        for node in nodes {
            registry.remove_node(node);
        }
    }

    /// Adds `nodes` as target nodes.
    ///
    /// A target node (a drop zone, as opposed to the drag source) only
    /// receives listeners once the FSM has left its initial state, so it
    /// cannot react before the gesture is underway.
    pub fn register_to_target_nodes(&mut self, nodes: impl IntoIterator<Item = N>) {
        let mut registry = self.registry.borrow_mut();
        for node in nodes {
            registry.add_target_node(node);
        }
    }

    /// Removes `nodes` from the target set.
    pub fn unregister_from_target_nodes(&mut self, nodes: impl IntoIterator<Item = N>) {
        let mut registry = self.registry.borrow_mut();
        for node in nodes {
            registry.remove_target_node(node);
        }
    }

    /// Starts observing `container` for structural changes.
    ///
    /// The host reports mutations through
    /// [`Interaction::node_added_to_container`] and
    /// [`Interaction::node_removed_from_container`]; children of observed
    /// containers are listened to like ordinary registered nodes.
    pub fn observe_container(&mut self, container: N) {
        self.registry.borrow_mut().observe_container(container);
    }

    /// Host callback: `node` appeared under an observed `container`.
    pub fn node_added_to_container(&mut self, container: N, node: N) {
        self.registry.borrow_mut().container_child_added(container, node);
    }

    /// Host callback: `node` was removed from an observed `container`.
    pub fn node_removed_from_container(&mut self, container: N, node: N) {
        self.registry.borrow_mut().container_child_removed(container, node);
    }

    /// Registers a semantic lifecycle handler on the underlying FSM.
    pub fn add_handler(&mut self, handler: Rc<RefCell<dyn FsmHandler>>) {
        self.fsm.add_handler(handler);
    }

    /// Read access to the accumulated payload.
    ///
    /// # Panics
    ///
    /// Panics if called while a transition action is writing the payload,
    /// which cannot happen from host code respecting the single-threaded
    /// dispatch model.
    #[must_use]
    pub fn data(&self) -> Ref<'_, D> {
        self.data.borrow()
    }

    /// Shared handle to the payload, for transition actions and bindings.
    #[must_use]
    pub fn data_handle(&self) -> Rc<RefCell<D>> {
        Rc::clone(&self.data)
    }

    /// The underlying FSM.
    #[must_use]
    pub fn fsm(&self) -> &Fsm<E, L> {
        &self.fsm
    }

    /// Mutable access to the underlying FSM (timer host installation,
    /// additional observers).
    #[must_use]
    pub fn fsm_mut(&mut self) -> &mut Fsm<E, L> {
        &mut self.fsm
    }

    /// Whether the interaction currently processes events.
    #[must_use]
    pub fn is_activated(&self) -> bool {
        self.activated
    }

    /// Whether a recognition is underway (activated and out of the initial
    /// state).
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.activated && self.fsm.current_state() != StateId::INITIAL
    }

    /// Activates or deactivates the interaction.
    ///
    /// Deactivation is the coarse cancellation primitive: any in-flight
    /// recognition is abandoned through a full reinitialisation, and events
    /// are dropped until reactivation.
    pub fn set_activated(&mut self, activated: bool) {
        if self.logging {
            log::info!("interaction: activation set to {activated}");
        }
        self.activated = activated;
        if !activated {
            self.fsm.full_reinit();
        }
    }

    /// Returns the FSM to its initial state and flushes the payload.
    pub fn reinit(&mut self) {
        self.fsm.reinit();
    }

    /// [`Interaction::reinit`] plus clearing of transition-local
    /// accumulators (tracked touch ids, key-press sets).
    pub fn full_reinit(&mut self) {
        self.fsm.full_reinit();
    }

    /// Toggles trace logging here and in the FSM.
    pub fn set_logging(&mut self, logging: bool) {
        self.logging = logging;
        self.fsm.set_logging(logging);
        self.registry.borrow_mut().set_logging(logging);
    }

    /// Releases all subscriptions and listeners.
    ///
    /// Node registrations are cleared without unregistering each listener
    /// individually (the nodes are assumed gone), the in-flight recognition
    /// is abandoned, the FSM's observers and handlers are dropped, and the
    /// interaction is deactivated. The instance must not be reused; a second
    /// call is a programmer error with unspecified behavior.
    pub fn uninstall(&mut self) {
        if self.logging {
            log::info!("interaction: uninstalling");
        }
        // Forget registrations first so the reinit below does not touch
        // listeners one by one.
        self.registry.borrow_mut().clear();
        self.fsm.full_reinit();
        self.fsm.uninstall();
        self.activated = false;
    }
}

impl<D, E, L, N> fmt::Debug for Interaction<D, E, L, N>
where
    D: InteractionData,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interaction")
            .field("fsm", &self.fsm)
            .field("activated", &self.activated)
            .finish()
    }
}
