// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Listener ledger: which `(node, label)` pairs are currently subscribed.
//!
//! The ledger is driven by the FSM's state-change stream. On every cursor
//! movement it applies the symmetric difference between the old and new
//! accepted-label sets to each registered node, so active listeners always
//! mirror exactly what the current state can consume. Target nodes (drop
//! zones and the like) are additionally gated on the machine having left its
//! initial state.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;
use core::hash::Hash;

use hashbrown::{HashMap, HashSet};

use crate::binder::EventBinder;

pub(crate) struct ListenerRegistry<N, L> {
    binder: Box<dyn EventBinder<N, L>>,
    nodes: HashSet<N>,
    target_nodes: HashSet<N>,
    /// Observed containers and the children currently registered under them.
    containers: HashMap<N, HashSet<N>>,
    /// Labels applied to ordinary nodes and container children.
    current_labels: Vec<L>,
    /// Labels applied to target nodes (empty while in the initial state).
    target_labels: Vec<L>,
    /// Single-transition machines keep their listener set fixed for life.
    fixed: bool,
    logging: bool,
}

impl<N, L> ListenerRegistry<N, L>
where
    N: Copy + Eq + Hash,
    L: Copy + Eq,
{
    pub(crate) fn new(
        binder: Box<dyn EventBinder<N, L>>,
        initial_labels: Vec<L>,
        fixed: bool,
    ) -> Self {
        Self {
            binder,
            nodes: HashSet::new(),
            target_nodes: HashSet::new(),
            containers: HashMap::new(),
            current_labels: initial_labels,
            target_labels: Vec::new(),
            fixed,
            logging: false,
        }
    }

    pub(crate) fn set_logging(&mut self, logging: bool) {
        self.logging = logging;
    }

    /// Recomputes listeners after an FSM state change.
    ///
    /// `next_labels` is the accepted-label set of the state just entered;
    /// `at_initial` says whether that state is the initial one.
    pub(crate) fn apply_labels(&mut self, next_labels: &[L], at_initial: bool) {
        if self.fixed {
            return;
        }

        let removed: Vec<L> = self
            .current_labels
            .iter()
            .copied()
            .filter(|label| !next_labels.contains(label))
            .collect();
        let added: Vec<L> = next_labels
            .iter()
            .copied()
            .filter(|label| !self.current_labels.contains(label))
            .collect();

        if self.logging && (!removed.is_empty() || !added.is_empty()) {
            log::trace!(
                "interaction: listeners -{} +{} on {} node(s)",
                removed.len(),
                added.len(),
                self.nodes.len(),
            );
        }

        for &node in self.nodes.iter().chain(self.containers.values().flatten()) {
            for &label in &removed {
                self.binder.unlisten(node, label);
            }
            for &label in &added {
                self.binder.listen(node, label);
            }
        }
        self.current_labels.clear();
        self.current_labels.extend_from_slice(next_labels);

        // Target nodes hold no listeners while the machine is in its initial
        // state; once underway they mirror the current label set.
        let next_target: &[L] = if at_initial { &[] } else { next_labels };
        let target_removed: Vec<L> = self
            .target_labels
            .iter()
            .copied()
            .filter(|label| !next_target.contains(label))
            .collect();
        let target_added: Vec<L> = next_target
            .iter()
            .copied()
            .filter(|label| !self.target_labels.contains(label))
            .collect();
        for &node in &self.target_nodes {
            for &label in &target_removed {
                self.binder.unlisten(node, label);
            }
            for &label in &target_added {
                self.binder.listen(node, label);
            }
        }
        self.target_labels.clear();
        self.target_labels.extend_from_slice(next_target);
    }

    pub(crate) fn add_node(&mut self, node: N) {
        if self.nodes.insert(node) {
            for &label in &self.current_labels {
                self.binder.listen(node, label);
            }
        }
    }

    pub(crate) fn remove_node(&mut self, node: N) {
        if self.nodes.remove(&node) {
            for &label in &self.current_labels {
                self.binder.unlisten(node, label);
            }
        }
    }

    pub(crate) fn add_target_node(&mut self, node: N) {
        if self.target_nodes.insert(node) {
            for &label in &self.target_labels {
                self.binder.listen(node, label);
            }
        }
    }

    pub(crate) fn remove_target_node(&mut self, node: N) {
        if self.target_nodes.remove(&node) {
            for &label in &self.target_labels {
                self.binder.unlisten(node, label);
            }
        }
    }

    pub(crate) fn observe_container(&mut self, container: N) {
        self.containers.entry(container).or_default();
    }

    pub(crate) fn container_child_added(&mut self, container: N, child: N) {
        let Some(children) = self.containers.get_mut(&container) else {
            return;
        };
        if children.insert(child) {
            for &label in &self.current_labels {
                self.binder.listen(child, label);
            }
        }
    }

    pub(crate) fn container_child_removed(&mut self, container: N, child: N) {
        let Some(children) = self.containers.get_mut(&container) else {
            return;
        };
        if children.remove(&child) {
            for &label in &self.current_labels {
                self.binder.unlisten(child, label);
            }
        }
    }

    /// Forgets every registration without unsubscribing listeners one by
    /// one. Used by uninstall, where the nodes themselves are assumed gone.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.target_nodes.clear();
        self.containers.clear();
        self.target_labels.clear();
    }
}

impl<N, L> fmt::Debug for ListenerRegistry<N, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("nodes", &self.nodes.len())
            .field("target_nodes", &self.target_nodes.len())
            .field("containers", &self.containers.len())
            .field("fixed", &self.fixed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use alloc::vec;
    use core::cell::RefCell;

    #[derive(Default)]
    struct Recording {
        active: RefCell<Vec<(u32, u8)>>,
    }

    struct RecordingBinder(Rc<Recording>);

    impl EventBinder<u32, u8> for RecordingBinder {
        fn listen(&mut self, node: u32, label: u8) {
            self.0.active.borrow_mut().push((node, label));
        }
        fn unlisten(&mut self, node: u32, label: u8) {
            let mut active = self.0.active.borrow_mut();
            if let Some(pos) = active.iter().position(|&pair| pair == (node, label)) {
                active.remove(pos);
            }
        }
    }

    fn registry(initial: Vec<u8>, fixed: bool) -> (ListenerRegistry<u32, u8>, Rc<Recording>) {
        let recording = Rc::new(Recording::default());
        let reg = ListenerRegistry::new(
            Box::new(RecordingBinder(Rc::clone(&recording))),
            initial,
            fixed,
        );
        (reg, recording)
    }

    #[test]
    fn registering_a_node_applies_current_labels() {
        let (mut reg, rec) = registry(vec![1, 2], false);
        reg.add_node(7);
        assert_eq!(*rec.active.borrow(), vec![(7, 1), (7, 2)]);
    }

    #[test]
    fn state_change_applies_symmetric_difference() {
        let (mut reg, rec) = registry(vec![1, 2], false);
        reg.add_node(7);
        reg.apply_labels(&[2, 3], false);
        assert_eq!(*rec.active.borrow(), vec![(7, 2), (7, 3)]);
    }

    #[test]
    fn fixed_registries_never_recompute() {
        let (mut reg, rec) = registry(vec![1], true);
        reg.add_node(7);
        reg.apply_labels(&[9], false);
        assert_eq!(*rec.active.borrow(), vec![(7, 1)]);
    }

    #[test]
    fn target_nodes_idle_in_initial_state() {
        let (mut reg, rec) = registry(vec![1], false);
        reg.add_target_node(9);
        assert!(rec.active.borrow().is_empty());

        // Gesture underway: targets mirror the current labels.
        reg.apply_labels(&[2], false);
        assert_eq!(*rec.active.borrow(), vec![(9, 2)]);

        // Back to initial: targets are stripped again.
        reg.apply_labels(&[1], true);
        assert!(rec.active.borrow().is_empty());
    }

    #[test]
    fn target_node_added_mid_gesture_gets_listeners_immediately() {
        let (mut reg, rec) = registry(vec![1], false);
        reg.apply_labels(&[2], false);
        reg.add_target_node(9);
        assert_eq!(*rec.active.borrow(), vec![(9, 2)]);
    }

    #[test]
    fn container_children_follow_current_labels() {
        let (mut reg, rec) = registry(vec![1], false);
        reg.observe_container(100);
        reg.container_child_added(100, 101);
        reg.container_child_added(100, 102);
        assert_eq!(*rec.active.borrow(), vec![(101, 1), (102, 1)]);

        reg.container_child_removed(100, 101);
        assert_eq!(*rec.active.borrow(), vec![(102, 1)]);

        // Children of unobserved containers are ignored.
        reg.container_child_added(200, 201);
        assert_eq!(*rec.active.borrow(), vec![(102, 1)]);
    }

    #[test]
    fn container_children_are_updated_on_state_changes() {
        let (mut reg, rec) = registry(vec![1], false);
        reg.observe_container(100);
        reg.container_child_added(100, 101);
        reg.apply_labels(&[2], false);
        assert_eq!(*rec.active.borrow(), vec![(101, 2)]);
    }

    #[test]
    fn unregistering_removes_only_that_nodes_listeners() {
        let (mut reg, rec) = registry(vec![1, 2], false);
        reg.add_node(7);
        reg.add_node(8);
        reg.remove_node(7);
        assert_eq!(*rec.active.borrow(), vec![(8, 1), (8, 2)]);
    }

    #[test]
    fn clear_drops_bookkeeping_without_unlistening() {
        let (mut reg, rec) = registry(vec![1], false);
        reg.add_node(7);
        reg.clear();
        // The binder was not asked to unlisten; the ledger just forgot.
        assert_eq!(*rec.active.borrow(), vec![(7, 1)]);
        // But no node is tracked any more.
        reg.apply_labels(&[2], false);
        assert_eq!(*rec.active.borrow(), vec![(7, 1)]);
    }
}
