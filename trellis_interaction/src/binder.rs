// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The host-environment seam for event-listener subscription.
//!
//! Trellis does not know how the host delivers input. It only requires an
//! `addEventListener`-shaped capability: given a node key and an event-type
//! label, start (or stop) routing matching raw events to the interaction's
//! [`process_event`](crate::Interaction::process_event). Node keys are a
//! host-chosen copyable id type, never a widget object.
//!
//! The runtime guarantees it asks to listen only for the labels the FSM's
//! *current* state can consume, so an idle interaction costs the host exactly
//! its initial-state subscriptions and never swallows unrelated events.

/// Host capability for subscribing to raw input events per node and label.
///
/// Implementations are free to coalesce duplicate requests; the runtime
/// itself never asks twice for the same `(node, label)` pair without an
/// intervening `unlisten`.
pub trait EventBinder<N, L> {
    /// Starts delivering events of type `label` occurring on `node`.
    fn listen(&mut self, node: N, label: L);

    /// Stops delivering events of type `label` occurring on `node`.
    fn unlisten(&mut self, node: N, label: L);
}
