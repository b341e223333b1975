// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mouse press: the smallest useful interaction.
//!
//! A two-state machine (initial, pressed). Because it has a single
//! transition, the runtime keeps its listener set fixed for life.

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::RefCell;
use core::hash::Hash;

use trellis_fsm::{Fsm, StateId, Transition};
use trellis_interaction::{EventBinder, Interaction};

use crate::data::PointData;
use crate::event::{EventLabel, UiEvent};
use crate::UiInteraction;

/// Builds a mouse-press recognizer.
///
/// Recognition completes on every mouse-button press, with the press
/// position, button, and modifiers in the [`PointData`] payload.
pub fn mouse_down<N>(binder: Box<dyn EventBinder<N, EventLabel>>) -> UiInteraction<PointData<N>, N>
where
    N: Copy + Eq + Hash + 'static,
{
    let data = Rc::new(RefCell::new(PointData::default()));
    let mut fsm: Fsm<UiEvent<N>, EventLabel> = Fsm::new();
    let pressed = fsm.add_terminal_state("pressed");

    let sink = Rc::clone(&data);
    fsm.transition(
        StateId::INITIAL,
        Transition::new(pressed, [EventLabel::MouseDown], |e: &UiEvent<N>| {
            matches!(e, UiEvent::MouseDown(_))
        })
        .on_fire(move |e| {
            if let UiEvent::MouseDown(payload) = e {
                sink.borrow_mut().set_from_mouse(payload);
            }
        }),
    );

    Interaction::new(fsm, data, binder)
}
