// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Key combination: several keys pressed together.
//!
//! Starts on a key press; every further press joins the combination; the
//! gesture completes as soon as one of the accumulated keys is released.
//! The machine keeps its own list of currently held codes (distinct from
//! the [`KeysData`] payload) to guard the release transition; that list is
//! cleared by a reinit hook so no codes leak into the next cycle.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::hash::Hash;

use trellis_fsm::{Fsm, StateId, Transition};
use trellis_interaction::{EventBinder, Interaction};

use crate::data::KeysData;
use crate::event::{EventLabel, UiEvent};
use crate::UiInteraction;

/// Builds a key-combination recognizer.
///
/// The [`KeysData`] payload lists the codes pressed during the gesture in
/// press order.
pub fn keys_down<N>(binder: Box<dyn EventBinder<N, EventLabel>>) -> UiInteraction<KeysData, N>
where
    N: Copy + Eq + Hash + 'static,
{
    let data = Rc::new(RefCell::new(KeysData::default()));
    let held: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));

    let mut fsm: Fsm<UiEvent<N>, EventLabel> = Fsm::new();
    let pressed = fsm.add_standard_state("pressed");
    let ended = fsm.add_terminal_state("ended");

    let record = |data: &Rc<RefCell<KeysData>>, held: &Rc<RefCell<Vec<String>>>| {
        let data = Rc::clone(data);
        let held = Rc::clone(held);
        move |e: &UiEvent<N>| {
            if let UiEvent::KeyDown(key) = e {
                held.borrow_mut().push(key.code.clone());
                data.borrow_mut().add_code(key.code.clone());
            }
        }
    };

    fsm.transition(
        StateId::INITIAL,
        Transition::new(pressed, [EventLabel::KeyDown], |e: &UiEvent<N>| {
            matches!(e, UiEvent::KeyDown(_))
        })
        .on_fire(record(&data, &held)),
    );
    fsm.transition(
        pressed,
        Transition::new(pressed, [EventLabel::KeyDown], |e: &UiEvent<N>| {
            matches!(e, UiEvent::KeyDown(_))
        })
        .on_fire(record(&data, &held)),
    );

    // The release must be of one of the keys pressed during this cycle.
    let guard_held = Rc::clone(&held);
    fsm.transition(
        pressed,
        Transition::new(ended, [EventLabel::KeyUp], |e: &UiEvent<N>| {
            matches!(e, UiEvent::KeyUp(_))
        })
        .with_guard(move |e: &UiEvent<N>| {
            matches!(e, UiEvent::KeyUp(key) if guard_held.borrow().iter().any(|code| *code == key.code))
        }),
    );

    fsm.add_reinit_hook(move || held.borrow_mut().clear());

    Interaction::new(fsm, data, binder)
}
