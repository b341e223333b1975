// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Long touch: one contact held still for a configured duration.
//!
//! The pressed state is timed; if the timer elapses before the contact moves
//! or lifts, the gesture is recognized. Any movement or release of the same
//! contact before expiry cancels it. Requires a
//! [`TimerHost`](trellis_fsm::TimerHost) installed on the interaction's FSM.

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::RefCell;
use core::hash::Hash;

use trellis_fsm::{Fsm, StateId, Transition};
use trellis_interaction::{EventBinder, Interaction};

use crate::data::PointData;
use crate::event::{EventLabel, UiEvent};
use crate::UiInteraction;

/// Builds a long-touch recognizer completing after `duration_ms` of stillness.
///
/// The [`PointData`] payload holds the press position and touch id.
pub fn long_touch<N>(
    duration_ms: u64,
    binder: Box<dyn EventBinder<N, EventLabel>>,
) -> UiInteraction<PointData<N>, N>
where
    N: Copy + Eq + Hash + 'static,
{
    let data = Rc::new(RefCell::new(PointData::default()));

    let mut fsm: Fsm<UiEvent<N>, EventLabel> = Fsm::new();
    let touched = fsm.add_standard_state("touched");
    let timeouted = fsm.add_terminal_state("timeouted");
    let cancelled = fsm.add_cancelling_state("cancelled");

    let sink = Rc::clone(&data);
    fsm.transition(
        StateId::INITIAL,
        Transition::new(touched, [EventLabel::TouchStart], |e: &UiEvent<N>| {
            matches!(e, UiEvent::TouchStart(_))
        })
        .on_fire(move |e| {
            if let UiEvent::TouchStart(touch) = e {
                sink.borrow_mut().set_from_touch(touch);
            }
        }),
    );

    // Moving or lifting the tracked contact before expiry aborts.
    let tracked = Rc::clone(&data);
    fsm.transition(
        touched,
        Transition::new(cancelled, [EventLabel::TouchMove], |e: &UiEvent<N>| {
            matches!(e, UiEvent::TouchMove(_))
        })
        .with_guard(move |e: &UiEvent<N>| {
            matches!(e, UiEvent::TouchMove(t) if tracked.borrow().touch_id == Some(t.touch_id))
        }),
    );
    let tracked = Rc::clone(&data);
    fsm.transition(
        touched,
        Transition::new(cancelled, [EventLabel::TouchEnd], |e: &UiEvent<N>| {
            matches!(e, UiEvent::TouchEnd(_))
        })
        .with_guard(move |e: &UiEvent<N>| {
            matches!(e, UiEvent::TouchEnd(t) if tracked.borrow().touch_id == Some(t.touch_id))
        }),
    );

    // Expiry completes the gesture. The transition subscribes to no node
    // events; the engine synthesizes its trigger.
    fsm.transition(
        touched,
        Transition::new(timeouted, [], |e: &UiEvent<N>| matches!(e, UiEvent::Timeout)),
    );
    fsm.set_timeout(touched, duration_ms, || UiEvent::Timeout);

    Interaction::new(fsm, data, binder)
}
