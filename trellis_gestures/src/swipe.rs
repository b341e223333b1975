// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Swipe: one touch contact moving fast enough, far enough, along one axis.
//!
//! ## Machine shape
//!
//! ```text
//! init --touchstart--> touched --move(on axis)--> moved --release(ok)--> released
//!                         |                        |  \--move(off axis)--> cancelled
//!                         \--release------------> cancelled
//! ```
//!
//! The *moved* state is the designated starting state: a press alone, or a
//! press followed by an off-axis move, never starts the recognition. Once
//! underway, every on-axis move streams an update; drifting off the axis
//! beyond the pixel tolerance cancels; the release recognizes the swipe only
//! if the travelled axis distance and the mean axis velocity both meet the
//! configured minima, and cancels otherwise.
//!
//! Distances, tolerance, and velocity are measured on client coordinates;
//! velocity uses the event timestamps of the press and the release.

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::RefCell;
use core::hash::Hash;

use kurbo::Point;
use trellis_fsm::{Fsm, StateId, Transition};
use trellis_interaction::{EventBinder, Interaction};

use crate::data::{abs, SrcTgtData};
use crate::event::{EventLabel, TouchPayload, UiEvent};
use crate::UiInteraction;

/// Swipe recognition thresholds.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SwipeConfig {
    /// Swipe along the x axis (`true`) or the y axis (`false`).
    pub horizontal: bool,
    /// Minimum mean axis velocity, in pixels per second.
    pub min_velocity: f64,
    /// Minimum travelled axis distance, in pixels.
    pub min_length: f64,
    /// Tolerated drift on the other axis, in pixels.
    pub px_tolerance: f64,
}

fn axis(horizontal: bool, p: Point) -> f64 {
    if horizontal { p.x } else { p.y }
}

fn cross_axis(horizontal: bool, p: Point) -> f64 {
    if horizontal { p.y } else { p.x }
}

/// Builds a swipe recognizer.
///
/// The [`SrcTgtData`] payload tracks the press point and the latest touch
/// position; bindings read it on *updates* for streaming and on *stops* for
/// the recognized swipe.
pub fn swipe<N>(
    config: SwipeConfig,
    binder: Box<dyn EventBinder<N, EventLabel>>,
) -> UiInteraction<SrcTgtData<N>, N>
where
    N: Copy + Eq + Hash + 'static,
{
    let data = Rc::new(RefCell::new(SrcTgtData::default()));

    let mut fsm: Fsm<UiEvent<N>, EventLabel> = Fsm::new();
    let touched = fsm.add_standard_state("touched");
    let moved = fsm.add_standard_state("moved");
    let released = fsm.add_terminal_state("released");
    let cancelled = fsm.add_cancelling_state("cancelled");
    fsm.set_starting_state(moved);

    let same_contact = |data: &Rc<RefCell<SrcTgtData<N>>>| {
        let data = Rc::clone(data);
        move |touch: &TouchPayload<N>| data.borrow().src.touch_id == Some(touch.touch_id)
    };
    let on_axis = {
        let data = Rc::clone(&data);
        move |touch: &TouchPayload<N>| {
            let drift =
                cross_axis(config.horizontal, touch.client)
                    - cross_axis(config.horizontal, data.borrow().src.client);
            abs(drift) <= config.px_tolerance
        }
    };
    let update_tgt = |data: &Rc<RefCell<SrcTgtData<N>>>| {
        let data = Rc::clone(data);
        move |e: &UiEvent<N>| {
            match e {
                UiEvent::TouchMove(touch) | UiEvent::TouchEnd(touch) => {
                    data.borrow_mut().tgt.set_from_touch(touch);
                }
                _ => {}
            }
        }
    };

    // Press: record the contact; source and target start together.
    let sink = Rc::clone(&data);
    fsm.transition(
        StateId::INITIAL,
        Transition::new(touched, [EventLabel::TouchStart], |e: &UiEvent<N>| {
            matches!(e, UiEvent::TouchStart(_))
        })
        .on_fire(move |e| {
            if let UiEvent::TouchStart(touch) = e {
                let mut d = sink.borrow_mut();
                d.src.set_from_touch(touch);
                d.tgt.set_from_touch(touch);
            }
        }),
    );

    // First on-axis move begins the swipe. Off-axis or foreign-contact
    // moves fall through and are ignored here.
    let id_ok = same_contact(&data);
    let axis_ok = on_axis.clone();
    fsm.transition(
        touched,
        Transition::new(moved, [EventLabel::TouchMove], |e: &UiEvent<N>| {
            matches!(e, UiEvent::TouchMove(_))
        })
        .with_guard(move |e: &UiEvent<N>| {
            matches!(e, UiEvent::TouchMove(t) if id_ok(t) && axis_ok(t))
        })
        .on_fire(update_tgt(&data)),
    );

    // Release without a single valid move abandons silently (the machine
    // never started).
    let id_ok = same_contact(&data);
    fsm.transition(
        touched,
        Transition::new(cancelled, [EventLabel::TouchEnd], |e: &UiEvent<N>| {
            matches!(e, UiEvent::TouchEnd(_))
        })
        .with_guard(move |e: &UiEvent<N>| matches!(e, UiEvent::TouchEnd(t) if id_ok(t))),
    );

    // Streaming moves; the on-axis loop is tried first, so the cancel edge
    // below only sees off-axis drift.
    let id_ok = same_contact(&data);
    let axis_ok = on_axis.clone();
    fsm.transition(
        moved,
        Transition::new(moved, [EventLabel::TouchMove], |e: &UiEvent<N>| {
            matches!(e, UiEvent::TouchMove(_))
        })
        .with_guard(move |e: &UiEvent<N>| {
            matches!(e, UiEvent::TouchMove(t) if id_ok(t) && axis_ok(t))
        })
        .on_fire(update_tgt(&data)),
    );
    let id_ok = same_contact(&data);
    fsm.transition(
        moved,
        Transition::new(cancelled, [EventLabel::TouchMove], |e: &UiEvent<N>| {
            matches!(e, UiEvent::TouchMove(_))
        })
        .with_guard(move |e: &UiEvent<N>| matches!(e, UiEvent::TouchMove(t) if id_ok(t))),
    );

    // Release: recognized only when both thresholds are met; the ordering
    // makes the second release edge the catch-all cancellation.
    let id_ok = same_contact(&data);
    let criteria = {
        let data = Rc::clone(&data);
        move |touch: &TouchPayload<N>| {
            let d = data.borrow();
            let length =
                abs(axis(config.horizontal, touch.client) - axis(config.horizontal, d.src.client));
            let duration = touch.timestamp_ms - d.src.timestamp_ms;
            let velocity = if duration <= 0.0 { 0.0 } else { length / duration * 1000.0 };
            length >= config.min_length && velocity >= config.min_velocity
        }
    };
    fsm.transition(
        moved,
        Transition::new(released, [EventLabel::TouchEnd], |e: &UiEvent<N>| {
            matches!(e, UiEvent::TouchEnd(_))
        })
        .with_guard(move |e: &UiEvent<N>| {
            matches!(e, UiEvent::TouchEnd(t) if id_ok(t) && criteria(t))
        })
        .on_fire(update_tgt(&data)),
    );
    let id_ok = same_contact(&data);
    fsm.transition(
        moved,
        Transition::new(cancelled, [EventLabel::TouchEnd], |e: &UiEvent<N>| {
            matches!(e, UiEvent::TouchEnd(_))
        })
        .with_guard(move |e: &UiEvent<N>| matches!(e, UiEvent::TouchEnd(t) if id_ok(t))),
    );

    Interaction::new(fsm, data, binder)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;
    use trellis_fsm::{FsmHandler, HandlerError};

    struct NullBinder;
    impl EventBinder<u32, EventLabel> for NullBinder {
        fn listen(&mut self, _node: u32, _label: EventLabel) {}
        fn unlisten(&mut self, _node: u32, _label: EventLabel) {}
    }

    #[derive(Default)]
    struct Counts {
        starts: Cell<u32>,
        updates: Cell<u32>,
        stops: Cell<u32>,
        cancels: Cell<u32>,
    }

    struct Counter(Rc<Counts>);
    impl FsmHandler for Counter {
        fn fsm_starts(&mut self) -> Result<(), HandlerError> {
            self.0.starts.set(self.0.starts.get() + 1);
            Ok(())
        }
        fn fsm_updates(&mut self) -> Result<(), HandlerError> {
            self.0.updates.set(self.0.updates.get() + 1);
            Ok(())
        }
        fn fsm_stops(&mut self) -> Result<(), HandlerError> {
            self.0.stops.set(self.0.stops.get() + 1);
            Ok(())
        }
        fn fsm_cancels(&mut self) -> Result<(), HandlerError> {
            self.0.cancels.set(self.0.cancels.get() + 1);
            Ok(())
        }
    }

    fn payload(id: u32, sx: f64, sy: f64, cx: f64, cy: f64, ts: f64) -> TouchPayload<u32> {
        TouchPayload {
            touch_id: id,
            screen: Point::new(sx, sy),
            client: Point::new(cx, cy),
            timestamp_ms: ts,
            target: 1,
        }
    }

    fn start(id: u32, sx: f64, sy: f64, cx: f64, cy: f64, ts: f64) -> UiEvent<u32> {
        UiEvent::TouchStart(payload(id, sx, sy, cx, cy, ts))
    }

    fn mv(id: u32, sx: f64, sy: f64, cx: f64, cy: f64, ts: f64) -> UiEvent<u32> {
        UiEvent::TouchMove(payload(id, sx, sy, cx, cy, ts))
    }

    fn end(id: u32, sx: f64, sy: f64, cx: f64, cy: f64, ts: f64) -> UiEvent<u32> {
        UiEvent::TouchEnd(payload(id, sx, sy, cx, cy, ts))
    }

    /// Horizontal swipe, at least 100 px travelled, 10 px drift tolerance.
    /// No velocity requirement, so distance alone decides the release.
    fn horizontal() -> (UiInteraction<SrcTgtData<u32>, u32>, Rc<Counts>) {
        let mut interaction = swipe::<u32>(
            SwipeConfig {
                horizontal: true,
                min_velocity: 0.0,
                min_length: 100.0,
                px_tolerance: 10.0,
            },
            Box::new(NullBinder),
        );
        let counts = Rc::new(Counts::default());
        interaction.add_handler(Rc::new(RefCell::new(Counter(Rc::clone(&counts)))));
        (interaction, counts)
    }

    #[test]
    fn press_alone_is_silent() {
        let (mut interaction, counts) = horizontal();
        interaction.process_event(&start(2, 0.0, 0.0, 0.0, 0.0, 0.0));
        assert_eq!(counts.starts.get(), 0);
        assert_eq!(counts.stops.get(), 0);
        assert_eq!(counts.cancels.get(), 0);
    }

    #[test]
    fn first_valid_move_starts_and_records_both_points() {
        let (mut interaction, counts) = horizontal();
        interaction.process_event(&start(3, 15.0, 20.0, 150.0, 200.0, 0.0));
        interaction.process_event(&mv(3, 16.0, 30.0, 160.0, 210.0, 10.0));
        assert_eq!(counts.starts.get(), 1);
        assert_eq!(counts.stops.get(), 0);
        assert_eq!(counts.cancels.get(), 0);

        let data = interaction.data();
        assert_eq!(data.src.client, Point::new(150.0, 200.0));
        assert_eq!(data.src.screen, Point::new(15.0, 20.0));
        assert_eq!(data.tgt.client, Point::new(160.0, 210.0));
        assert_eq!(data.tgt.screen, Point::new(16.0, 30.0));
        assert_eq!(data.src.touch_id, Some(3));
    }

    #[test]
    fn off_axis_first_move_is_ignored() {
        for dy in [11.0, -11.0] {
            let (mut interaction, counts) = horizontal();
            interaction.process_event(&start(3, 15.0, 20.0, 150.0, 200.0, 0.0));
            interaction.process_event(&mv(3, 16.0, 20.0 + dy, 160.0, 200.0 + dy, 10.0));
            assert_eq!(counts.starts.get(), 0);
            assert_eq!(counts.stops.get(), 0);
            assert_eq!(counts.cancels.get(), 0);
        }
    }

    #[test]
    fn press_release_without_movement_is_silent() {
        let (mut interaction, counts) = horizontal();
        interaction.process_event(&start(2, 0.0, 0.0, 0.0, 0.0, 0.0));
        interaction.process_event(&end(2, 0.0, 0.0, 0.0, 0.0, 5.0));
        assert_eq!(counts.starts.get(), 0);
        assert_eq!(counts.stops.get(), 0);
        assert_eq!(counts.cancels.get(), 0);
    }

    #[test]
    fn foreign_contact_moves_are_ignored() {
        let (mut interaction, counts) = horizontal();
        interaction.process_event(&start(2, 0.0, 0.0, 0.0, 0.0, 0.0));
        assert!(!interaction.process_event(&mv(1, 5.0, 0.0, 50.0, 0.0, 10.0)));
        assert_eq!(counts.starts.get(), 0);
    }

    #[test]
    fn off_axis_drift_after_start_cancels() {
        for dy in [11.0, -11.0] {
            let (mut interaction, counts) = horizontal();
            interaction.process_event(&start(3, 15.0, 20.0, 150.0, 200.0, 0.0));
            interaction.process_event(&mv(3, 16.0, 20.0, 160.0, 200.0, 10.0));
            interaction.process_event(&mv(3, 16.0, 20.0 + dy, 160.0, 200.0 + dy, 20.0));
            assert_eq!(counts.starts.get(), 1);
            assert_eq!(counts.stops.get(), 0);
            assert_eq!(counts.cancels.get(), 1);
        }
    }

    #[test]
    fn streaming_moves_update_the_target_point() {
        let (mut interaction, counts) = horizontal();
        interaction.process_event(&start(3, 15.0, 20.0, 150.0, 200.0, 0.0));
        interaction.process_event(&mv(3, 16.0, 30.0, 160.0, 201.0, 10.0));
        interaction.process_event(&mv(3, 17.0, 30.0, 170.0, 210.0, 20.0));
        assert_eq!(counts.starts.get(), 1);
        assert_eq!(counts.updates.get(), 2);
        assert_eq!(counts.cancels.get(), 0);

        let data = interaction.data();
        assert_eq!(data.tgt.client, Point::new(170.0, 210.0));
        assert_eq!(data.tgt.screen, Point::new(17.0, 30.0));
    }

    #[test]
    fn release_below_min_length_cancels() {
        let (mut interaction, counts) = horizontal();
        interaction.process_event(&start(3, 15.0, 20.0, 150.0, 200.0, 0.0));
        interaction.process_event(&mv(3, 16.0, 30.0, 160.0, 201.0, 10.0));
        interaction.process_event(&mv(3, 17.0, 30.0, 170.0, 210.0, 20.0));
        // 249 - 150 = 99 px travelled: one short of the minimum.
        interaction.process_event(&end(3, 114.0, 30.0, 249.0, 210.0, 30.0));
        assert_eq!(counts.starts.get(), 1);
        assert_eq!(counts.stops.get(), 0);
        assert_eq!(counts.cancels.get(), 1);
    }

    #[test]
    fn release_past_min_length_recognizes() {
        let (mut interaction, counts) = horizontal();
        interaction.process_event(&start(3, 15.0, 20.0, 150.0, 200.0, 0.0));
        interaction.process_event(&mv(3, 16.0, 30.0, 160.0, 201.0, 10.0));
        interaction.process_event(&mv(3, 115.0, 30.0, 250.0, 210.0, 20.0));
        interaction.process_event(&end(3, 115.0, 30.0, 250.0, 210.0, 30.0));
        assert_eq!(counts.starts.get(), 1);
        assert_eq!(counts.stops.get(), 1);
        assert_eq!(counts.cancels.get(), 0);
    }

    #[test]
    fn velocity_threshold_rejects_slow_swipes() {
        let mut interaction = swipe::<u32>(
            SwipeConfig {
                horizontal: true,
                min_velocity: 400.0,
                min_length: 200.0,
                px_tolerance: 10.0,
            },
            Box::new(NullBinder),
        );
        let counts = Rc::new(Counts::default());
        interaction.add_handler(Rc::new(RefCell::new(Counter(Rc::clone(&counts)))));

        // 400 px in 4 s: long enough, far too slow.
        interaction.process_event(&start(3, 0.0, 0.0, 100.0, 200.0, 1000.0));
        interaction.process_event(&mv(3, 0.0, 0.0, 300.0, 200.0, 3000.0));
        interaction.process_event(&end(3, 0.0, 0.0, 500.0, 200.0, 5000.0));
        assert_eq!(counts.stops.get(), 0);
        assert_eq!(counts.cancels.get(), 1);
    }

    #[test]
    fn vertical_swipes_measure_the_other_axis() {
        let mut interaction = swipe::<u32>(
            SwipeConfig {
                horizontal: false,
                min_velocity: 0.0,
                min_length: 100.0,
                px_tolerance: 10.0,
            },
            Box::new(NullBinder),
        );
        let counts = Rc::new(Counts::default());
        interaction.add_handler(Rc::new(RefCell::new(Counter(Rc::clone(&counts)))));

        interaction.process_event(&start(3, 0.0, 0.0, 200.0, 100.0, 0.0));
        interaction.process_event(&mv(3, 0.0, 0.0, 201.0, 160.0, 10.0));
        interaction.process_event(&end(3, 0.0, 0.0, 205.0, 250.0, 20.0));
        assert_eq!(counts.stops.get(), 1);
        assert_eq!(counts.cancels.get(), 0);
    }
}
