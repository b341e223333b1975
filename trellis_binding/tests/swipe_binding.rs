// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tests for the `trellis_binding` crate.
//!
//! End-to-end scenarios: a swipe interaction bound to a stub command,
//! driven by raw touch events, checked through the binding's counters and
//! the injected sink.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use kurbo::Point;
use trellis_binding::{Binding, Command, RecordingSink};
use trellis_gestures::{
    swipe, EventLabel, SrcTgtData, SwipeConfig, TouchPayload, UiEvent,
};
use trellis_interaction::EventBinder;

struct NullBinder;
impl EventBinder<u32, EventLabel> for NullBinder {
    fn listen(&mut self, _node: u32, _label: EventLabel) {}
    fn unlisten(&mut self, _node: u32, _label: EventLabel) {}
}

/// Stub command recording its execution.
struct StubCmd {
    executed: Rc<Cell<u32>>,
    travelled: f64,
}

impl Command for StubCmd {
    fn execute(&mut self) {
        self.executed.set(self.executed.get() + 1);
    }
}

fn touch(kind: u8, id: u32, sx: f64, sy: f64, cx: f64, cy: f64, ts: f64) -> UiEvent<u32> {
    let payload = TouchPayload {
        touch_id: id,
        screen: Point::new(sx, sy),
        client: Point::new(cx, cy),
        timestamp_ms: ts,
        target: 1,
    };
    match kind {
        0 => UiEvent::TouchStart(payload),
        1 => UiEvent::TouchMove(payload),
        _ => UiEvent::TouchEnd(payload),
    }
}

type SwipeBinding = Binding<SrcTgtData<u32>, StubCmd, UiEvent<u32>, EventLabel, u32>;

/// Horizontal swipe binder: 400 px/s minimum velocity, 200 px minimum
/// length, 10 px tolerance.
fn swipe_binding() -> (SwipeBinding, RecordingSink<StubCmd>, Rc<Cell<u32>>) {
    let executed = Rc::new(Cell::new(0));
    let sink = RecordingSink::new();
    let produced = Rc::clone(&executed);
    let binding = Binding::new(
        swipe::<u32>(
            SwipeConfig {
                horizontal: true,
                min_velocity: 400.0,
                min_length: 200.0,
                px_tolerance: 10.0,
            },
            Box::new(NullBinder),
        ),
        move |data: &SrcTgtData<u32>| StubCmd {
            executed: Rc::clone(&produced),
            travelled: data.translation().x,
        },
    )
    .with_sink(sink.clone());
    (binding, sink, executed)
}

#[test]
fn too_slow_and_too_short_produces_nothing() {
    let (mut binding, sink, executed) = swipe_binding();

    binding.process_event(&touch(0, 3, 15.0, 20.0, 150.0, 200.0, 100.0));
    binding.process_event(&touch(1, 3, 16.0, 30.0, 160.0, 210.0, 2000.0));

    assert_eq!(binding.times_cancelled(), 0);
    assert_eq!(binding.times_ended(), 0);
    assert_eq!(executed.get(), 0);
    assert!(sink.is_empty());
}

#[test]
fn off_axis_moves_produce_nothing() {
    for dy in [20.0, -30.0] {
        let (mut binding, sink, _executed) = swipe_binding();

        binding.process_event(&touch(0, 3, 15.0, 20.0, 150.0, 200.0, 10.0));
        binding.process_event(&touch(1, 3, 16.0, 20.0 + dy, 160.0, 200.0 + dy, 20.0));

        assert_eq!(binding.times_cancelled(), 0);
        assert_eq!(binding.times_ended(), 0);
        assert!(sink.is_empty());
    }
}

#[test]
fn fast_long_swipe_produces_exactly_one_command() {
    let (mut binding, sink, executed) = swipe_binding();

    binding.process_event(&touch(0, 3, 50.0, 20.0, 100.0, 200.0, 5000.0));
    binding.process_event(&touch(1, 3, 160.0, 30.0, 160.0, 201.0, 5500.0));
    binding.process_event(&touch(1, 3, 250.0, 30.0, 500.0, 210.0, 6000.0));
    binding.process_event(&touch(2, 3, 450.0, 30.0, 500.0, 210.0, 6000.0));

    assert_eq!(binding.times_cancelled(), 0);
    assert_eq!(binding.times_ended(), 1);
    assert_eq!(executed.get(), 1);
    assert_eq!(sink.len(), 1);
}

#[test]
fn long_but_slow_swipe_is_cancelled_without_a_command() {
    let (mut binding, sink, executed) = swipe_binding();

    // 400 px in 4 s: 100 px/s, well under the 400 px/s minimum.
    binding.process_event(&touch(0, 3, 0.0, 0.0, 100.0, 200.0, 1000.0));
    binding.process_event(&touch(1, 3, 0.0, 0.0, 300.0, 201.0, 3000.0));
    binding.process_event(&touch(2, 3, 0.0, 0.0, 500.0, 201.0, 5000.0));

    assert_eq!(binding.times_ended(), 0);
    assert_eq!(binding.times_cancelled(), 1);
    assert_eq!(executed.get(), 0);
    assert!(sink.is_empty());
}

#[test]
fn when_guard_blocks_command_creation() {
    let executed = Rc::new(Cell::new(0));
    let produced = Rc::clone(&executed);
    let mut binding = Binding::new(
        swipe::<u32>(
            SwipeConfig {
                horizontal: true,
                min_velocity: 0.0,
                min_length: 50.0,
                px_tolerance: 10.0,
            },
            Box::new(NullBinder),
        ),
        move |_data: &SrcTgtData<u32>| StubCmd {
            executed: Rc::clone(&produced),
            travelled: 0.0,
        },
    )
    .with_when(|_data| false);

    binding.process_event(&touch(0, 3, 0.0, 0.0, 100.0, 200.0, 0.0));
    binding.process_event(&touch(1, 3, 0.0, 0.0, 200.0, 200.0, 100.0));
    binding.process_event(&touch(2, 3, 0.0, 0.0, 200.0, 200.0, 100.0));

    assert_eq!(binding.times_ended(), 0);
    assert_eq!(executed.get(), 0);
}

#[test]
fn hooks_observe_the_command_lifecycle() {
    let journal: Rc<RefCell<Vec<&'static str>>> = Rc::new(RefCell::new(Vec::new()));
    let executed = Rc::new(Cell::new(0));
    let produced = Rc::clone(&executed);

    let first_log = Rc::clone(&journal);
    let then_log = Rc::clone(&journal);
    let end_log = Rc::clone(&journal);

    let mut binding = Binding::new(
        swipe::<u32>(
            SwipeConfig {
                horizontal: true,
                min_velocity: 0.0,
                min_length: 50.0,
                px_tolerance: 10.0,
            },
            Box::new(NullBinder),
        ),
        move |data: &SrcTgtData<u32>| StubCmd {
            executed: Rc::clone(&produced),
            travelled: data.translation().x,
        },
    )
    .with_first(move |_cmd, _data| first_log.borrow_mut().push("first"))
    .with_then(move |cmd, data| {
        // Streaming: keep the command in sync with the data.
        cmd.travelled = data.translation().x;
        then_log.borrow_mut().push("then");
    })
    .with_end(move |cmd, _data| {
        assert!(cmd.travelled >= 50.0, "end hook sees the final command");
        end_log.borrow_mut().push("end");
    });

    binding.process_event(&touch(0, 3, 0.0, 0.0, 100.0, 200.0, 0.0));
    binding.process_event(&touch(1, 3, 0.0, 0.0, 140.0, 201.0, 50.0));
    binding.process_event(&touch(1, 3, 0.0, 0.0, 180.0, 201.0, 100.0));
    binding.process_event(&touch(2, 3, 0.0, 0.0, 180.0, 201.0, 150.0));

    assert_eq!(*journal.borrow(), vec!["first", "then", "then", "end"]);
    assert_eq!(executed.get(), 1);
}

#[test]
fn cancel_hook_runs_when_a_command_is_dropped() {
    let cancelled_with_cmd = Rc::new(Cell::new(0));
    let executed = Rc::new(Cell::new(0));
    let produced = Rc::clone(&executed);
    let seen = Rc::clone(&cancelled_with_cmd);

    let mut binding = Binding::new(
        swipe::<u32>(
            SwipeConfig {
                horizontal: true,
                min_velocity: 0.0,
                min_length: 500.0,
                px_tolerance: 10.0,
            },
            Box::new(NullBinder),
        ),
        move |_data: &SrcTgtData<u32>| StubCmd {
            executed: Rc::clone(&produced),
            travelled: 0.0,
        },
    )
    .with_cancel(move |_data| seen.set(seen.get() + 1));

    binding.process_event(&touch(0, 3, 0.0, 0.0, 100.0, 200.0, 0.0));
    binding.process_event(&touch(1, 3, 0.0, 0.0, 150.0, 200.0, 50.0));
    // Released far short of the 500 px minimum.
    binding.process_event(&touch(2, 3, 0.0, 0.0, 150.0, 200.0, 100.0));

    assert_eq!(binding.times_cancelled(), 1);
    assert_eq!(cancelled_with_cmd.get(), 1);
    assert_eq!(executed.get(), 0);
}
