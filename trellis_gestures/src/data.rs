// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gesture data payloads: the accumulated, flushable result of recognition.
//!
//! Transition actions copy raw-event fields into these types as the gesture
//! progresses; bindings read them on *starts*/*updates*/*stops*. Every
//! payload implements [`InteractionData`] so the runtime can flush it
//! between recognition cycles.

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Point, Vec2};
use trellis_interaction::InteractionData;

use crate::event::{Modifiers, MouseButton, MousePayload, TouchPayload};

/// One recorded input position with its provenance.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointData<N> {
    /// Position in screen coordinates.
    pub screen: Point,
    /// Position in client (viewport) coordinates.
    pub client: Point,
    /// Host timestamp, in milliseconds.
    pub timestamp_ms: f64,
    /// Pressed mouse button, for mouse-driven gestures.
    pub button: Option<MouseButton>,
    /// Touch contact id, for touch-driven gestures.
    pub touch_id: Option<u32>,
    /// Modifier keys held.
    pub modifiers: Modifiers,
    /// The node the position was recorded on.
    pub target: Option<N>,
}

impl<N> Default for PointData<N> {
    fn default() -> Self {
        Self {
            screen: Point::ZERO,
            client: Point::ZERO,
            timestamp_ms: 0.0,
            button: None,
            touch_id: None,
            modifiers: Modifiers::empty(),
            target: None,
        }
    }
}

impl<N: Copy> PointData<N> {
    /// Copies the fields of a mouse event.
    pub fn set_from_mouse(&mut self, payload: &MousePayload<N>) {
        self.screen = payload.screen;
        self.client = payload.client;
        self.timestamp_ms = payload.timestamp_ms;
        self.button = Some(payload.button);
        self.touch_id = None;
        self.modifiers = payload.modifiers;
        self.target = Some(payload.target);
    }

    /// Copies the fields of a touch event.
    pub fn set_from_touch(&mut self, payload: &TouchPayload<N>) {
        self.screen = payload.screen;
        self.client = payload.client;
        self.timestamp_ms = payload.timestamp_ms;
        self.button = None;
        self.touch_id = Some(payload.touch_id);
        self.modifiers = Modifiers::empty();
        self.target = Some(payload.target);
    }
}

impl<N> InteractionData for PointData<N> {
    fn flush(&mut self) {
        *self = Self::default();
    }
}

/// Source and target positions of a press-drag-release-class gesture.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SrcTgtData<N> {
    /// Where the gesture started.
    pub src: PointData<N>,
    /// Where the gesture currently is (or ended).
    pub tgt: PointData<N>,
}

impl<N> Default for SrcTgtData<N> {
    fn default() -> Self {
        Self {
            src: PointData::default(),
            tgt: PointData::default(),
        }
    }
}

impl<N> SrcTgtData<N> {
    /// Translation vector from source to target, in client coordinates.
    #[must_use]
    pub fn translation(&self) -> Vec2 {
        self.tgt.client - self.src.client
    }

    /// Elapsed time between the source and target events, in milliseconds.
    #[must_use]
    pub fn duration_ms(&self) -> f64 {
        self.tgt.timestamp_ms - self.src.timestamp_ms
    }

    /// Mean speed along one axis, in pixels per second.
    ///
    /// Returns zero when the recorded duration is not positive.
    #[must_use]
    pub fn velocity(&self, horizontal: bool) -> f64 {
        let duration = self.duration_ms();
        if duration <= 0.0 {
            return 0.0;
        }
        let translation = self.translation();
        let distance = abs(if horizontal { translation.x } else { translation.y });
        distance / duration * 1000.0
    }
}

impl<N> InteractionData for SrcTgtData<N> {
    fn flush(&mut self) {
        self.src.flush();
        self.tgt.flush();
    }
}

/// Accumulated key codes of a key-combination gesture.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeysData {
    /// Codes of the keys pressed during the gesture, in press order.
    pub codes: Vec<String>,
}

impl KeysData {
    /// Records one pressed key.
    pub fn add_code(&mut self, code: String) {
        self.codes.push(code);
    }
}

impl InteractionData for KeysData {
    fn flush(&mut self) {
        self.codes.clear();
    }
}

// `f64::abs` lives in `std`, not `core`.
pub(crate) fn abs(v: f64) -> f64 {
    if v.is_sign_negative() { -v } else { v }
}
