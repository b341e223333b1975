// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The concrete raw-event model the gesture library consumes.
//!
//! Hosts translate their native input events into [`UiEvent`] values and
//! feed them to the interactions returned by this crate. Each event carries
//! the fields the gesture data models copy: screen and client coordinates,
//! timestamps, touch identifiers, key codes, and modifier flags.
//!
//! [`EventLabel`] is the event-*type* vocabulary used for listener
//! bookkeeping: hosts subscribe and unsubscribe per `(node, label)` pair.
//! The [`EventLabel::Timeout`] label exists for completeness but is never
//! subscribed to; timeout events are synthesized internally by the engine.

use alloc::string::String;

use kurbo::{Point, Vec2};

bitflags::bitflags! {
    /// Keyboard modifier flags attached to mouse and key events.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// Alt (Option) held.
        const ALT   = 0b0000_0001;
        /// Control held.
        const CTRL  = 0b0000_0010;
        /// Shift held.
        const SHIFT = 0b0000_0100;
        /// Meta (Command, Windows) held.
        const META  = 0b0000_1000;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::empty()
    }
}

/// Mouse button identifier.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary button.
    Left,
    /// Wheel button.
    Middle,
    /// Secondary button.
    Right,
}

/// Event-type label, the unit of listener subscription.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventLabel {
    /// Mouse button pressed.
    MouseDown,
    /// Mouse button released.
    MouseUp,
    /// Mouse moved.
    MouseMove,
    /// Touch contact started.
    TouchStart,
    /// Touch contact moved.
    TouchMove,
    /// Touch contact ended.
    TouchEnd,
    /// Keyboard key pressed.
    KeyDown,
    /// Keyboard key released.
    KeyUp,
    /// Wheel or scroll gesture.
    Scroll,
    /// Engine-synthesized timeout; never subscribed on a node.
    Timeout,
}

/// Fields of a mouse event.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MousePayload<N> {
    /// Which button the event concerns.
    pub button: MouseButton,
    /// Position in screen coordinates.
    pub screen: Point,
    /// Position in client (viewport) coordinates.
    pub client: Point,
    /// Modifier keys held.
    pub modifiers: Modifiers,
    /// Host timestamp, in milliseconds.
    pub timestamp_ms: f64,
    /// The node the event occurred on.
    pub target: N,
}

/// Fields of a touch event, for one contact point.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TouchPayload<N> {
    /// Stable identifier of the touch contact.
    pub touch_id: u32,
    /// Position in screen coordinates.
    pub screen: Point,
    /// Position in client (viewport) coordinates.
    pub client: Point,
    /// Host timestamp, in milliseconds.
    pub timestamp_ms: f64,
    /// The node the event occurred on.
    pub target: N,
}

/// Fields of a keyboard event.
#[derive(Clone, Debug, PartialEq)]
pub struct KeyPayload<N> {
    /// Physical key code (`"KeyA"`, `"ArrowLeft"`).
    pub code: String,
    /// Modifier keys held.
    pub modifiers: Modifiers,
    /// The node the event was delivered to.
    pub target: N,
}

/// Fields of a wheel/scroll event.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScrollPayload<N> {
    /// Scroll delta.
    pub delta: Vec2,
    /// Host timestamp, in milliseconds.
    pub timestamp_ms: f64,
    /// The node the event occurred on.
    pub target: N,
}

/// A raw input event, as fed to [`process_event`].
///
/// [`process_event`]: trellis_interaction::Interaction::process_event
#[derive(Clone, Debug, PartialEq)]
pub enum UiEvent<N> {
    /// Mouse button pressed.
    MouseDown(MousePayload<N>),
    /// Mouse button released.
    MouseUp(MousePayload<N>),
    /// Mouse moved.
    MouseMove(MousePayload<N>),
    /// Touch contact started.
    TouchStart(TouchPayload<N>),
    /// Touch contact moved.
    TouchMove(TouchPayload<N>),
    /// Touch contact ended.
    TouchEnd(TouchPayload<N>),
    /// Keyboard key pressed.
    KeyDown(KeyPayload<N>),
    /// Keyboard key released.
    KeyUp(KeyPayload<N>),
    /// Wheel or scroll gesture.
    Scroll(ScrollPayload<N>),
    /// Engine-synthesized timeout event.
    Timeout,
}

impl<N> UiEvent<N> {
    /// The event-type label of this event.
    #[must_use]
    pub fn label(&self) -> EventLabel {
        match self {
            Self::MouseDown(_) => EventLabel::MouseDown,
            Self::MouseUp(_) => EventLabel::MouseUp,
            Self::MouseMove(_) => EventLabel::MouseMove,
            Self::TouchStart(_) => EventLabel::TouchStart,
            Self::TouchMove(_) => EventLabel::TouchMove,
            Self::TouchEnd(_) => EventLabel::TouchEnd,
            Self::KeyDown(_) => EventLabel::KeyDown,
            Self::KeyUp(_) => EventLabel::KeyUp,
            Self::Scroll(_) => EventLabel::Scroll,
            Self::Timeout => EventLabel::Timeout,
        }
    }
}
