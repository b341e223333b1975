// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Binding: route recognized interactions to application commands.
//!
//! A [`Binding`] consumes one interaction and owns the command side of its
//! lifecycle: a mandatory producer builds a [`Command`] from the
//! interaction's data when recognition starts (subject to an optional
//! `when` guard), optional `first`/`then`/`end`/`cancel` hooks observe the
//! cycle, and executed commands are handed to an application-injected
//! [`CommandSink`]. Undo bookkeeping belongs to the application: implement
//! [`UndoHistory`] behind your sink for commands that are [`Undoable`].
//!
//! There are no global registries; every collaborator is passed in
//! explicitly.
//!
//! ## Example
//!
//! ```
//! use trellis_binding::{Binding, Command, RecordingSink};
//! use trellis_gestures::{mouse_down, EventLabel, MouseButton, MousePayload, UiEvent, Modifiers};
//! use trellis_interaction::EventBinder;
//!
//! struct NoBinder;
//! impl EventBinder<u32, EventLabel> for NoBinder {
//!     fn listen(&mut self, _: u32, _: EventLabel) {}
//!     fn unlisten(&mut self, _: u32, _: EventLabel) {}
//! }
//!
//! struct Select { x: f64, y: f64 }
//! impl Command for Select {
//!     fn execute(&mut self) { /* apply the selection */ }
//! }
//!
//! let sink = RecordingSink::new();
//! let mut binding = Binding::new(
//!     mouse_down::<u32>(Box::new(NoBinder)),
//!     |data: &trellis_gestures::PointData<u32>| Select {
//!         x: data.client.x,
//!         y: data.client.y,
//!     },
//! )
//! .with_sink(sink.clone());
//!
//! binding.process_event(&UiEvent::MouseDown(MousePayload {
//!     button: MouseButton::Left,
//!     screen: kurbo::Point::new(1.0, 2.0),
//!     client: kurbo::Point::new(10.0, 20.0),
//!     modifiers: Modifiers::empty(),
//!     timestamp_ms: 0.0,
//!     target: 7,
//! }));
//!
//! assert_eq!(binding.times_ended(), 1);
//! assert_eq!(sink.len(), 1);
//! assert_eq!(sink.commands()[0].x, 10.0);
//! ```
//!
//! This crate is `no_std` compatible (with `alloc`).

#![no_std]

extern crate alloc;

mod binding;
mod command;

pub use binding::Binding;
pub use command::{Command, CommandSink, RecordingSink, Undoable, UndoHistory};
