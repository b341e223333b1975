// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Command traits: what a recognized interaction produces.
//!
//! A command encapsulates one application effect, constructed from the
//! interaction's data payload and executed when recognition completes.
//! Commands that can be reverted additionally implement [`Undoable`];
//! registering them with an undo mechanism is the application's business,
//! through whatever [`CommandSink`] it injects into the binding. There is no
//! process-wide registry: sinks and histories are passed in explicitly.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::{Ref, RefCell};
use core::fmt;

/// One application effect produced by a recognized interaction.
pub trait Command {
    /// Whether the command may run in the current application state.
    ///
    /// Returning `false` at execution time discards the command silently.
    fn can_execute(&self) -> bool {
        true
    }

    /// Performs the command's effect.
    fn execute(&mut self);
}

/// A command whose effect can be reverted and replayed.
pub trait Undoable: Command {
    /// Reverts the effect of [`Command::execute`].
    fn undo(&mut self);

    /// Replays the effect after an [`Undoable::undo`].
    fn redo(&mut self);

    /// Human-readable name shown in undo/redo menus.
    fn undo_name(&self) -> &str {
        ""
    }
}

/// Application-injected receiver of executed commands.
///
/// This is where command bookkeeping lives: an implementation may log,
/// collect for undo (when `C: Undoable`), or drop commands outright. The
/// binding hands a command over exactly once, after a successful execution.
pub trait CommandSink<C: Command> {
    /// Takes ownership of an executed command.
    fn consume(&mut self, command: C);
}

/// Application-injected store of undoable commands.
///
/// Typically implemented by the same object as [`CommandSink`] for
/// applications with undo support; kept separate so bindings never depend
/// on a storage policy.
pub trait UndoHistory<C: Undoable> {
    /// Records an executed command for later undo.
    fn add(&mut self, command: C);
}

/// A [`CommandSink`] that collects commands into a shared list.
///
/// Clones share the same backing store, so a test (or application) can keep
/// one handle while handing the other to a binding.
pub struct RecordingSink<C> {
    commands: Rc<RefCell<Vec<C>>>,
}

impl<C> RecordingSink<C> {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self {
            commands: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// The commands consumed so far, in consumption order.
    #[must_use]
    pub fn commands(&self) -> Ref<'_, Vec<C>> {
        self.commands.borrow()
    }

    /// Number of commands consumed so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.borrow().len()
    }

    /// Whether no command was consumed yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.borrow().is_empty()
    }
}

impl<C> Default for RecordingSink<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Clone for RecordingSink<C> {
    fn clone(&self) -> Self {
        Self {
            commands: Rc::clone(&self.commands),
        }
    }
}

impl<C> fmt::Debug for RecordingSink<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordingSink")
            .field("commands", &self.commands.borrow().len())
            .finish()
    }
}

impl<C: Command> CommandSink<C> for RecordingSink<C> {
    fn consume(&mut self, command: C) {
        self.commands.borrow_mut().push(command);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Nop;
    impl Command for Nop {
        fn execute(&mut self) {}
    }

    #[test]
    fn recording_sink_clones_share_the_store() {
        let sink = RecordingSink::<Nop>::new();
        let mut handle = sink.clone();
        assert!(sink.is_empty());
        handle.consume(Nop);
        assert_eq!(sink.len(), 1);
    }
}
