// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The binding: from recognition lifecycle to command lifecycle.
//!
//! A binding consumes one interaction. It listens to the interaction's
//! semantic notifications and maps them onto a command:
//!
//! - *starts*: if the `when` guard accepts the current data, the producer
//!   builds the command and the `first` hook runs;
//! - *updates*: a command not created yet gets another chance (the guard may
//!   only pass once enough data accumulated); an existing command gets the
//!   `then` hook, for streaming feedback;
//! - *stops*: the command, if any and if [`can_execute`], is executed, the
//!   `end` hook runs, and the command is handed to the injected sink;
//! - *cancels*: the command in flight is dropped and the `cancel` hook runs.
//!
//! The command producer is mandatory and taken by value at construction:
//! a binding without a producer cannot be expressed, which is this crate's
//! rendering of "missing producer is a bind-time error".
//!
//! [`can_execute`]: crate::Command::can_execute

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::{Ref, RefCell};
use core::fmt;
use core::hash::Hash;

use trellis_fsm::{FsmError, FsmHandler, HandlerError};
use trellis_interaction::{Interaction, InteractionData};

use crate::command::{Command, CommandSink};

type Producer<D, C> = Box<dyn Fn(&D) -> C>;
type Guard<D> = Box<dyn Fn(&D) -> bool>;
type CmdHook<D, C> = Box<dyn FnMut(&mut C, &D)>;
type EndHook<D, C> = Box<dyn FnMut(&C, &D)>;
type CancelHook<D> = Box<dyn FnMut(&D)>;

struct BindingCore<D, C> {
    data: Rc<RefCell<D>>,
    producer: Producer<D, C>,
    when: Option<Guard<D>>,
    first: Option<CmdHook<D, C>>,
    then: Option<CmdHook<D, C>>,
    end: Option<EndHook<D, C>>,
    cancel: Option<CancelHook<D>>,
    sink: Option<Box<dyn CommandSink<C>>>,
    command: Option<C>,
    times_ended: u32,
    times_cancelled: u32,
    logging: bool,
}

impl<D, C: Command> BindingCore<D, C> {
    fn try_create_command(&mut self) {
        if self.command.is_some() {
            return;
        }
        let data = Rc::clone(&self.data);
        let data = data.borrow();
        if !self.when.as_ref().is_none_or(|guard| guard(&data)) {
            return;
        }
        if self.logging {
            log::trace!("binding: producing command");
        }
        let mut command = (self.producer)(&data);
        if let Some(first) = &mut self.first {
            first(&mut command, &data);
        }
        drop(data);
        self.command = Some(command);
    }
}

impl<D, C: Command> FsmHandler for BindingCore<D, C> {
    fn fsm_starts(&mut self) -> Result<(), HandlerError> {
        self.try_create_command();
        Ok(())
    }

    fn fsm_updates(&mut self) -> Result<(), HandlerError> {
        self.try_create_command();
        if let Some(command) = &mut self.command {
            if let Some(then) = &mut self.then {
                then(command, &self.data.borrow());
            }
        }
        Ok(())
    }

    fn fsm_stops(&mut self) -> Result<(), HandlerError> {
        let Some(mut command) = self.command.take() else {
            return Ok(());
        };
        if !command.can_execute() {
            if self.logging {
                log::trace!("binding: command rejected by can_execute");
            }
            return Ok(());
        }
        command.execute();
        if let Some(end) = &mut self.end {
            end(&command, &self.data.borrow());
        }
        if let Some(sink) = &mut self.sink {
            sink.consume(command);
        }
        self.times_ended += 1;
        if self.logging {
            log::trace!("binding: command executed ({} so far)", self.times_ended);
        }
        Ok(())
    }

    fn fsm_cancels(&mut self) -> Result<(), HandlerError> {
        if self.command.take().is_some() {
            if let Some(cancel) = &mut self.cancel {
                cancel(&self.data.borrow());
            }
            self.times_cancelled += 1;
            if self.logging {
                log::trace!("binding: command dropped on cancel");
            }
        }
        Ok(())
    }

    fn fsm_error(&mut self, error: &FsmError) {
        if self.logging {
            log::trace!("binding: interaction error: {error}");
        }
    }
}

/// Connects one interaction to an application command.
///
/// Built with a mandatory producer; guard and lifecycle hooks are optional
/// and attached with the `with_*` methods before use. Events reach the
/// binding through [`Binding::process_event`] (or directly through the
/// interaction's registered nodes).
pub struct Binding<D, C, E, L, N>
where
    D: InteractionData,
{
    interaction: Interaction<D, E, L, N>,
    core: Rc<RefCell<BindingCore<D, C>>>,
}

impl<D, C, E, L, N> Binding<D, C, E, L, N>
where
    D: InteractionData + 'static,
    C: Command + 'static,
    E: 'static,
    L: Copy + Eq + Hash + 'static,
    N: Copy + Eq + Hash + 'static,
{
    /// Binds `interaction` to commands built by `producer`.
    pub fn new(
        mut interaction: Interaction<D, E, L, N>,
        producer: impl Fn(&D) -> C + 'static,
    ) -> Self {
        let core = Rc::new(RefCell::new(BindingCore {
            data: interaction.data_handle(),
            producer: Box::new(producer),
            when: None,
            first: None,
            then: None,
            end: None,
            cancel: None,
            sink: None,
            command: None,
            times_ended: 0,
            times_cancelled: 0,
            logging: false,
        }));
        let handler: Rc<RefCell<dyn FsmHandler>> = core.clone();
        interaction.add_handler(handler);
        Self { interaction, core }
    }

    /// Guards command creation: no command is produced while the predicate
    /// rejects the data.
    #[must_use]
    pub fn with_when(self, when: impl Fn(&D) -> bool + 'static) -> Self {
        self.core.borrow_mut().when = Some(Box::new(when));
        self
    }

    /// Hook run once, right after the command is produced.
    #[must_use]
    pub fn with_first(self, first: impl FnMut(&mut C, &D) + 'static) -> Self {
        self.core.borrow_mut().first = Some(Box::new(first));
        self
    }

    /// Hook run on every update while a command is in flight.
    #[must_use]
    pub fn with_then(self, then: impl FnMut(&mut C, &D) + 'static) -> Self {
        self.core.borrow_mut().then = Some(Box::new(then));
        self
    }

    /// Hook run after successful execution, before the sink consumes the
    /// command.
    #[must_use]
    pub fn with_end(self, end: impl FnMut(&C, &D) + 'static) -> Self {
        self.core.borrow_mut().end = Some(Box::new(end));
        self
    }

    /// Hook run when a recognition with a command in flight is cancelled.
    #[must_use]
    pub fn with_cancel(self, cancel: impl FnMut(&D) + 'static) -> Self {
        self.core.borrow_mut().cancel = Some(Box::new(cancel));
        self
    }

    /// Injects the receiver of executed commands.
    #[must_use]
    pub fn with_sink(self, sink: impl CommandSink<C> + 'static) -> Self {
        self.core.borrow_mut().sink = Some(Box::new(sink));
        self
    }

    /// Forwards `event` to the interaction.
    pub fn process_event(&mut self, event: &E) -> bool {
        self.interaction.process_event(event)
    }

    /// Number of recognitions that executed a command.
    #[must_use]
    pub fn times_ended(&self) -> u32 {
        self.core.borrow().times_ended
    }

    /// Number of recognitions cancelled with a command in flight.
    #[must_use]
    pub fn times_cancelled(&self) -> u32 {
        self.core.borrow().times_cancelled
    }

    /// Read access to the interaction's data payload.
    #[must_use]
    pub fn data(&self) -> Ref<'_, D> {
        self.interaction.data()
    }

    /// The bound interaction.
    #[must_use]
    pub fn interaction(&self) -> &Interaction<D, E, L, N> {
        &self.interaction
    }

    /// Mutable access to the bound interaction (node registration,
    /// timer host installation).
    #[must_use]
    pub fn interaction_mut(&mut self) -> &mut Interaction<D, E, L, N> {
        &mut self.interaction
    }

    /// Toggles trace logging for the binding and its interaction.
    pub fn set_logging(&mut self, logging: bool) {
        self.core.borrow_mut().logging = logging;
        self.interaction.set_logging(logging);
    }

    /// Uninstalls the underlying interaction; the binding must not be used
    /// afterward.
    pub fn uninstall(&mut self) {
        self.interaction.uninstall();
    }
}

impl<D, C, E, L, N> fmt::Debug for Binding<D, C, E, L, N>
where
    D: InteractionData,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let core = self.core.borrow();
        f.debug_struct("Binding")
            .field("times_ended", &core.times_ended)
            .field("times_cancelled", &core.times_cancelled)
            .field("command_in_flight", &core.command.is_some())
            .finish()
    }
}
