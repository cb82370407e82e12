//! Main-loop runtime
//!
//! [`Runtime`] owns the message bus, the module ring and the input
//! dispatcher. The firmware creates one, registers its modules, and then
//! hands control to [`Runtime::run`], which sleeps until an interrupt wakes
//! the core and runs one [`Runtime::run_cycle`] per wake-up:
//!
//! 1. drain the clock and every driver mailbox into one composite message
//! 2. dispatch that message once on the bus
//! 3. feed the latched buttons to the input dispatcher
//!
//! Module handlers receive a [`Control`] handle instead of the runtime
//! itself. It gives access to the bus and lets a handler request field edit
//! mode, which the dispatcher enters once the handler returns.

use log::{debug, info};

use crate::bus::{Listener, MessageBus};
use crate::clock::{CalendarHardware, Clock};
use crate::config::RuntimeConfig;
use crate::error::CoreError;
use crate::events::{Buttons, EventMask};
use crate::input::{Completion, EditItem, EditRequest, InputDispatcher, Mode};
use crate::menu::{Handler, MenuRing, Module};
use crate::signal::DriverSignals;

/// Handle given to module handlers while they run.
pub struct Control<'a, C> {
    bus: &'a mut MessageBus<C>,
    edit: Option<EditRequest<C>>,
    now: u32,
}

impl<'a, C> Control<'a, C> {
    /// Run `handler` and return the edit request it made, if any.
    pub(crate) fn run(
        handler: Handler<C>,
        ctx: &mut C,
        bus: &'a mut MessageBus<C>,
        now: u32,
    ) -> Option<EditRequest<C>> {
        let mut control = Control {
            bus,
            edit: None,
            now,
        };
        handler(ctx, &mut control);
        control.edit
    }

    pub fn bus_register(
        &mut self,
        listener: Listener<C>,
        interest: EventMask,
    ) -> Result<(), CoreError> {
        self.bus.register(listener, interest)
    }

    pub fn bus_unregister(&mut self, listener: Listener<C>) {
        self.bus.unregister(listener);
    }

    /// Ask for field edit mode over `items`.
    ///
    /// The dispatcher switches modes when the current handler returns and
    /// selects the first item that has a `set` callback. `complete` runs once
    /// when the session ends. A later call in the same handler replaces an
    /// earlier one.
    pub fn edit_start(
        &mut self,
        complete: Completion<C>,
        items: &[EditItem<C>],
    ) -> Result<(), CoreError> {
        self.edit = Some(EditRequest::new(complete, items)?);
        Ok(())
    }

    /// Seconds since boot, as seen by the current wake cycle.
    pub fn now(&self) -> u32 {
        self.now
    }
}

/// How deep the main loop may sleep between cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SleepDepth {
    /// Peripheral clocks stay up, used while audio is playing
    Light,
    Deep,
}

fn sleep_depth(signals: &DriverSignals) -> SleepDepth {
    if signals.audio_active() {
        SleepDepth::Light
    } else {
        SleepDepth::Deep
    }
}

/// Board hooks used by [`Runtime::run`].
pub trait PowerControl {
    /// Block until the next interrupt.
    fn sleep(&mut self, depth: SleepDepth);

    fn feed_watchdog(&mut self);
}

pub struct Runtime<C> {
    bus: MessageBus<C>,
    menu: MenuRing<C>,
    input: InputDispatcher<C>,
    config: RuntimeConfig,
    now: u32,
}

impl<C> Runtime<C> {
    pub const fn new(config: RuntimeConfig) -> Self {
        Self {
            bus: MessageBus::new(),
            menu: MenuRing::new(),
            input: InputDispatcher::new(config.menu_timeout_secs, config.edit_timeout_secs),
            config,
            now: 0,
        }
    }

    /// Add `module` to the ring. The first module becomes the default
    /// screen and is activated right away.
    pub fn add_module(&mut self, ctx: &mut C, module: Module<C>) -> Result<(), CoreError> {
        if self.menu.add_entry(module)? {
            self.input
                .invoke(module.handlers.activate, ctx, self.now, &mut self.bus);
        }
        Ok(())
    }

    pub fn bus_register(
        &mut self,
        listener: Listener<C>,
        interest: EventMask,
    ) -> Result<(), CoreError> {
        self.bus.register(listener, interest)
    }

    pub fn bus_unregister(&mut self, listener: Listener<C>) {
        self.bus.unregister(listener);
    }

    /// Run one wake cycle and return the message that was dispatched.
    pub fn run_cycle<H: CalendarHardware>(
        &mut self,
        ctx: &mut C,
        clock: &Clock<H>,
        signals: &DriverSignals,
    ) -> EventMask {
        let msg = signals.collect(clock.drain(), self.config.battery_monitor);
        if !msg.is_empty() {
            let delivered = self.bus.dispatch(ctx, msg);
            debug!("Dispatched {:?} to {} listeners", msg, delivered);
        }

        self.now = clock.sys();
        self.handle_buttons(ctx, signals.take_buttons());
        msg
    }

    /// Feed button edges to the input dispatcher using the last seen time.
    pub fn handle_buttons(&mut self, ctx: &mut C, buttons: Buttons) {
        if !buttons.is_empty() {
            debug!("Buttons {:?} in {:?}", buttons, self.mode());
        }
        self.input
            .handle(ctx, buttons, self.now, &mut self.menu, &mut self.bus);
    }

    /// Main loop. Never returns.
    pub fn run<H, P>(
        &mut self,
        ctx: &mut C,
        clock: &Clock<H>,
        signals: &DriverSignals,
        power: &mut P,
    ) -> !
    where
        H: CalendarHardware,
        P: PowerControl,
    {
        info!("Entering main loop with {} modules", self.menu.len());
        loop {
            power.sleep(sleep_depth(signals));
            power.feed_watchdog();
            self.run_cycle(ctx, clock, signals);
        }
    }

    pub fn mode(&self) -> Mode {
        self.input.mode(&self.menu)
    }

    pub fn current_module(&self) -> Option<&'static str> {
        self.menu.current_name()
    }

    pub fn menu(&self) -> &MenuRing<C> {
        &self.menu
    }

    pub fn bus(&self) -> &MessageBus<C> {
        &self.bus
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Seconds since boot as of the last cycle.
    pub fn now(&self) -> u32 {
        self.now
    }
}

impl<C> Default for Runtime<C> {
    fn default() -> Self {
        Self::new(RuntimeConfig::DEFAULT)
    }
}
