//! Hardware-independent core of the chronos watch firmware
//!
//! This crate contains the real-time event and modal-input subsystem: the
//! calendar clock driver with its cascading minute/hour/day/month/year
//! events, the message bus that fans driver events out to application
//! modules once per wake cycle, the ring of registered modules, and the
//! three-mode input dispatcher (normal, menu navigation, field edit).
//!
//! It is `#![no_std]` so it compiles on the watch and on desktop hosts (for
//! the simulator and tests). Everything that crosses the interrupt boundary
//! goes through the critical-section protected mailboxes in [`signal`].

#![no_std]

pub mod bus;
pub mod clock;
pub mod config;
pub mod error;
pub mod events;
pub mod helpers;
pub mod input;
pub mod menu;
pub mod runtime;
pub mod signal;

#[cfg(test)]
pub(crate) mod testing;

pub use bus::{Listener, MessageBus};
pub use clock::{
    AlarmTime, BUILD_TIMESTAMP, BuildTimestamp, Calendar, CalendarHardware, Clock, ClockTime,
    TickReason, days_in_month, is_leap_year,
};
pub use config::RuntimeConfig;
pub use error::CoreError;
pub use events::{Buttons, EventMask, TimerEvents};
pub use input::{EditItem, Mode};
pub use menu::{Direction, Handler, Module, ModuleHandlers};
pub use runtime::{Control, PowerControl, Runtime, SleepDepth};
pub use signal::{DriverSignals, Mailbox};
