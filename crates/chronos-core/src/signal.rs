//! Interrupt-to-main-loop mailboxes
//!
//! Interrupt handlers only ever OR bits into a [`Mailbox`]; the main loop
//! empties every mailbox once per wake cycle. Both sides go through a
//! critical section so a bit set between the consumer's read and its clear
//! cannot be lost.

use core::cell::Cell;
use core::ops::BitOr;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

use crate::events::{Buttons, EventMask, TimerEvents};

/// Accumulating single-slot mailbox shared with interrupt context.
pub struct Mailbox<T: Copy> {
    slot: Mutex<CriticalSectionRawMutex, Cell<T>>,
    empty: T,
}

impl<T> Mailbox<T>
where
    T: Copy + PartialEq + BitOr<Output = T>,
{
    /// Create a mailbox whose cleared state is `empty`.
    pub const fn new(empty: T) -> Self {
        Self {
            slot: Mutex::new(Cell::new(empty)),
            empty,
        }
    }

    /// Merge `value` into whatever is still pending.
    pub fn post(&self, value: T) {
        self.slot.lock(|slot| slot.set(slot.get() | value));
    }

    /// Read and clear the pending value in one masked section.
    pub fn take(&self) -> T {
        self.slot.lock(|slot| slot.replace(self.empty))
    }

    /// Current pending value, leaving it in place.
    pub fn peek(&self) -> T {
        self.slot.lock(|slot| slot.get())
    }

    pub fn is_pending(&self) -> bool {
        self.peek() != self.empty
    }
}

/// Mailboxes for every driver except the real-time clock, which keeps its
/// own pending register next to its shadow state.
pub struct DriverSignals {
    timer: Mailbox<TimerEvents>,
    accel: Mailbox<bool>,
    buzzer_finished: Mailbox<bool>,
    radio: Mailbox<bool>,
    buttons: Mailbox<Buttons>,
    audio_active: Mailbox<bool>,
}

impl DriverSignals {
    pub const fn new() -> Self {
        Self {
            timer: Mailbox::new(TimerEvents::empty()),
            accel: Mailbox::new(false),
            buzzer_finished: Mailbox::new(false),
            radio: Mailbox::new(false),
            buttons: Mailbox::new(Buttons::empty()),
            audio_active: Mailbox::new(false),
        }
    }

    // Producer side, called from interrupt handlers.

    pub fn post_timer(&self, events: TimerEvents) {
        self.timer.post(events);
    }

    pub fn post_accel_interrupt(&self) {
        self.accel.post(true);
    }

    /// The buzzer finished its melody; also clears the audio-active flag.
    pub fn post_buzzer_finished(&self) {
        self.buzzer_finished.post(true);
        self.audio_active.take();
    }

    pub fn post_radio_event(&self) {
        self.radio.post(true);
    }

    pub fn post_buttons(&self, buttons: Buttons) {
        self.buttons.post(buttons);
    }

    /// Mark that audio is playing, so the main loop only light-sleeps.
    pub fn set_audio_active(&self) {
        self.audio_active.post(true);
    }

    // Consumer side, called once per wake cycle.

    /// Merge the clock's drained events with every other pending source into
    /// one composite message, clearing each source as it is read.
    ///
    /// When `battery_monitor` is set, a battery sample is scheduled on every
    /// minute boundary.
    pub fn collect(&self, clock_events: EventMask, battery_monitor: bool) -> EventMask {
        let mut msg = clock_events;

        msg |= EventMask::from_timer(self.timer.take());

        if self.accel.take() {
            msg |= EventMask::ACCEL_INT;
        }

        if self.buzzer_finished.take() {
            msg |= EventMask::BUZZER_FINISHED;
        }

        if battery_monitor && msg.contains(EventMask::MINUTE) {
            msg |= EventMask::BATTERY;
        }

        if self.radio.take() {
            msg |= EventMask::RADIO;
        }

        msg
    }

    /// Take the button edges latched since the previous cycle.
    pub fn take_buttons(&self) -> Buttons {
        self.buttons.take()
    }

    pub fn audio_active(&self) -> bool {
        self.audio_active.peek()
    }
}

impl Default for DriverSignals {
    fn default() -> Self {
        Self::new()
    }
}
