//! Event, timer and button sets exchanged between drivers and modules
//!
//! [`EventMask`] is the composite message handed to bus subscribers. The low
//! seven bits carry calendar and alarm events, followed by a three bit block
//! for the periodic timer and single bits for the remaining drivers.

use bitflags::bitflags;

/// Position of the periodic timer block inside [`EventMask`].
pub const TIMER_BLOCK_SHIFT: u32 = 7;

bitflags! {
    /// Set of system messages delivered through the message bus.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct EventMask: u16 {
        /// The user alarm matched the current time
        const ALARM = 1 << 0;
        const SECOND = 1 << 1;
        const MINUTE = 1 << 2;
        const HOUR = 1 << 3;
        const DAY = 1 << 4;
        const MONTH = 1 << 5;
        const YEAR = 1 << 6;
        /// Periodic timer, every four seconds
        const TIMER_4S = 1 << 7;
        /// Periodic timer, 20 Hz
        const TIMER_20HZ = 1 << 8;
        /// Programmable one-shot/periodic timer
        const TIMER_PROG = 1 << 9;
        /// Motion sensor raised its interrupt line
        const ACCEL_INT = 1 << 10;
        /// Never produced by a driver; modules pass it to their own handlers
        /// to force a refresh outside of the dispatch cycle.
        const FAKE = 1 << 11;
        const BUZZER_FINISHED = 1 << 12;
        /// A battery sample is due (scheduled once per minute)
        const BATTERY = 1 << 13;
        const RADIO = 1 << 14;

        /// Every event produced by the real-time clock
        const CALENDAR = Self::ALARM.bits()
            | Self::SECOND.bits()
            | Self::MINUTE.bits()
            | Self::HOUR.bits()
            | Self::DAY.bits()
            | Self::MONTH.bits()
            | Self::YEAR.bits();
    }
}

bitflags! {
    /// Ticks posted by the periodic timer interrupt.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TimerEvents: u8 {
        const FOUR_SECONDS = 1 << 0;
        const TWENTY_HZ = 1 << 1;
        const PROGRAMMABLE = 1 << 2;
    }
}

bitflags! {
    /// Button edges latched by the port interrupt since the last wake cycle.
    ///
    /// Short and long presses are distinct bits; the port driver decides
    /// which one a release was.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Buttons: u8 {
        /// Short press of the settings (star) button
        const SETTINGS = 1 << 0;
        /// Short press of the function (num) button
        const FUNCTION = 1 << 1;
        const UP = 1 << 2;
        const DOWN = 1 << 3;
        const LONG_SETTINGS = 1 << 4;
        const LONG_FUNCTION = 1 << 5;
        const BACKLIGHT = 1 << 6;
    }
}

impl EventMask {
    /// Map the periodic timer block into its slot of the composite message.
    pub const fn from_timer(events: TimerEvents) -> Self {
        Self::from_bits_truncate((events.bits() as u16) << TIMER_BLOCK_SHIFT)
    }

    /// Extract the periodic timer block from a composite message.
    pub const fn timer(self) -> TimerEvents {
        TimerEvents::from_bits_truncate((self.bits() >> TIMER_BLOCK_SHIFT) as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_block_lands_above_calendar_bits() {
        let mask = EventMask::from_timer(TimerEvents::FOUR_SECONDS | TimerEvents::TWENTY_HZ);
        assert_eq!(mask, EventMask::TIMER_4S | EventMask::TIMER_20HZ);
        assert!(!mask.intersects(EventMask::CALENDAR));
        assert_eq!(
            (mask | EventMask::MINUTE).timer(),
            TimerEvents::FOUR_SECONDS | TimerEvents::TWENTY_HZ
        );
    }

    #[test]
    fn test_programmable_timer_maps_to_bit_nine() {
        assert_eq!(
            EventMask::from_timer(TimerEvents::PROGRAMMABLE).bits(),
            1 << 9
        );
    }

    #[test]
    fn test_calendar_covers_only_low_seven_bits() {
        assert_eq!(EventMask::CALENDAR.bits(), 0x7f);
    }
}
