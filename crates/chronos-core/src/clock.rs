//! Real-time clock driver with cascading calendar events
//!
//! The calendar hardware does all the counting. [`Clock`] keeps a shadow copy
//! of its registers and, on every interrupt, reloads only the fields that can
//! have changed: a minute event reloads the minute, and only when the minute
//! rolled over to 0 does it look at the hour, and so on up to the year. No
//! date arithmetic happens here; the coarser events are implied purely by the
//! finer field sitting on its reset value.
//!
//! ## Contexts
//!
//! - [`Clock::on_tick`] runs in interrupt context. It updates the shadow state
//!   and ORs the produced events into the pending register.
//! - [`Clock::drain`] runs once per wake cycle in the main loop.
//! - [`Clock::set_time`], [`Clock::set_date`] and the alarm setters run in the
//!   main loop.
//!
//! All of them go through the same critical section, so a tick can never
//! observe a half-written time and a drain can never lose a bit posted
//! between its read and its clear.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use log::{info, trace};

use crate::events::EventMask;

include!(concat!(env!("OUT_DIR"), "/build_time.rs"));

/// Snapshot of the counting registers of the calendar hardware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Calendar {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    /// Day of week, 0 = Sunday
    pub dow: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

/// Shadow calendar state maintained by the clock driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClockTime {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub dow: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    /// Seconds since boot. Only ever incremented, wraps on overflow.
    pub sys: u32,
}

/// User alarm as stored in the alarm registers.
///
/// `enabled` is kept apart from the numeric value: toggling it never touches
/// the stored hour and minute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AlarmTime {
    pub hour: u8,
    pub minute: u8,
    pub enabled: bool,
}

/// Calendar time at which the firmware image was built.
///
/// Used as the cold-boot seed when the backup domain lost power.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildTimestamp {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub dow: u8,
    pub hour: u8,
    pub minute: u8,
}

/// Why the clock interrupt fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickReason {
    /// Registers are safe to read; happens once per second
    Ready,
    /// Minute boundary time event
    Minute,
    /// The user alarm matched
    Alarm,
    /// Any other interrupt vector; produces no event
    Spurious,
}

/// Access to the calendar peripheral.
///
/// Implementations only move numbers in and out of registers; all decisions
/// are made by [`Clock`].
pub trait CalendarHardware {
    /// Read the counting registers.
    fn read(&self) -> Calendar;

    fn write_time(&mut self, hour: u8, minute: u8, second: u8);

    fn write_date(&mut self, year: u16, month: u8, day: u8);

    fn write_day_of_week(&mut self, dow: u8);

    /// Resume counting.
    fn start(&mut self);

    /// Halt counting so fields can be written consistently.
    fn stop(&mut self);

    /// Read the alarm registers, including the per-field enable bits.
    fn alarm(&self) -> AlarmTime;

    fn write_alarm(&mut self, alarm: AlarmTime);

    fn set_alarm_interrupt(&mut self, enabled: bool);

    /// Enable the once-per-second ready interrupt and the minute time event.
    fn enable_tick_interrupts(&mut self);
}

struct ClockInner<H> {
    hw: H,
    time: ClockTime,
    pending: EventMask,
}

impl<H: CalendarHardware> ClockInner<H> {
    fn tick(&mut self, reason: TickReason) -> EventMask {
        match reason {
            TickReason::Ready => {
                let regs = self.hw.read();
                self.time.second = regs.second;
                self.time.sys = self.time.sys.wrapping_add(1);
                EventMask::SECOND
            }
            TickReason::Minute => {
                let regs = self.hw.read();
                self.time.second = regs.second;
                self.time.sys = self.time.sys.wrapping_add(1);

                let mut ev = EventMask::MINUTE;
                self.time.minute = regs.minute;
                if self.time.minute != 0 {
                    return ev;
                }

                ev |= EventMask::HOUR;
                self.time.hour = regs.hour;
                if self.time.hour != 0 {
                    return ev;
                }

                ev |= EventMask::DAY;
                self.time.day = regs.day;
                self.time.dow = regs.dow;
                if self.time.day != 1 {
                    return ev;
                }

                ev |= EventMask::MONTH;
                self.time.month = regs.month;
                if self.time.month != 1 {
                    return ev;
                }

                ev |= EventMask::YEAR;
                self.time.year = regs.year;
                ev
            }
            TickReason::Alarm => EventMask::ALARM,
            TickReason::Spurious => EventMask::empty(),
        }
    }
}

/// The real-time clock driver.
///
/// `Clock::new` is `const` so a board crate can keep the driver in a
/// `static` shared between the interrupt handler and the main loop.
pub struct Clock<H> {
    inner: Mutex<CriticalSectionRawMutex, RefCell<ClockInner<H>>>,
}

impl<H: CalendarHardware> Clock<H> {
    pub const fn new(hw: H) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(ClockInner {
                hw,
                time: ClockTime {
                    year: 0,
                    month: 0,
                    day: 0,
                    dow: 0,
                    hour: 0,
                    minute: 0,
                    second: 0,
                    sys: 0,
                },
                pending: EventMask::empty(),
            })),
        }
    }

    /// Seed shadow state and hardware from `seed` and start counting.
    ///
    /// Seconds start at 59 so the first minute event arrives right away.
    pub fn init(&self, seed: BuildTimestamp) {
        self.with_inner(|inner| {
            inner.time = ClockTime {
                year: seed.year,
                month: seed.month,
                day: seed.day,
                dow: seed.dow,
                hour: seed.hour,
                minute: seed.minute,
                second: 59,
                sys: inner.time.sys,
            };

            let t = inner.time;
            inner.hw.stop();
            inner.hw.write_time(t.hour, t.minute, t.second);
            inner.hw.write_date(t.year, t.month, t.day);
            inner.hw.write_day_of_week(t.dow);
            inner.hw.start();
            inner.hw.enable_tick_interrupts();
        });

        info!(
            "Clock seeded to {:04}-{:02}-{:02} {:02}:{:02}:59",
            seed.year, seed.month, seed.day, seed.hour, seed.minute
        );
    }

    /// Interrupt entry point.
    ///
    /// Returns the events produced by this tick; they are also accumulated
    /// into the pending register until the next [`drain`](Self::drain).
    pub fn on_tick(&self, reason: TickReason) -> EventMask {
        let ev = self.with_inner(|inner| {
            let ev = inner.tick(reason);
            inner.pending |= ev;
            ev
        });
        trace!("rtc tick {:?} -> {:?}", reason, ev);
        ev
    }

    /// Read and clear every event accumulated since the previous drain.
    pub fn drain(&self) -> EventMask {
        self.with_inner(|inner| core::mem::take(&mut inner.pending))
    }

    /// Snapshot of the shadow calendar.
    pub fn time(&self) -> ClockTime {
        self.with_inner(|inner| inner.time)
    }

    /// Seconds since boot.
    pub fn sys(&self) -> u32 {
        self.with_inner(|inner| inner.time.sys)
    }

    /// Write hour, minute and second with counting halted.
    pub fn set_time(&self, hour: u8, minute: u8, second: u8) {
        self.with_inner(|inner| {
            inner.time.hour = hour;
            inner.time.minute = minute;
            inner.time.second = second;

            inner.hw.stop();
            inner.hw.write_time(hour, minute, second);
            inner.hw.start();
        });
    }

    /// Write year, month and day with counting halted.
    ///
    /// The day-of-week register is left alone.
    pub fn set_date(&self, year: u16, month: u8, day: u8) {
        self.with_inner(|inner| {
            inner.time.year = year;
            inner.time.month = month;
            inner.time.day = day;

            inner.hw.stop();
            inner.hw.write_date(year, month, day);
            inner.hw.start();
        });
    }

    pub fn alarm(&self) -> AlarmTime {
        self.with_inner(|inner| inner.hw.alarm())
    }

    /// Store a new alarm time, keeping the current enable state.
    pub fn set_alarm(&self, hour: u8, minute: u8) {
        self.with_inner(|inner| {
            let enabled = inner.hw.alarm().enabled;
            inner.hw.write_alarm(AlarmTime {
                hour,
                minute,
                enabled,
            });
        });
    }

    pub fn enable_alarm(&self) {
        self.with_inner(|inner| {
            let alarm = inner.hw.alarm();
            inner.hw.set_alarm_interrupt(false);
            inner.hw.write_alarm(AlarmTime {
                enabled: true,
                ..alarm
            });
            inner.hw.set_alarm_interrupt(true);
        });
    }

    pub fn disable_alarm(&self) {
        self.with_inner(|inner| {
            let alarm = inner.hw.alarm();
            inner.hw.write_alarm(AlarmTime {
                enabled: false,
                ..alarm
            });
            inner.hw.set_alarm_interrupt(false);
        });
    }

    fn with_inner<R>(&self, f: impl FnOnce(&mut ClockInner<H>) -> R) -> R {
        self.inner.lock(|cell| f(&mut cell.borrow_mut()))
    }
}

/// Gregorian leap year rule.
pub const fn is_leap_year(year: u16) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Number of days in `month` (1-12) of `year`, or 0 for an invalid month.
pub const fn days_in_month(month: u8, year: u16) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}
