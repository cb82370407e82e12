//! Test doubles shared by the unit tests.

use crate::clock::{AlarmTime, Calendar, CalendarHardware, days_in_month};

/// In-memory calendar peripheral that counts only when told to.
#[derive(Debug, Default)]
pub(crate) struct FakeRtc {
    pub cal: Calendar,
    pub alarm: AlarmTime,
    pub running: bool,
    pub stops: usize,
    pub alarm_interrupt: bool,
    pub tick_interrupts: bool,
}

impl FakeRtc {
    pub fn at(cal: Calendar) -> Self {
        Self {
            cal,
            running: true,
            ..Self::default()
        }
    }

    /// Wednesday 2023-03-15 12:00:00
    pub fn sample_calendar() -> Calendar {
        Calendar {
            year: 2023,
            month: 3,
            day: 15,
            dow: 3,
            hour: 12,
            minute: 0,
            second: 0,
        }
    }

    /// Move the registers to the start of the next minute, the way the
    /// peripheral does right before raising its time event.
    pub fn advance_minute(&mut self) {
        let cal = &mut self.cal;
        cal.second = 0;
        cal.minute += 1;
        if cal.minute < 60 {
            return;
        }

        cal.minute = 0;
        cal.hour += 1;
        if cal.hour < 24 {
            return;
        }

        cal.hour = 0;
        cal.dow = (cal.dow + 1) % 7;
        cal.day += 1;
        if cal.day <= days_in_month(cal.month, cal.year) {
            return;
        }

        cal.day = 1;
        cal.month += 1;
        if cal.month <= 12 {
            return;
        }

        cal.month = 1;
        cal.year += 1;
    }
}

impl CalendarHardware for FakeRtc {
    fn read(&self) -> Calendar {
        self.cal
    }

    fn write_time(&mut self, hour: u8, minute: u8, second: u8) {
        self.cal.hour = hour;
        self.cal.minute = minute;
        self.cal.second = second;
    }

    fn write_date(&mut self, year: u16, month: u8, day: u8) {
        self.cal.year = year;
        self.cal.month = month;
        self.cal.day = day;
    }

    fn write_day_of_week(&mut self, dow: u8) {
        self.cal.dow = dow;
    }

    fn start(&mut self) {
        self.running = true;
    }

    fn stop(&mut self) {
        self.running = false;
        self.stops += 1;
    }

    fn alarm(&self) -> AlarmTime {
        self.alarm
    }

    fn write_alarm(&mut self, alarm: AlarmTime) {
        self.alarm = alarm;
    }

    fn set_alarm_interrupt(&mut self, enabled: bool) {
        self.alarm_interrupt = enabled;
    }

    fn enable_tick_interrupts(&mut self) {
        self.tick_interrupts = true;
    }
}
