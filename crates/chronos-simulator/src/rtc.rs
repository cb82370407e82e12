//! Simulated calendar peripheral.
//!
//! The register file lives in a static, like memory-mapped hardware, and
//! [`SimulatedRtc`] is a zero-sized handle onto it. [`step_second`] plays
//! the role of the oscillator: it counts one second and reports which
//! interrupts the peripheral would raise.

use std::cell::RefCell;

use chronos_core::{AlarmTime, Calendar, CalendarHardware, TickReason, days_in_month};
use critical_section::Mutex;

#[derive(Debug, Clone, Copy)]
struct Registers {
    cal: Calendar,
    alarm: AlarmTime,
    running: bool,
    alarm_interrupt: bool,
    tick_interrupts: bool,
}

static REGISTERS: Mutex<RefCell<Registers>> = Mutex::new(RefCell::new(Registers {
    cal: Calendar {
        year: 2000,
        month: 1,
        day: 1,
        dow: 6,
        hour: 0,
        minute: 0,
        second: 0,
    },
    alarm: AlarmTime {
        hour: 0,
        minute: 0,
        enabled: false,
    },
    running: false,
    alarm_interrupt: false,
    tick_interrupts: false,
}));

fn with_registers<R>(f: impl FnOnce(&mut Registers) -> R) -> R {
    critical_section::with(|cs| f(&mut REGISTERS.borrow_ref_mut(cs)))
}

/// Handle onto the simulated peripheral.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedRtc;

impl CalendarHardware for SimulatedRtc {
    fn read(&self) -> Calendar {
        with_registers(|regs| regs.cal)
    }

    fn write_time(&mut self, hour: u8, minute: u8, second: u8) {
        with_registers(|regs| {
            regs.cal.hour = hour;
            regs.cal.minute = minute;
            regs.cal.second = second;
        });
    }

    fn write_date(&mut self, year: u16, month: u8, day: u8) {
        with_registers(|regs| {
            regs.cal.year = year;
            regs.cal.month = month;
            regs.cal.day = day;
        });
    }

    fn write_day_of_week(&mut self, dow: u8) {
        with_registers(|regs| regs.cal.dow = dow);
    }

    fn start(&mut self) {
        with_registers(|regs| regs.running = true);
    }

    fn stop(&mut self) {
        with_registers(|regs| regs.running = false);
    }

    fn alarm(&self) -> AlarmTime {
        with_registers(|regs| regs.alarm)
    }

    fn write_alarm(&mut self, alarm: AlarmTime) {
        with_registers(|regs| regs.alarm = alarm);
    }

    fn set_alarm_interrupt(&mut self, enabled: bool) {
        with_registers(|regs| regs.alarm_interrupt = enabled);
    }

    fn enable_tick_interrupts(&mut self) {
        with_registers(|regs| regs.tick_interrupts = true);
    }
}

/// Count one second and return the interrupts raised, in delivery order.
///
/// On a minute boundary the time event takes the place of the ready
/// interrupt for that second, so `sys` keeps matching elapsed seconds.
pub fn step_second() -> Vec<TickReason> {
    with_registers(|regs| {
        let mut raised = Vec::new();
        if !regs.running {
            return raised;
        }

        let cal = &mut regs.cal;
        cal.second += 1;
        if cal.second < 60 {
            if regs.tick_interrupts {
                raised.push(TickReason::Ready);
            }
            return raised;
        }

        cal.second = 0;
        roll_minute(cal);
        if regs.tick_interrupts {
            raised.push(TickReason::Minute);
        }

        let alarm = regs.alarm;
        if regs.alarm_interrupt
            && alarm.enabled
            && alarm.hour == regs.cal.hour
            && alarm.minute == regs.cal.minute
        {
            raised.push(TickReason::Alarm);
        }

        raised
    })
}

fn roll_minute(cal: &mut Calendar) {
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
