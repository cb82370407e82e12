//! Time-of-day face. Subscribes to calendar events only while visible.

use log::warn;

use chronos_core::{Control, EventMask, Module, ModuleHandlers};

use super::App;
use crate::CLOCK;

const WEEKDAYS: [&str; 7] = ["SUN", "MON", "TUE", "WED", "THU", "FRI", "SAT"];

#[derive(Debug, Default)]
pub struct ClockFace {
    show_date: bool,
}

impl ClockFace {
    pub fn showing_date(&self) -> bool {
        self.show_date
    }
}

pub const MODULE: Module<App> = Module::new(
    "time",
    ModuleHandlers::new()
        .on_activate(activate)
        .on_deactivate(deactivate)
        .on_function(toggle_date),
);

fn draw(app: &mut App) {
    let t = CLOCK.time();
    let line = if app.face.showing_date() {
        format!(
            "{} {:04}-{:02}-{:02}",
            WEEKDAYS.get(t.dow as usize).copied().unwrap_or("---"),
            t.year,
            t.month,
            t.day
        )
    } else {
        format!("{:02}:{:02}", t.hour, t.minute)
    };
    app.screen.show(line);
}

fn on_calendar(app: &mut App, _msg: EventMask) {
    draw(app);
}

fn activate(app: &mut App, control: &mut Control<'_, App>) {
    if let Err(e) = control.bus_register(on_calendar, EventMask::MINUTE | EventMask::DAY) {
        warn!("Time face cannot subscribe: {}", e);
    }
    draw(app);
}

fn deactivate(app: &mut App, control: &mut Control<'_, App>) {
    control.bus_unregister(on_calendar);
    app.screen.clear();
}

fn toggle_date(app: &mut App, _: &mut Control<'_, App>) {
    app.face.show_date = !app.face.show_date;
    draw(app);
}
