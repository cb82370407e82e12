//! One-shot alarm and hourly chime.
//!
//! Function cycles through off, alarm, chime and alarm+chime. A long press
//! of settings edits the alarm time (hours, then minutes).

use log::{info, warn};

use chronos_core::helpers::wrap_step;
use chronos_core::{Control, EditItem, EventMask, Module, ModuleHandlers};

use super::App;
use crate::{CLOCK, SIGNALS};

const ALARM_BIT: u8 = 1 << 0;
const CHIME_BIT: u8 = 1 << 1;

const FIELD_HOUR: usize = 0;
const FIELD_MINUTE: usize = 1;

#[derive(Debug, Default)]
pub struct Alarm {
    /// Two-bit counter, bit 0 = one-shot alarm, bit 1 = hourly chime
    state: u8,
    hour: u8,
    minute: u8,
    /// Field currently blinking in edit mode
    editing: Option<usize>,
    rings: u32,
}

impl Alarm {
    pub fn alarm_enabled(&self) -> bool {
        self.state & ALARM_BIT != 0
    }

    pub fn chime_enabled(&self) -> bool {
        self.state & CHIME_BIT != 0
    }

    /// How many times the one-shot alarm went off.
    pub fn rings(&self) -> u32 {
        self.rings
    }

    /// Step to the next alarm/chime combination, wrapping back to off.
    fn next_state(&mut self) {
        self.state = (self.state + 1) & (ALARM_BIT | CHIME_BIT);
    }
}

pub const MODULE: Module<App> = Module::new(
    "alarm",
    ModuleHandlers::new()
        .on_activate(activate)
        .on_deactivate(deactivate)
        .on_function(cycle_state)
        .on_long_settings(start_edit),
);

fn draw(app: &mut App) {
    let a = &app.alarm;
    let blink = |field: usize| if a.editing == Some(field) { "*" } else { "" };
    let line = format!(
        "AL {}{:02}{}:{}{:02}{} [{}{}]",
        blink(FIELD_HOUR),
        a.hour,
        blink(FIELD_HOUR),
        blink(FIELD_MINUTE),
        a.minute,
        blink(FIELD_MINUTE),
        if a.alarm_enabled() { "A" } else { "-" },
        if a.chime_enabled() { "C" } else { "-" },
    );
    app.screen.show(line);
}

fn load_alarm(app: &mut App) {
    let stored = CLOCK.alarm();
    app.alarm.hour = stored.hour;
    app.alarm.minute = stored.minute;
}

fn activate(app: &mut App, _: &mut Control<'_, App>) {
    load_alarm(app);
    draw(app);
}

fn deactivate(app: &mut App, _: &mut Control<'_, App>) {
    app.screen.clear();
}

fn on_event(app: &mut App, msg: EventMask) {
    if msg.contains(EventMask::ALARM) && app.alarm.alarm_enabled() {
        app.alarm.rings += 1;
        info!(
            "Alarm ringing at {:02}:{:02} (#{})",
            app.alarm.hour,
            app.alarm.minute,
            app.alarm.rings()
        );
        SIGNALS.set_audio_active();
    }

    if msg.contains(EventMask::HOUR) && app.alarm.chime_enabled() {
        info!("Hourly chime");
        SIGNALS.set_audio_active();
    }
}

fn cycle_state(app: &mut App, control: &mut Control<'_, App>) {
    app.alarm.next_state();

    // Only stay on the bus while something is enabled.
    control.bus_unregister(on_event);
    if app.alarm.state != 0 {
        if let Err(e) = control.bus_register(on_event, EventMask::ALARM | EventMask::HOUR) {
            warn!("Alarm cannot subscribe: {}", e);
        }
    }

    if app.alarm.alarm_enabled() {
        CLOCK.enable_alarm();
    } else {
        CLOCK.disable_alarm();
    }
    draw(app);
}

fn select_field(app: &mut App, pos: usize) {
    app.alarm.editing = Some(pos);
    draw(app);
}

fn deselect_field(app: &mut App, _pos: usize) {
    app.alarm.editing = None;
}

fn set_field(app: &mut App, pos: usize, step: i8) {
    let a = &mut app.alarm;
    match pos {
        FIELD_HOUR => a.hour = wrap_step(a.hour, 0, 23, step),
        _ => a.minute = wrap_step(a.minute, 0, 59, step),
    }
    draw(app);
}

fn save(app: &mut App) {
    CLOCK.set_alarm(app.alarm.hour, app.alarm.minute);
    info!("Alarm set to {:02}:{:02}", app.alarm.hour, app.alarm.minute);
    load_alarm(app);
    draw(app);
}

fn start_edit(app: &mut App, control: &mut Control<'_, App>) {
    load_alarm(app);
    let field = EditItem::new(select_field, deselect_field, set_field);
    if let Err(e) = control.edit_start(save, &[field, field]) {
        warn!("Alarm edit rejected: {}", e);
    }
}
