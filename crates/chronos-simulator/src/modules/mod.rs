//! Application modules plugged into the runtime by the simulator.

pub mod alarm;
pub mod clock;

use log::info;

use chronos_core::{CoreError, Runtime};

pub use alarm::Alarm;
pub use clock::ClockFace;

/// Stand-in for the segment display: remembers the last line and logs
/// whenever it changes.
#[derive(Debug, Default)]
pub struct Screen {
    line: String,
}

impl Screen {
    pub fn show(&mut self, line: String) {
        if line != self.line {
            info!("[lcd] {}", line);
            self.line = line;
        }
    }

    pub fn clear(&mut self) {
        self.line.clear();
    }
}

/// Application context handed to every module callback.
#[derive(Debug, Default)]
pub struct App {
    pub screen: Screen,
    pub face: ClockFace,
    pub alarm: Alarm,
}

/// Register every module in menu order. The first one is the default screen.
pub fn install(runtime: &mut Runtime<App>, app: &mut App) -> Result<(), CoreError> {
    runtime.add_module(app, clock::MODULE)?;
    runtime.add_module(app, alarm::MODULE)?;
    Ok(())
}
