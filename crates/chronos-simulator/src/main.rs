//! Desktop simulator for the chronos watch core.
//!
//! Drives the real runtime against a simulated calendar peripheral, as fast
//! as the host allows. Each "sleep" of the main loop advances simulated time
//! by one second and replays the button presses scripted for that second.
//!
//! `--build-time` seeds the clock from the build timestamp instead of the
//! fixed demo date. Set `RUST_LOG=debug` to see every dispatched message.

mod modules;
mod rtc;
mod script;

use clap::Parser;
use log::{debug, error, info};

use chronos_core::{
    BUILD_TIMESTAMP, BuildTimestamp, Clock, DriverSignals, PowerControl, Runtime, RuntimeConfig,
    SleepDepth, TimerEvents,
};

use modules::App;
use rtc::SimulatedRtc;

pub static CLOCK: Clock<SimulatedRtc> = Clock::new(SimulatedRtc);
pub static SIGNALS: DriverSignals = DriverSignals::new();

/// Seconds the buzzer keeps playing once started.
const BUZZER_SECONDS: u8 = 3;

/// Thursday before midnight on a leap day.
const DEMO_SEED: BuildTimestamp = BuildTimestamp {
    year: 2024,
    month: 2,
    day: 29,
    dow: 4,
    hour: 23,
    minute: 57,
};

/// Run the chronos core against a simulated watch.
#[derive(Parser, Debug)]
#[command(name = "chronos-simulator", version, about)]
struct Options {
    /// Simulated seconds to run
    #[arg(long, default_value_t = 300)]
    seconds: u32,

    /// Seed the clock from the build timestamp instead of the demo date
    #[arg(long)]
    build_time: bool,
}

/// Board hooks for the simulated watch. Sleeping is where time passes.
struct SimulatedBoard {
    elapsed: u32,
    limit: u32,
    buzzer_left: u8,
}

impl SimulatedBoard {
    fn new(limit: u32) -> Self {
        Self {
            elapsed: 0,
            limit,
            buzzer_left: 0,
        }
    }

    /// Let one second pass: count the RTC, fire its interrupts, and post
    /// the timer, buzzer and scripted button events for that second.
    fn advance(&mut self) {
        self.elapsed += 1;

        for reason in rtc::step_second() {
            CLOCK.on_tick(reason);
        }
        if self.elapsed % 4 == 0 {
            SIGNALS.post_timer(TimerEvents::FOUR_SECONDS);
        }
        self.tick_buzzer();

        let buttons = script::buttons_at(self.elapsed);
        if !buttons.is_empty() {
            info!("t={} press {:?}", self.elapsed, buttons);
            SIGNALS.post_buttons(buttons);
        }
    }

    fn tick_buzzer(&mut self) {
        if !SIGNALS.audio_active() {
            self.buzzer_left = 0;
            return;
        }

        if self.buzzer_left == 0 {
            self.buzzer_left = BUZZER_SECONDS;
        }
        self.buzzer_left -= 1;
        if self.buzzer_left == 0 {
            debug!("Buzzer finished");
            SIGNALS.post_buzzer_finished();
        }
    }
}

impl PowerControl for SimulatedBoard {
    fn sleep(&mut self, depth: SleepDepth) {
        if self.elapsed >= self.limit {
            let t = CLOCK.time();
            info!(
                "Simulation finished after {} s at {:04}-{:02}-{:02} {:02}:{:02}:{:02}",
                self.elapsed, t.year, t.month, t.day, t.hour, t.minute, t.second
            );
            // Runtime::run never returns; ending the process is the only exit.
            std::process::exit(0);
        }

        debug!("t={} sleeping ({:?})", self.elapsed + 1, depth);
        self.advance();
    }

    fn feed_watchdog(&mut self) {}
}

/// Seed the clock and register every module.
fn boot(seed: BuildTimestamp) -> Result<(Runtime<App>, App), chronos_core::CoreError> {
    CLOCK.init(seed);

    let mut app = App::default();
    let mut runtime = Runtime::new(RuntimeConfig::default());
    modules::install(&mut runtime, &mut app)?;

    let config = runtime.config();
    info!(
        "Menu timeout {} s, edit timeout {} s, battery monitor {}",
        config.menu_timeout_secs, config.edit_timeout_secs, config.battery_monitor
    );
    let menu = runtime.menu();
    for name in (0..menu.len()).filter_map(|i| menu.get(i)).map(|m| m.name) {
        info!("Menu entry '{}'", name);
    }

    Ok((runtime, app))
}

fn main() {
    env_logger::init();
    let options = Options::parse();

    info!("Starting chronos simulator for {} s", options.seconds);

    let seed = if options.build_time {
        BUILD_TIMESTAMP
    } else {
        DEMO_SEED
    };

    let (mut runtime, mut app) = match boot(seed) {
        Ok(booted) => booted,
        Err(e) => {
            error!("Module registration failed: {}", e);
            std::process::exit(1);
        }
    };

    let mut board = SimulatedBoard::new(options.seconds);
    runtime.run(&mut app, &CLOCK, &SIGNALS, &mut board)
}
