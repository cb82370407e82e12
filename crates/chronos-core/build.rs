//! Generates the cold-boot seed for the real-time clock.
//!
//! The watch has no other source of wall time after a battery change, so the
//! firmware starts from the moment it was built. `CHRONOS_SEED_TIME`
//! (`YYYY-MM-DDTHH:MM`, from the environment or a `.env` file) overrides the
//! host clock for reproducible builds.

use std::env;
use std::fs;
use std::path::PathBuf;

use chrono::{Datelike, NaiveDateTime, Timelike, Utc};

const SEED_FORMAT: &str = "%Y-%m-%dT%H:%M";

fn main() {
    println!("cargo:rerun-if-env-changed=CHRONOS_SEED_TIME");
    println!("cargo:rerun-if-changed=.env");

    dotenvy::dotenv().ok();

    let seed = match env::var("CHRONOS_SEED_TIME") {
        Ok(value) => NaiveDateTime::parse_from_str(value.trim(), SEED_FORMAT)
            .unwrap_or_else(|e| {
                panic!("CHRONOS_SEED_TIME must look like 2024-02-29T13:37, got {value:?}: {e}")
            }),
        Err(_) => Utc::now().naive_utc(),
    };

    let year = u16::try_from(seed.year())
        .unwrap_or_else(|_| panic!("seed year {} does not fit the calendar", seed.year()));

    let generated = format!(
        "/// Calendar time at which this firmware image was built.\n\
         pub const BUILD_TIMESTAMP: BuildTimestamp = BuildTimestamp {{\n    \
         year: {},\n    month: {},\n    day: {},\n    dow: {},\n    hour: {},\n    minute: {},\n}};\n",
        year,
        seed.month(),
        seed.day(),
        seed.weekday().num_days_from_sunday(),
        seed.hour(),
        seed.minute()
    );

    let out = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR is set by cargo"));
    fs::write(out.join("build_time.rs"), generated).expect("failed to write build_time.rs");
}
