//! Scripted button presses, keyed by simulated second.
//!
//! The default seed is 2024-02-29 23:57:59, so the run crosses the leap day
//! into March. The alarm module binds a long settings press, which reserves
//! the short one, so the menu cannot be opened from it: the alarm face is the
//! last screen visited, and its 00:02 alarm rings after about four minutes.

use chronos_core::Buttons;

pub const SCRIPT: &[(u32, Buttons)] = &[
    // Browse the menu from the time face but let it time out.
    (3, Buttons::SETTINGS),
    (4, Buttons::UP),
    // Back on the time face: show the date, then the time again.
    (11, Buttons::FUNCTION),
    (14, Buttons::FUNCTION),
    // Open the menu and pick the alarm module.
    (16, Buttons::SETTINGS),
    (17, Buttons::UP),
    (18, Buttons::SETTINGS),
    // Edit the alarm: keep hour 00, bump minutes to 02, save.
    (20, Buttons::LONG_SETTINGS),
    (21, Buttons::FUNCTION),
    (22, Buttons::UP),
    (23, Buttons::UP),
    (24, Buttons::SETTINGS),
    // Arm the one-shot alarm.
    (26, Buttons::FUNCTION),
];

/// Every button pressed at `second`.
pub fn buttons_at(second: u32) -> Buttons {
    SCRIPT
        .iter()
        .filter(|(at, _)| *at == second)
        .fold(Buttons::empty(), |acc, (_, buttons)| acc | *buttons)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buttons_at() {
        assert_eq!(buttons_at(3), Buttons::SETTINGS);
        assert_eq!(buttons_at(20), Buttons::LONG_SETTINGS);
        assert!(buttons_at(1000).is_empty());
    }
}
