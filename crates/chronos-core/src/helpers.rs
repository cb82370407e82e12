/// Step `value` by one in the direction of `step`, wrapping inside
/// `lower..=upper`.
///
/// Values already outside the range are pulled back in: stepping up from
/// `upper` or above lands on `lower`, stepping down from `lower` or below lands
/// on `upper`. A zero `step` leaves the value alone.
pub fn wrap_step(value: u8, lower: u8, upper: u8, step: i8) -> u8 {
    match step.signum() {
        1 if value >= upper => lower,
        1 => value.max(lower.saturating_sub(1)) + 1,
        -1 if value <= lower => upper,
        -1 => value.min(upper.saturating_add(1)) - 1,
        _ => value,
    }
}
