//! Duration-label parsing.
//!
//! Predicted stay durations arrive as short labels ("5-7 days",
//! "24-48 hours", "3 days"). The grammar is deliberately small:
//! range-of-days, single day, range-of-hours, single hour. Ranges resolve
//! to their midpoint. Anything else parses to `None`; callers apply the
//! documented fallback of 72 hours.

/// Fallback stay length (hours) when a label is missing or unparseable.
pub const DEFAULT_STAY_HOURS: f64 = 72.0;

/// Parses a duration label into hours.
///
/// Accepted shapes (case-insensitive, whitespace-tolerant):
/// `"N-M days"`, `"N days"`, `"N-M hours"`, `"N hours"` (singular unit
/// forms included). Ranges resolve to their midpoint, so `"5-7 days"` is
/// 144 hours and `"24-48 hours"` is 36 hours.
pub fn parse_stay_label(label: &str) -> Option<f64> {
    let label = label.trim().to_ascii_lowercase();
    let (value_part, unit) = split_unit(&label)?;
    let value = parse_value(value_part)?;
    if value < 0.0 {
        return None;
    }
    match unit {
        Unit::Days => Some(value * 24.0),
        Unit::Hours => Some(value),
    }
}

/// Parses a label, falling back to [`DEFAULT_STAY_HOURS`].
pub fn stay_hours_or_default(label: Option<&str>) -> f64 {
    label.and_then(parse_stay_label).unwrap_or(DEFAULT_STAY_HOURS)
}

/// Number of rotation rounds a stay of `hours` warrants at the given
/// cadence: `max(1, floor(hours / interval_hours))`.
pub fn round_count(hours: f64, interval_hours: f64) -> usize {
    if interval_hours <= 0.0 {
        return 1;
    }
    ((hours / interval_hours).floor() as usize).max(1)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unit {
    Days,
    Hours,
}

/// Splits a normalized label into its numeric part and unit.
fn split_unit(label: &str) -> Option<(&str, Unit)> {
    for (suffix, unit) in [
        ("days", Unit::Days),
        ("day", Unit::Days),
        ("hours", Unit::Hours),
        ("hour", Unit::Hours),
    ] {
        if let Some(rest) = label.strip_suffix(suffix) {
            return Some((rest.trim(), unit));
        }
    }
    None
}

/// Parses `"N"` or `"N-M"` (midpoint for ranges).
fn parse_value(text: &str) -> Option<f64> {
    if let Some((lo, hi)) = text.split_once('-') {
        let lo: f64 = lo.trim().parse().ok()?;
        let hi: f64 = hi.trim().parse().ok()?;
        Some((lo + hi) / 2.0)
    } else {
        text.trim().parse().ok()
    }
}
