//! Conversions between second/minute counts and the clock-style strings shown to the user.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::TimeInputError;

static ELAPSED_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+):(\d+)(?::(\d+))?$").expect("invalid elapsed regex"));

const TIME_REQUIRED: &str =
    "Time is required. Enter time in h:mm format (e.g., 1:30) or minutes (e.g., 90)";
const INVALID_CLOCK: &str = "Invalid time format. Use h:mm (e.g., 1:30)";
const INVALID_NUMBER: &str = "Invalid time format. Use h:mm (e.g., 1:30) or minutes (e.g., 90)";

/// Formats seconds as `HH:MM:SS`, or `MM:SS` below one hour.
pub fn format_duration(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}

/// Formats minutes as `H:MM` with unpadded hours.
pub fn format_minutes_as_hours_colon_minutes(total_minutes: u64) -> String {
    format!("{}:{:02}", total_minutes / 60, total_minutes % 60)
}

/// Formats minutes as `HH:MM`, hours padded to at least two digits.
pub fn format_hours_minutes(total_minutes: u64) -> String {
    format!("{:02}:{:02}", total_minutes / 60, total_minutes % 60)
}

/// Parses time typed into a form: either `h:mm` or a plain number of minutes.
///
/// Decimal minutes are rounded to the nearest whole minute.
pub fn parse_user_time_input(text: &str) -> Result<u32, TimeInputError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(TimeInputError::invalid(TIME_REQUIRED));
    }

    if trimmed.contains(':') {
        let parts: Vec<&str> = trimmed.split(':').collect();
        let [hours, minutes] = parts.as_slice() else {
            return Err(TimeInputError::invalid(INVALID_CLOCK));
        };
        let hours: u32 = hours
            .trim()
            .parse()
            .map_err(|_| TimeInputError::invalid(INVALID_CLOCK))?;
        let minutes: u32 = minutes
            .trim()
            .parse()
            .map_err(|_| TimeInputError::invalid(INVALID_CLOCK))?;
        if minutes >= 60 {
            return Err(TimeInputError::invalid(INVALID_CLOCK));
        }
        return hours
            .checked_mul(60)
            .and_then(|total| total.checked_add(minutes))
            .ok_or_else(|| TimeInputError::invalid(INVALID_CLOCK));
    }

    let value: f64 = trimmed
        .parse()
        .map_err(|_| TimeInputError::invalid(INVALID_NUMBER))?;
    if !value.is_finite() || value < 0.0 || value > f64::from(u32::MAX) {
        return Err(TimeInputError::invalid(INVALID_NUMBER));
    }
    Ok(value.round() as u32)
}

/// Reads a `H:MM:SS` or `MM:SS` display back into whole minutes.
///
/// Seconds round half-up to the nearest minute. Anything else reads as zero.
pub fn minutes_from_formatted_elapsed(elapsed: &str) -> u64 {
    let Some(captures) = ELAPSED_REGEX.captures(elapsed.trim()) else {
        return 0;
    };
    let number = |index: usize| -> u64 {
        captures
            .get(index)
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(0)
    };

    let (hours, minutes, seconds) = if captures.get(3).is_some() {
        (number(1), number(2), number(3))
    } else {
        (0, number(1), number(2))
    };
    hours
        .saturating_mul(60)
        .saturating_add(minutes)
        .saturating_add(seconds.saturating_add(30) / 60)
}
