//! Calendar dates as seen in the user's configured timezone.

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, Utc};
use chrono_tz::Tz;
use log::warn;
use serde::{Deserialize, Serialize};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Day picker used by the entries list.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntryDateFilter {
    Yesterday,
    #[default]
    Today,
    Tomorrow,
}

/// Calendar date of `instant` in `timezone`, or in the local zone when unset or unknown.
pub fn local_date(instant: DateTime<Utc>, timezone: Option<&str>) -> NaiveDate {
    match timezone.map(str::trim).filter(|zone| !zone.is_empty()) {
        Some(zone) => match zone.parse::<Tz>() {
            Ok(tz) => instant.with_timezone(&tz).date_naive(),
            Err(_) => {
                warn!("Unknown timezone {:?}, using local time", zone);
                instant.with_timezone(&Local).date_naive()
            }
        },
        None => instant.with_timezone(&Local).date_naive(),
    }
}

/// `YYYY-MM-DD` of `instant` in `timezone`.
pub fn date_on_timezone(instant: DateTime<Utc>, timezone: Option<&str>) -> String {
    local_date(instant, timezone).format(DATE_FORMAT).to_string()
}

/// Date string for the day `filter` picks, relative to `now`.
pub fn filter_date(filter: EntryDateFilter, now: DateTime<Utc>, timezone: Option<&str>) -> String {
    let instant = match filter {
        EntryDateFilter::Yesterday => now - Duration::days(1),
        EntryDateFilter::Today => now,
        EntryDateFilter::Tomorrow => now + Duration::days(1),
    };
    date_on_timezone(instant, timezone)
}

/// `(from, to)` covering the current week so far: the most recent Sunday through today.
pub fn week_range(now: DateTime<Utc>, timezone: Option<&str>) -> (String, String) {
    let today = local_date(now, timezone);
    let since_sunday = i64::from(today.weekday().num_days_from_sunday());
    let sunday = today - Duration::days(since_sunday);
    (
        sunday.format(DATE_FORMAT).to_string(),
        today.format(DATE_FORMAT).to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn formats_in_named_timezone() {
        let instant = utc(10, 23);
        assert_eq!(date_on_timezone(instant, Some("UTC")), "2024-01-10");
        assert_eq!(date_on_timezone(instant, Some("Europe/Berlin")), "2024-01-11");
        assert_eq!(date_on_timezone(utc(10, 3), Some("America/New_York")), "2024-01-09");
    }

    #[test]
    fn unknown_timezone_uses_local_zone() {
        let instant = utc(10, 12);
        let local = instant.with_timezone(&Local).format("%Y-%m-%d").to_string();
        assert_eq!(date_on_timezone(instant, Some("Mars/Olympus")), local);
        assert_eq!(date_on_timezone(instant, None), local);
        assert_eq!(date_on_timezone(instant, Some(" ")), local);
    }

    #[test]
    fn filter_dates_shift_by_one_day() {
        let now = utc(10, 12);
        assert_eq!(filter_date(EntryDateFilter::Yesterday, now, Some("UTC")), "2024-01-09");
        assert_eq!(filter_date(EntryDateFilter::Today, now, Some("UTC")), "2024-01-10");
        assert_eq!(filter_date(EntryDateFilter::Tomorrow, now, Some("UTC")), "2024-01-11");
    }

    #[test]
    fn week_starts_on_sunday() {
        // 2024-01-10 is a Wednesday.
        assert_eq!(
            week_range(utc(10, 12), Some("UTC")),
            ("2024-01-07".to_string(), "2024-01-10".to_string())
        );
        assert_eq!(
            week_range(utc(8, 12), Some("UTC")),
            ("2024-01-07".to_string(), "2024-01-08".to_string())
        );
        assert_eq!(
            week_range(utc(14, 12), Some("UTC")),
            ("2024-01-14".to_string(), "2024-01-14".to_string())
        );
    }

    #[test]
    fn week_follows_timezone_day() {
        // Saturday evening in New York is already Sunday in UTC.
        assert_eq!(
            week_range(utc(14, 2), Some("America/New_York")),
            ("2024-01-07".to_string(), "2024-01-13".to_string())
        );
    }
}
