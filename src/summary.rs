//! Totals and headline strings for lists of time entries.

use serde::Serialize;

use crate::entries::TimeEntry;
use crate::time_format::format_hours_minutes;

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct EntrySummary {
    pub total_minutes: u64,
    pub billable_minutes: u64,
    pub unbillable_minutes: u64,
    pub entry_count: usize,
    pub total_formatted: String,
    pub billable_formatted: String,
    pub unbillable_formatted: String,
}

impl EntrySummary {
    /// Share of billable time as a whole percentage, halves rounded up.
    pub fn billable_percentage(&self) -> u64 {
        billable_percentage(self.billable_minutes, self.total_minutes)
    }

    fn counted_entries(&self) -> String {
        if self.entry_count == 1 {
            "1 entry".to_string()
        } else {
            format!("{} entries", self.entry_count)
        }
    }

    fn subtitle(&self) -> String {
        format!("{} • {}% billable", self.counted_entries(), self.billable_percentage())
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct EntriesSummary {
    pub title: String,
    pub subtitle: String,
    pub exists: bool,
    pub billable: String,
    pub unbillable: String,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct WeekSummary {
    pub title: String,
    pub subtitle: String,
    pub exists: bool,
    pub total_formatted: String,
    pub billable: String,
    pub unbillable: String,
}

pub fn billable_percentage(billable_minutes: u64, total_minutes: u64) -> u64 {
    if total_minutes == 0 {
        return 0;
    }
    (200 * billable_minutes + total_minutes) / (2 * total_minutes)
}

pub fn calculate_entry_summary<'a, I>(entries: I) -> EntrySummary
where
    I: IntoIterator<Item = &'a TimeEntry>,
{
    let (total_minutes, billable_minutes, entry_count) =
        entries
            .into_iter()
            .fold((0u64, 0u64, 0usize), |(total, billable, count), entry| {
                let minutes = u64::from(entry.minutes);
                let billable = if entry.billable { billable + minutes } else { billable };
                (total + minutes, billable, count + 1)
            });
    let unbillable_minutes = total_minutes - billable_minutes;

    EntrySummary {
        total_minutes,
        billable_minutes,
        unbillable_minutes,
        entry_count,
        total_formatted: format_hours_minutes(total_minutes),
        billable_formatted: format_hours_minutes(billable_minutes),
        unbillable_formatted: format_hours_minutes(unbillable_minutes),
    }
}

pub fn entries_summary<'a, I>(entries: I) -> EntriesSummary
where
    I: IntoIterator<Item = &'a TimeEntry>,
{
    let summary = calculate_entry_summary(entries);
    EntriesSummary {
        title: format!(
            "Total {} • Billable {} • Unbillable {}",
            summary.total_formatted, summary.billable_formatted, summary.unbillable_formatted
        ),
        subtitle: summary.subtitle(),
        exists: summary.entry_count > 0,
        billable: summary.billable_formatted,
        unbillable: summary.unbillable_formatted,
    }
}

/// Like [`entries_summary`] but for a whole week. An empty week yields blank strings.
pub fn week_summary<'a, I>(entries: I) -> WeekSummary
where
    I: IntoIterator<Item = &'a TimeEntry>,
{
    let summary = calculate_entry_summary(entries);
    if summary.entry_count == 0 {
        return WeekSummary::default();
    }
    WeekSummary {
        title: format!(
            "Week {} • Billable {} • Unbillable {}",
            summary.total_formatted, summary.billable_formatted, summary.unbillable_formatted
        ),
        subtitle: summary.subtitle(),
        exists: true,
        total_formatted: summary.total_formatted,
        billable: summary.billable_formatted,
        unbillable: summary.unbillable_formatted,
    }
}
