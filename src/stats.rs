//! Dashboard figures: totals, longest session and the per-category breakdown
//! behind the bar and pie charts.

use std::collections::HashMap;

use chrono::{NaiveDate, TimeZone};

use crate::api::Entry;
use crate::layout::add_days;

/// Slices smaller than this percentage get no label on the pie chart
pub const MIN_LABELLED_SHARE: f64 = 3.0;

/// Entries starting within the week `[week_start, week_start + 7 days)`
pub fn entries_in_week<'a, Tz: TimeZone>(
    entries: &'a [Entry],
    week_start: NaiveDate,
    tz: &Tz,
) -> Vec<&'a Entry> {
    let week_end = add_days(week_start, 7);
    entries
        .iter()
        .filter(|e| {
            let day = e.local_start(tz).date();
            day >= week_start && day < week_end
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Summary {
    pub total_seconds: i64,
    pub sessions: usize,
    pub longest_seconds: i64,
}

impl Summary {
    pub fn of<'a>(entries: impl IntoIterator<Item = &'a Entry>) -> Self {
        entries.into_iter().fold(Self::default(), |mut acc, e| {
            acc.total_seconds += e.duration_seconds;
            acc.sessions += 1;
            acc.longest_seconds = acc.longest_seconds.max(e.duration_seconds);
            acc
        })
    }

    /// Total hours with one decimal, e.g. "12.5"
    pub fn total_hours(&self) -> String {
        format!("{:.1}", self.total_seconds as f64 / 3600.0)
    }

    /// Longest session in hours with two decimals
    pub fn longest_hours(&self) -> String {
        format!("{:.2}", self.longest_seconds as f64 / 3600.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub category: String,
    pub seconds: i64,
    /// Position in first-appearance order; picks the palette colour
    pub index: usize,
}

impl CategoryTotal {
    /// Hours rounded to two decimals
    pub fn hours(&self) -> f64 {
        (self.seconds as f64 / 36.0).round() / 100.0
    }

    /// Percentage of `total_hours`, zero when there is nothing to share
    pub fn share(&self, total_hours: f64) -> f64 {
        if total_hours <= 0.0 {
            return 0.0;
        }
        self.hours() / total_hours * 100.0
    }

    pub fn palette_slot(&self, palette_len: usize) -> usize {
        if palette_len == 0 { 0 } else { self.index % palette_len }
    }
}

/// Seconds per category, in the order categories first appear
pub fn category_breakdown<'a>(entries: impl IntoIterator<Item = &'a Entry>) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = Vec::new();
    let mut positions: HashMap<&'a str, usize> = HashMap::new();

    for entry in entries {
        match positions.get(entry.category.as_str()) {
            Some(&pos) => totals[pos].seconds += entry.duration_seconds,
            None => {
                positions.insert(entry.category.as_str(), totals.len());
                totals.push(CategoryTotal {
                    category: entry.category.clone(),
                    seconds: entry.duration_seconds,
                    index: totals.len(),
                });
            }
        }
    }

    totals
}

/// Sum of the rounded hours, which is what the pie chart divides by
pub fn total_hours(totals: &[CategoryTotal]) -> f64 {
    totals.iter().map(CategoryTotal::hours).sum()
}

/// "Xh Ym"
pub fn format_duration(seconds: i64) -> String {
    let seconds = seconds.max(0);
    format!("{}h {}m", seconds / 3600, (seconds % 3600) / 60)
}
