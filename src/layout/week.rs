use chrono::{Datelike, Duration, NaiveDate, TimeZone};

use super::lanes::{assign_lanes, PackedEvent};
use crate::api::Entry;

pub const DAYS_PER_WEEK: usize = 7;

/// Monday on or before `date`
pub fn week_start_of(date: NaiveDate) -> NaiveDate {
    let days_from_monday = date.weekday().num_days_from_monday();
    date - Duration::days(i64::from(days_from_monday))
}

pub fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    date + Duration::days(days)
}

/// The seven dates starting at `week_start`
pub fn week_days(week_start: NaiveDate) -> [NaiveDate; DAYS_PER_WEEK] {
    std::array::from_fn(|i| add_days(week_start, i as i64))
}

#[derive(Debug, Clone)]
pub struct DayLayout<'a> {
    pub date: NaiveDate,
    pub events: Vec<PackedEvent<'a>>,
}

#[derive(Debug, Clone)]
pub struct WeekLayout<'a> {
    pub week_start: NaiveDate,
    /// Always `DAYS_PER_WEEK` long, in date order
    pub days: Vec<DayLayout<'a>>,
}

impl<'a> WeekLayout<'a> {
    pub fn day(&self, date: NaiveDate) -> Option<&DayLayout<'a>> {
        self.days.iter().find(|d| d.date == date)
    }

    pub fn events(&self) -> impl Iterator<Item = &PackedEvent<'a>> {
        self.days.iter().flat_map(|d| d.events.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.days.iter().all(|d| d.events.is_empty())
    }
}

/// Group entries by the day of the week their start falls on.
/// Entries starting outside the week are dropped.
pub fn bucket_by_start_day<'a, Tz: TimeZone>(
    entries: &'a [Entry],
    week_start: NaiveDate,
    tz: &Tz,
) -> [Vec<&'a Entry>; DAYS_PER_WEEK] {
    let mut buckets: [Vec<&'a Entry>; DAYS_PER_WEEK] = std::array::from_fn(|_| Vec::new());
    for entry in entries {
        let start_day = entry.local_start(tz).date();
        let offset = (start_day - week_start).num_days();
        if (0..DAYS_PER_WEEK as i64).contains(&offset) {
            buckets[offset as usize].push(entry);
        }
    }
    buckets
}

/// Lay out a whole week.
///
/// Each entry is only laid out on the day it starts. An entry running past
/// midnight is clipped at the end of its start day; its remainder is not
/// shown on the next day.
pub fn layout_week<'a, Tz: TimeZone>(entries: &'a [Entry], week_start: NaiveDate, tz: &Tz) -> WeekLayout<'a> {
    let buckets = bucket_by_start_day(entries, week_start, tz);

    let days = week_days(week_start)
        .into_iter()
        .zip(buckets)
        .map(|(date, bucket)| DayLayout {
            date,
            events: assign_lanes(bucket, date, tz),
        })
        .collect();

    WeekLayout { week_start, days }
}
