use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike};

use crate::api::Entry;

pub const MINUTES_PER_DAY: f64 = 1440.0;
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Smallest height a segment is drawn with, as a fraction of the day
pub const MIN_HEIGHT_FRACTION: f64 = 0.008;

/// The part of an entry that falls inside one calendar day
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DaySegment {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// `end - start`, negative for entries that end before they start
    pub duration_seconds: f64,
    /// Fraction of the day elapsed at `start` (whole minutes)
    pub top_fraction: f64,
    /// Fraction of the day covered, never below `MIN_HEIGHT_FRACTION`
    pub height_fraction: f64,
}

impl DaySegment {
    pub fn overlaps(&self, other: &DaySegment) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// First and last instant of a day: 00:00:00.000 and 23:59:59.999
pub fn day_bounds(day: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
    let start = day.and_time(NaiveTime::MIN);
    let end = start + Duration::milliseconds(86_399_999);
    (start, end)
}

/// Clip `entry` to `day` as seen in `tz`
pub fn compute_day_segment<Tz: TimeZone>(entry: &Entry, day: NaiveDate, tz: &Tz) -> Option<DaySegment> {
    segment_between(entry.local_start(tz), entry.local_end(tz), day)
}

/// Clip a wall-clock interval to `day`. `None` when they do not intersect.
pub fn segment_between(start: NaiveDateTime, end: NaiveDateTime, day: NaiveDate) -> Option<DaySegment> {
    let (day_start, day_end) = day_bounds(day);
    if end < day_start || start > day_end {
        return None;
    }

    let seg_start = start.max(day_start);
    let seg_end = end.min(day_end);

    let minutes_from_midnight = seg_start.hour() * 60 + seg_start.minute();
    let duration_seconds = (seg_end - seg_start).num_milliseconds() as f64 / 1000.0;

    Some(DaySegment {
        start: seg_start,
        end: seg_end,
        duration_seconds,
        top_fraction: f64::from(minutes_from_midnight) / MINUTES_PER_DAY,
        height_fraction: (duration_seconds / SECONDS_PER_DAY).max(MIN_HEIGHT_FRACTION),
    })
}
