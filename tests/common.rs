#![allow(dead_code)]
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use namu::api::Entry;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
}

/// Entry whose stored duration matches its timestamps
pub fn entry(id: i64, category: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Entry {
    Entry {
        id,
        category: category.to_string(),
        duration_seconds: (end - start).num_seconds(),
        start_time: start,
        end_time: end,
    }
}

/// Entry on 2026-02-17 between two wall-clock times
pub fn tuesday(id: i64, start: (u32, u32), end: (u32, u32)) -> Entry {
    entry(
        id,
        "Work",
        at(2026, 2, 17, start.0, start.1, 0),
        at(2026, 2, 17, end.0, end.1, 0),
    )
}
