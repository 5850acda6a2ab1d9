mod common;

use chrono::Utc;
use common::{at, date, entry};
use namu::stats::{category_breakdown, entries_in_week, format_duration, total_hours, Summary};

fn sample() -> Vec<namu::api::Entry> {
    vec![
        entry(1, "Work", at(2026, 2, 16, 9, 0, 0), at(2026, 2, 16, 11, 0, 0)),
        entry(2, "Reading", at(2026, 2, 17, 20, 0, 0), at(2026, 2, 17, 20, 30, 0)),
        entry(3, "Work", at(2026, 2, 18, 9, 0, 0), at(2026, 2, 18, 10, 0, 0)),
        entry(4, "Exercise", at(2026, 2, 23, 7, 0, 0), at(2026, 2, 23, 8, 0, 0)),
    ]
}

#[test]
fn week_filter_is_half_open() {
    let entries = sample();
    let week: Vec<i64> = entries_in_week(&entries, date(2026, 2, 16), &Utc)
        .iter()
        .map(|e| e.id)
        .collect();
    assert_eq!(week, vec![1, 2, 3]);

    let next: Vec<i64> = entries_in_week(&entries, date(2026, 2, 23), &Utc)
        .iter()
        .map(|e| e.id)
        .collect();
    assert_eq!(next, vec![4]);
}

#[test]
fn breakdown_keeps_first_appearance_order() {
    let entries = sample();
    let totals = category_breakdown(&entries);

    let names: Vec<&str> = totals.iter().map(|t| t.category.as_str()).collect();
    assert_eq!(names, vec!["Work", "Reading", "Exercise"]);
    assert_eq!(totals[0].seconds, 3 * 3600);
    assert_eq!(totals[0].hours(), 3.0);
    assert_eq!(totals[1].hours(), 0.5);
    assert_eq!(total_hours(&totals), 4.5);
}

#[test]
fn summary_of_a_week() {
    let entries = sample();
    let summary = Summary::of(entries_in_week(&entries, date(2026, 2, 16), &Utc));

    assert_eq!(summary.sessions, 3);
    assert_eq!(summary.total_seconds, 3 * 3600 + 1800);
    assert_eq!(summary.total_hours(), "3.5");
    assert_eq!(summary.longest_hours(), "2.00");
    assert_eq!(format_duration(summary.longest_seconds), "2h 0m");
}

#[test]
fn empty_inputs() {
    assert_eq!(Summary::of(&[]), Summary::default());
    assert!(category_breakdown(&[]).is_empty());
}
