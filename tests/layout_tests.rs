mod common;

use chrono::Utc;
use common::{at, date, entry, tuesday};
use namu::layout::{
    assign_lanes, compute_day_segment, layout_week, week_start_of, HourWindow, Lane,
    MIN_HEIGHT_FRACTION,
};

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn entry_outside_day_has_no_segment() {
    let e = tuesday(1, (9, 0), (10, 0));
    assert!(compute_day_segment(&e, date(2026, 2, 16), &Utc).is_none());
    assert!(compute_day_segment(&e, date(2026, 2, 18), &Utc).is_none());
}

#[test]
fn entry_inside_day_is_unchanged() {
    let mut e = tuesday(1, (6, 0), (12, 0));
    // the stored duration is ignored for layout
    e.duration_seconds = 1;
    let seg = compute_day_segment(&e, date(2026, 2, 17), &Utc).unwrap();

    assert_eq!(seg.start, e.start_time.naive_utc());
    assert_eq!(seg.end, e.end_time.naive_utc());
    assert!(close(seg.duration_seconds, 6.0 * 3600.0));
    assert!(close(seg.top_fraction, 0.25));
    assert!(close(seg.height_fraction, 0.25));
}

#[test]
fn entry_clipped_at_both_ends() {
    let e = entry(1, "Study", at(2026, 2, 16, 20, 0, 0), at(2026, 2, 18, 4, 0, 0));
    let seg = compute_day_segment(&e, date(2026, 2, 17), &Utc).unwrap();

    assert_eq!(seg.start, date(2026, 2, 17).and_hms_opt(0, 0, 0).unwrap());
    assert_eq!(seg.end, date(2026, 2, 17).and_hms_milli_opt(23, 59, 59, 999).unwrap());
    assert!(close(seg.top_fraction, 0.0));
    assert!(close(seg.duration_seconds, 86_399.999));
}

#[test]
fn short_and_empty_entries_keep_minimum_height() {
    let instant = tuesday(1, (8, 0), (8, 0));
    let seg = compute_day_segment(&instant, date(2026, 2, 17), &Utc).unwrap();
    assert!(close(seg.height_fraction, MIN_HEIGHT_FRACTION));

    let one_minute = tuesday(2, (8, 0), (8, 1));
    let seg = compute_day_segment(&one_minute, date(2026, 2, 17), &Utc).unwrap();
    assert!(seg.height_fraction >= MIN_HEIGHT_FRACTION);
}

#[test]
fn disjoint_entries_take_the_full_column() {
    let entries = [tuesday(1, (9, 0), (10, 0)), tuesday(2, (10, 0), (11, 0)), tuesday(3, (14, 0), (15, 0))];
    let packed = assign_lanes(&entries, date(2026, 2, 17), &Utc);

    assert_eq!(packed.len(), 3);
    assert!(packed.iter().all(|p| p.lane == Lane::Full));
}

#[test]
fn overlapping_pair_splits_the_column() {
    let entries = [tuesday(1, (10, 0), (11, 0)), tuesday(2, (10, 30), (11, 30))];
    let packed = assign_lanes(&entries, date(2026, 2, 17), &Utc);

    assert_eq!(packed[0].entry.id, 1);
    assert_eq!(packed[0].lane, Lane::First);
    assert_eq!(packed[1].lane, Lane::Second);
    assert_eq!(packed[0].lane.horizontal(), (0.10, 0.38));
    assert_eq!(packed[1].lane.horizontal(), (0.52, 0.38));
}

#[test]
fn third_concurrent_entry_shares_the_second_lane() {
    let entries = [
        tuesday(1, (9, 0), (12, 0)),
        tuesday(2, (9, 30), (10, 30)),
        tuesday(3, (10, 0), (11, 0)),
    ];
    let packed = assign_lanes(&entries, date(2026, 2, 17), &Utc);
    let lanes: Vec<Lane> = packed.iter().map(|p| p.lane).collect();

    assert_eq!(lanes, vec![Lane::First, Lane::Second, Lane::Second]);
}

#[test]
fn freed_lane_is_reused() {
    let entries = [
        tuesday(1, (9, 0), (10, 0)),
        tuesday(2, (9, 30), (11, 0)),
        tuesday(3, (10, 15), (10, 45)),
    ];
    let packed = assign_lanes(&entries, date(2026, 2, 17), &Utc);
    let lanes: Vec<Lane> = packed.iter().map(|p| p.lane).collect();

    assert_eq!(lanes, vec![Lane::First, Lane::Second, Lane::First]);
}

#[test]
fn input_order_does_not_matter() {
    let entries = [tuesday(2, (10, 30), (11, 30)), tuesday(1, (10, 0), (11, 0))];
    let packed = assign_lanes(&entries, date(2026, 2, 17), &Utc);

    assert_eq!(packed[0].entry.id, 1);
    assert_eq!(packed[0].lane, Lane::First);
    assert_eq!(packed[1].entry.id, 2);
    assert_eq!(packed[1].lane, Lane::Second);
}

#[test]
fn overnight_entry_stays_on_its_start_day() {
    let e = entry(7, "Reading", at(2026, 2, 22, 23, 17, 39), at(2026, 2, 23, 3, 12, 39));
    let entries = vec![e.clone()];

    let week = layout_week(&entries, date(2026, 2, 16), &Utc);
    let sunday = week.day(date(2026, 2, 22)).unwrap();
    assert_eq!(sunday.events.len(), 1);
    let seg = sunday.events[0].segment;
    assert_eq!(seg.start, e.start_time.naive_utc());
    assert_eq!(seg.end, date(2026, 2, 22).and_hms_milli_opt(23, 59, 59, 999).unwrap());
    assert!(close(seg.top_fraction, (23.0 * 60.0 + 17.0) / 1440.0));
    // 23:17:39 to 23:59:59.999
    assert!(close(seg.height_fraction, 2540.999 / 86_400.0));

    // the Monday remainder is computable but the next week does not show it
    let monday = compute_day_segment(&e, date(2026, 2, 23), &Utc).unwrap();
    assert_eq!(monday.start, date(2026, 2, 23).and_hms_opt(0, 0, 0).unwrap());
    assert_eq!(monday.end, e.end_time.naive_utc());
    assert!(close(monday.top_fraction, 0.0));
    // 00:00 to 03:12:39
    assert!(close(monday.height_fraction, 11_559.0 / 86_400.0));

    let next = layout_week(&entries, date(2026, 2, 23), &Utc);
    assert!(next.is_empty());
}

#[test]
fn entries_outside_the_week_are_dropped() {
    let entries = vec![
        entry(1, "Work", at(2026, 2, 15, 9, 0, 0), at(2026, 2, 15, 10, 0, 0)),
        entry(2, "Work", at(2026, 2, 16, 0, 0, 0), at(2026, 2, 16, 1, 0, 0)),
        entry(3, "Work", at(2026, 2, 22, 22, 0, 0), at(2026, 2, 22, 23, 0, 0)),
        entry(4, "Work", at(2026, 2, 23, 0, 0, 0), at(2026, 2, 23, 1, 0, 0)),
    ];
    let week = layout_week(&entries, week_start_of(date(2026, 2, 19)), &Utc);

    assert_eq!(week.days.len(), 7);
    let ids: Vec<i64> = week.events().map(|p| p.entry.id).collect();
    assert_eq!(ids, vec![2, 3]);
    assert_eq!(week.days[0].events.len(), 1);
    assert_eq!(week.days[6].events.len(), 1);
}

#[test]
fn hour_window_grows_to_fit_events() {
    let entries = vec![tuesday(1, (5, 0), (7, 30)), tuesday(2, (21, 0), (22, 10))];
    let week = layout_week(&entries, date(2026, 2, 16), &Utc);
    let window = HourWindow::fit(&week, 6, 22);

    assert_eq!(window.start_hour, 5);
    assert_eq!(window.end_hour, 23);
}

#[test]
fn reversed_entry_does_not_disturb_the_week() {
    let entries = vec![
        tuesday(1, (9, 0), (10, 0)),
        tuesday(2, (11, 0), (10, 0)),
        tuesday(3, (9, 30), (10, 30)),
    ];
    let week = layout_week(&entries, date(2026, 2, 16), &Utc);
    let day = week.day(date(2026, 2, 17)).unwrap();

    assert_eq!(day.events.len(), 3);
    let reversed = day.events.iter().find(|p| p.entry.id == 2).unwrap();
    assert_eq!(reversed.lane, Lane::Full);
    assert!(close(reversed.segment.height_fraction, MIN_HEIGHT_FRACTION));
    let lanes: Vec<Lane> = day.events.iter().filter(|p| p.entry.id != 2).map(|p| p.lane).collect();
    assert_eq!(lanes, vec![Lane::First, Lane::Second]);
}
