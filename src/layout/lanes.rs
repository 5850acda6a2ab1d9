use chrono::{NaiveDate, NaiveDateTime, TimeZone};

use super::segment::{compute_day_segment, DaySegment};
use crate::api::Entry;

/// Horizontal slot of an event inside its day column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lane {
    /// No overlap with any other event of the day
    Full,
    First,
    Second,
}

impl Lane {
    pub fn index(self) -> Option<usize> {
        match self {
            Lane::Full => None,
            Lane::First => Some(0),
            Lane::Second => Some(1),
        }
    }

    pub fn overlaps(self) -> bool {
        self != Lane::Full
    }

    /// `(left, width)` as fractions of the day column
    pub fn horizontal(self) -> (f32, f32) {
        match self {
            Lane::Full => (0.10, 0.80),
            Lane::First => (0.10, 0.38),
            Lane::Second => (0.52, 0.38),
        }
    }

    fn from_index(index: usize) -> Self {
        if index == 0 { Lane::First } else { Lane::Second }
    }
}

/// A day segment with its lane, ready for absolute positioning
#[derive(Debug, Clone, PartialEq)]
pub struct PackedEvent<'a> {
    pub entry: &'a Entry,
    pub segment: DaySegment,
    pub lane: Lane,
}

/// Lay out the entries of one day.
///
/// Entries that overlap nothing get `Lane::Full`. Overlapping ones are packed
/// greedily, in start order, into two lanes. There are only two: a third
/// concurrent entry goes to the second lane and is drawn over its occupant.
pub fn assign_lanes<'a, Tz, I>(entries: I, day: NaiveDate, tz: &Tz) -> Vec<PackedEvent<'a>>
where
    Tz: TimeZone,
    I: IntoIterator<Item = &'a Entry>,
{
    let mut segments: Vec<(&'a Entry, DaySegment)> = entries
        .into_iter()
        .filter_map(|entry| compute_day_segment(entry, day, tz).map(|seg| (entry, seg)))
        .collect();

    // stable: equal starts keep input order
    segments.sort_by(|a, b| a.1.start.cmp(&b.1.start));

    let n = segments.len();
    let mut has_overlap = vec![false; n];
    for i in 0..n {
        for j in (i + 1)..n {
            let (a, b) = (&segments[i].1, &segments[j].1);
            // sorted by start, nothing further can overlap `a`
            if b.start >= a.end {
                break;
            }
            if a.overlaps(b) {
                has_overlap[i] = true;
                has_overlap[j] = true;
            }
        }
    }

    let mut lane_end: [Option<NaiveDateTime>; 2] = [None, None];
    let mut packed = Vec::with_capacity(n);

    for ((entry, segment), overlapping) in segments.into_iter().zip(has_overlap) {
        if !overlapping {
            packed.push(PackedEvent { entry, segment, lane: Lane::Full });
            continue;
        }

        for slot in lane_end.iter_mut() {
            if slot.is_some_and(|end| end <= segment.start) {
                *slot = None;
            }
        }

        let index = if lane_end[0].is_some() { 1 } else { 0 };
        lane_end[index] = Some(segment.end);
        packed.push(PackedEvent { entry, segment, lane: Lane::from_index(index) });
    }

    packed
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn entry(id: i64, start: (u32, u32), end: (u32, u32)) -> Entry {
        let day = Utc.with_ymd_and_hms(2026, 2, 17, 0, 0, 0).unwrap();
        let start_time = day + Duration::minutes(i64::from(start.0 * 60 + start.1));
        let end_time = day + Duration::minutes(i64::from(end.0 * 60 + end.1));
        Entry {
            id,
            category: "Work".to_string(),
            duration_seconds: (end_time - start_time).num_seconds(),
            start_time,
            end_time,
        }
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 17).unwrap()
    }

    fn lanes(packed: &[PackedEvent<'_>]) -> Vec<(i64, Lane)> {
        packed.iter().map(|p| (p.entry.id, p.lane)).collect()
    }

    #[test]
    fn empty_day_is_empty() {
        let none: Vec<Entry> = Vec::new();
        assert!(assign_lanes(&none, day(), &Utc).is_empty());
    }

    #[test]
    fn output_is_sorted_by_segment_start() {
        let entries = vec![entry(1, (14, 0), (15, 0)), entry(2, (8, 0), (9, 0))];
        let packed = assign_lanes(&entries, day(), &Utc);
        assert_eq!(lanes(&packed), vec![(2, Lane::Full), (1, Lane::Full)]);
    }

    #[test]
    fn touching_entries_do_not_overlap() {
        let entries = vec![entry(1, (9, 0), (10, 0)), entry(2, (10, 0), (11, 0))];
        let packed = assign_lanes(&entries, day(), &Utc);
        assert!(packed.iter().all(|p| p.lane == Lane::Full));
    }

    #[test]
    fn lane_is_reused_once_free() {
        // 1 and 2 overlap; 3 overlaps 2 only and starts after 1 ended
        let entries = vec![
            entry(1, (9, 0), (10, 0)),
            entry(2, (9, 30), (11, 0)),
            entry(3, (10, 0), (10, 30)),
        ];
        let packed = assign_lanes(&entries, day(), &Utc);
        assert_eq!(
            lanes(&packed),
            vec![(1, Lane::First), (2, Lane::Second), (3, Lane::First)]
        );
    }

    #[test]
    fn equal_starts_keep_input_order() {
        let entries = vec![entry(5, (9, 0), (10, 0)), entry(4, (9, 0), (9, 30))];
        let packed = assign_lanes(&entries, day(), &Utc);
        assert_eq!(lanes(&packed), vec![(5, Lane::First), (4, Lane::Second)]);
    }

    #[test]
    fn reversed_entry_is_packed_at_minimum_height() {
        // 3 ends before it starts
        let entries = vec![
            entry(1, (9, 0), (10, 0)),
            entry(2, (10, 30), (12, 0)),
            entry(3, (11, 0), (10, 0)),
        ];
        let packed = assign_lanes(&entries, day(), &Utc);
        assert_eq!(
            lanes(&packed),
            vec![(1, Lane::Full), (2, Lane::Full), (3, Lane::Full)]
        );
        let reversed = &packed[2].segment;
        assert!(reversed.duration_seconds < 0.0);
        assert_eq!(reversed.height_fraction, super::super::segment::MIN_HEIGHT_FRACTION);
    }

    #[test]
    fn lane_geometry() {
        assert_eq!(Lane::Full.horizontal(), (0.10, 0.80));
        assert_eq!(Lane::First.index(), Some(0));
        assert_eq!(Lane::Second.index(), Some(1));
        assert!(!Lane::Full.overlaps());
    }
}
