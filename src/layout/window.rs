use chrono::Timelike;

use super::segment::DaySegment;
use super::week::WeekLayout;

/// The band of hours a calendar actually draws
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HourWindow {
    pub start_hour: u8,
    pub end_hour: u8,
}

impl Default for HourWindow {
    fn default() -> Self {
        Self { start_hour: 0, end_hour: 24 }
    }
}

impl HourWindow {
    /// Clamped so that `0 <= start < end <= 24`
    pub fn new(start_hour: u8, end_hour: u8) -> Self {
        let start_hour = start_hour.min(23);
        let end_hour = end_hour.clamp(start_hour + 1, 24);
        Self { start_hour, end_hour }
    }

    /// Widen the configured window so every event of the week is visible
    pub fn fit(layout: &WeekLayout<'_>, start_hour: u8, end_hour: u8) -> Self {
        let mut window = Self::new(start_hour, end_hour);

        for event in layout.events() {
            let seg = &event.segment;
            let (first, last) = if seg.end >= seg.start { (seg.start, seg.end) } else { (seg.end, seg.start) };

            window.start_hour = window.start_hour.min(first.hour() as u8);

            let mut end_minutes = last.hour() * 60 + last.minute();
            if last.second() > 0 || last.nanosecond() > 0 {
                end_minutes += 1;
            }
            // round up to the next full hour
            let end_hour = end_minutes.div_ceil(60).min(24) as u8;
            window.end_hour = window.end_hour.max(end_hour);
        }

        window
    }

    pub fn hours(self) -> u8 {
        self.end_hour - self.start_hour
    }

    /// Map a segment onto the window: `(top, height)` as fractions of the
    /// window, clipped to it. `None` if the segment is entirely outside.
    pub fn project(self, segment: &DaySegment) -> Option<(f64, f64)> {
        let window_top = f64::from(self.start_hour) / 24.0;
        let window_bottom = f64::from(self.end_hour) / 24.0;
        let span = window_bottom - window_top;

        let top = segment.top_fraction;
        let bottom = top + segment.height_fraction;
        if bottom <= window_top || top >= window_bottom {
            return None;
        }

        let clipped_top = top.max(window_top);
        let clipped_bottom = bottom.min(window_bottom);
        Some(((clipped_top - window_top) / span, (clipped_bottom - clipped_top) / span))
    }
}
