//! Weekly calendar layout.
//!
//! Turns a flat list of entries and a week start into, for each of the seven
//! days, the events to draw: vertical position and height as fractions of the
//! day, plus a horizontal lane so overlapping events sit side by side.
//!
//! Everything here is pure and synchronous. Callers that redraw every frame
//! should cache the result keyed on the entry list and week start.

mod lanes;
mod segment;
mod week;
mod window;

pub use lanes::{assign_lanes, Lane, PackedEvent};
pub use segment::{
    compute_day_segment, day_bounds, segment_between, DaySegment, MIN_HEIGHT_FRACTION,
};
pub use week::{
    add_days, bucket_by_start_day, layout_week, week_days, week_start_of, DayLayout, WeekLayout,
    DAYS_PER_WEEK,
};
pub use window::HourWindow;
