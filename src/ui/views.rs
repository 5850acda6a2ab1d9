use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime, Utc, Weekday};
use egui::{Color32, RichText, Ui};

use crate::api::Entry;
use crate::config::ClockFormat;
use crate::layout::{add_days, HourWindow, WeekLayout};
use crate::stats::{format_duration, Summary};
use super::theme::{surface_colors, EventColors};

/// Action picked in the week navigator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeekNav {
    Previous,
    Current,
    Next,
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}

/// Format a wall-clock time according to clock format
pub fn format_clock(time: NaiveDateTime, clock_format: ClockFormat) -> String {
    match clock_format {
        ClockFormat::Hour24 => time.format("%H:%M").to_string(),
        ClockFormat::Hour12 => time.format("%-I:%M%P").to_string(),
    }
}

fn format_hour_label(hour: u8, clock_format: ClockFormat) -> String {
    match clock_format {
        ClockFormat::Hour24 => format!("{:02}:00", hour),
        ClockFormat::Hour12 => {
            let (h12, ampm) = match hour {
                0 | 24 => (12, "am"),
                1..=11 => (hour, "am"),
                12 => (12, "pm"),
                _ => (hour - 12, "pm"),
            };
            format!("{}{}", h12, ampm)
        }
    }
}

/// Local date and time of a timestamp, e.g. "16/02/2026 09:30"
pub fn format_local(dt: &DateTime<Utc>, clock_format: ClockFormat) -> String {
    let local = dt.with_timezone(&Local).naive_local();
    format!("{} {}", local.format("%d/%m/%Y"), format_clock(local, clock_format))
}

/// "Mon 16 Feb – Sun 22 Feb 2026" with previous / this week / next buttons
pub fn render_week_navigator(ui: &mut Ui, week_start: NaiveDate) -> Option<WeekNav> {
    let mut action = None;
    let week_end = add_days(week_start, 6);

    ui.horizontal(|ui| {
        if ui.button(egui_phosphor::regular::CARET_LEFT).on_hover_text("Previous week").clicked() {
            action = Some(WeekNav::Previous);
        }
        if ui.button("This week").clicked() {
            action = Some(WeekNav::Current);
        }
        if ui.button(egui_phosphor::regular::CARET_RIGHT).on_hover_text("Next week").clicked() {
            action = Some(WeekNav::Next);
        }
        ui.add_space(8.0);
        ui.label(
            RichText::new(format!(
                "{} – {}",
                week_start.format("%a %-d %b"),
                week_end.format("%a %-d %b %Y"),
            ))
            .strong(),
        );
    });

    action
}

/// Four headline numbers above the charts
pub fn render_summary_cards(ui: &mut Ui, summary: &Summary, show_all: bool, dark: bool) {
    let (card_bg, border, muted) = surface_colors(dark);
    let cards = [
        ("Total hours", summary.total_hours()),
        ("Sessions", summary.sessions.to_string()),
        ("Longest session", format!("{} h", summary.longest_hours())),
        ("Scope", if show_all { "All entries".to_string() } else { "Selected week".to_string() }),
    ];

    ui.columns(cards.len(), |columns| {
        for (ui, (title, value)) in columns.iter_mut().zip(cards) {
            egui::Frame::none()
                .fill(card_bg)
                .stroke(egui::Stroke::new(1.0, border))
                .rounding(8.0)
                .inner_margin(egui::Margin::same(12.0))
                .show(ui, |ui| {
                    ui.set_min_width(ui.available_width());
                    ui.label(RichText::new(title).size(12.0).color(muted));
                    ui.label(RichText::new(value).size(22.0).strong());
                });
        }
    });
}

/// Table of entries; returns the id of the row that was clicked
pub fn render_entries_table(ui: &mut Ui, entries: &[&Entry], clock_format: ClockFormat) -> Option<i64> {
    let mut clicked = None;

    if entries.is_empty() {
        ui.label("No entries for this period.");
        return None;
    }

    egui::ScrollArea::vertical().show(ui, |ui| {
        egui::Grid::new("entries_table")
            .num_columns(4)
            .striped(true)
            .spacing([32.0, 8.0])
            .show(ui, |ui| {
                ui.label(RichText::new("Category").strong());
                ui.label(RichText::new("Start").strong());
                ui.label(RichText::new("End").strong());
                ui.label(RichText::new("Duration").strong());
                ui.end_row();

                for entry in entries {
                    if ui.selectable_label(false, entry.category.as_str()).on_hover_text("Edit entry").clicked() {
                        clicked = Some(entry.id);
                    }
                    ui.label(format_local(&entry.start_time, clock_format));
                    ui.label(format_local(&entry.end_time, clock_format));
                    ui.label(format_duration(entry.duration_seconds));
                    ui.end_row();
                }
            });
    });

    clicked
}

/// Seven-column calendar with an hour gutter. Returns the id of a clicked event.
pub fn render_calendar(
    ui: &mut Ui,
    layout: &WeekLayout<'_>,
    window: HourWindow,
    colors: &EventColors,
    clock_format: ClockFormat,
) -> Option<i64> {
    let mut clicked = None;
    let dark = colors.is_dark();
    let (_, grid_line_color, muted) = surface_colors(dark);
    let today = Local::now().date_naive();

    // Layout constants
    let hour_label_width = 48.0;
    let header_height = 32.0;
    let hour_height = 32.0;

    let num_hours = window.hours() as usize;
    let total_grid_height = num_hours as f32 * hour_height;
    let available_width = ui.available_width();
    let day_width = (available_width - hour_label_width) / layout.days.len().max(1) as f32;

    // Fixed day headers (outside ScrollArea)
    let (header_rect, _) = ui.allocate_exact_size(
        egui::vec2(available_width, header_height),
        egui::Sense::hover(),
    );
    let painter = ui.painter();
    for (i, day) in layout.days.iter().enumerate() {
        let x = header_rect.min.x + hour_label_width + i as f32 * day_width;
        let is_today = day.date == today;
        let label = format!("{} {}/{}", weekday_name(day.date.weekday()), day.date.day(), day.date.month());
        painter.text(
            egui::pos2(x + day_width / 2.0, header_rect.center().y),
            egui::Align2::CENTER_CENTER,
            label,
            egui::FontId::new(13.0, super::theme::bold_family()),
            if is_today { ui.visuals().selection.bg_fill } else { ui.visuals().text_color() },
        );
    }

    egui::ScrollArea::vertical().show(ui, |ui| {
        let (grid_rect, _) = ui.allocate_exact_size(
            egui::vec2(available_width, total_grid_height),
            egui::Sense::hover(),
        );
        let painter = ui.painter();

        // Hour labels and horizontal grid lines
        for hour_idx in 0..=num_hours {
            let hour = window.start_hour + hour_idx as u8;
            let y = grid_rect.min.y + hour_idx as f32 * hour_height;
            if hour_idx < num_hours {
                painter.text(
                    egui::pos2(grid_rect.min.x + hour_label_width - 6.0, y),
                    egui::Align2::RIGHT_TOP,
                    format_hour_label(hour, clock_format),
                    egui::FontId::proportional(10.0),
                    muted,
                );
            }
            painter.line_segment(
                [
                    egui::pos2(grid_rect.min.x + hour_label_width, y),
                    egui::pos2(grid_rect.max.x, y),
                ],
                egui::Stroke::new(1.0, grid_line_color),
            );
        }

        // Vertical grid lines for columns
        for i in 0..=layout.days.len() {
            let x = grid_rect.min.x + hour_label_width + i as f32 * day_width;
            painter.line_segment(
                [egui::pos2(x, grid_rect.min.y), egui::pos2(x, grid_rect.max.y)],
                egui::Stroke::new(1.0, grid_line_color),
            );
        }

        for (day_idx, day) in layout.days.iter().enumerate() {
            let col_x = grid_rect.min.x + hour_label_width + day_idx as f32 * day_width;

            for event in &day.events {
                let Some((top, height)) = window.project(&event.segment) else {
                    continue;
                };
                let (left, width) = event.lane.horizontal();

                let block_rect = egui::Rect::from_min_size(
                    egui::pos2(
                        col_x + left * day_width,
                        grid_rect.min.y + top as f32 * total_grid_height,
                    ),
                    egui::vec2(width * day_width, height as f32 * total_grid_height),
                );

                let color = colors.get(event.entry);
                ui.painter().rect_filled(block_rect, 4.0, color);

                // Category then duration, only where they fit
                let text_color = Color32::WHITE;
                if block_rect.height() >= 14.0 {
                    ui.painter().with_clip_rect(block_rect).text(
                        block_rect.min + egui::vec2(4.0, 2.0),
                        egui::Align2::LEFT_TOP,
                        &event.entry.category,
                        egui::FontId::new(11.0, super::theme::bold_family()),
                        text_color,
                    );
                }
                if block_rect.height() >= 28.0 {
                    ui.painter().with_clip_rect(block_rect).text(
                        block_rect.min + egui::vec2(4.0, 16.0),
                        egui::Align2::LEFT_TOP,
                        format_duration(event.segment.duration_seconds as i64),
                        egui::FontId::proportional(10.0),
                        text_color,
                    );
                }

                let tooltip = format!(
                    "{} • {} – {} • {}",
                    event.entry.category,
                    format_clock(event.segment.start, clock_format),
                    format_clock(event.segment.end, clock_format),
                    format_duration(event.segment.duration_seconds as i64),
                );
                let response = ui.interact(
                    block_rect,
                    ui.id().with(("calendar_event", day_idx, event.entry.id)),
                    egui::Sense::click(),
                );
                if response.on_hover_text(tooltip).clicked() {
                    clicked = Some(event.entry.id);
                }
            }
        }
    });

    clicked
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hour_labels() {
        assert_eq!(format_hour_label(0, ClockFormat::Hour24), "00:00");
        assert_eq!(format_hour_label(0, ClockFormat::Hour12), "12am");
        assert_eq!(format_hour_label(12, ClockFormat::Hour12), "12pm");
        assert_eq!(format_hour_label(15, ClockFormat::Hour12), "3pm");
    }

    #[test]
    fn clock_formats() {
        let t = NaiveDate::from_ymd_opt(2026, 2, 16).unwrap().and_hms_opt(14, 5, 0).unwrap();
        assert_eq!(format_clock(t, ClockFormat::Hour24), "14:05");
        assert_eq!(format_clock(t, ClockFormat::Hour12), "2:05pm");
    }
}
