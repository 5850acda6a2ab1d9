//! Painter-drawn bar and pie charts of hours per category

use std::f32::consts::TAU;

use egui::{Color32, Pos2, Shape, Stroke, Ui};

use crate::stats::{total_hours, CategoryTotal, MIN_LABELLED_SHARE};

const CHART_HEIGHT: f32 = 300.0;

pub fn render_bar_chart(ui: &mut Ui, totals: &[CategoryTotal], palette: &[Color32], dark: bool) {
    let (_, grid_color, text_color) = super::theme::surface_colors(dark);
    let width = ui.available_width();
    let (rect, _) = ui.allocate_exact_size(egui::vec2(width, CHART_HEIGHT), egui::Sense::hover());
    let painter = ui.painter_at(rect);

    if totals.is_empty() {
        painter.text(rect.center(), egui::Align2::CENTER_CENTER, "No entries", egui::FontId::proportional(14.0), text_color);
        return;
    }

    let axis_width = 40.0;
    let label_height = 28.0;
    let plot = egui::Rect::from_min_max(
        egui::pos2(rect.min.x + axis_width, rect.min.y + 8.0),
        egui::pos2(rect.max.x - 4.0, rect.max.y - label_height),
    );

    let max_hours = totals.iter().map(CategoryTotal::hours).fold(0.0_f64, f64::max);
    let top = nice_ceiling(max_hours);

    // Dashed-look horizontal grid with hour ticks
    let ticks = 4;
    for i in 0..=ticks {
        let value = top * i as f64 / ticks as f64;
        let y = plot.max.y - plot.height() * (i as f32 / ticks as f32);
        painter.line_segment([egui::pos2(plot.min.x, y), egui::pos2(plot.max.x, y)], Stroke::new(1.0, grid_color));
        painter.text(
            egui::pos2(plot.min.x - 6.0, y),
            egui::Align2::RIGHT_CENTER,
            format_tick(value),
            egui::FontId::proportional(11.0),
            text_color,
        );
    }

    let slot = plot.width() / totals.len() as f32;
    let bar_width = (slot * 0.6).min(80.0);
    for total in totals {
        let hours = total.hours();
        let x_center = plot.min.x + slot * (total.index as f32 + 0.5);
        let bar_height = if top > 0.0 { (hours / top) as f32 * plot.height() } else { 0.0 };
        let bar = egui::Rect::from_min_max(
            egui::pos2(x_center - bar_width / 2.0, plot.max.y - bar_height),
            egui::pos2(x_center + bar_width / 2.0, plot.max.y),
        );
        let color = palette[total.palette_slot(palette.len())];
        painter.rect_filled(bar, 2.0, color);

        let response = ui.interact(bar, ui.id().with(("bar", total.index)), egui::Sense::hover());
        response.on_hover_text(format!("{}: {:.2} h", total.category, hours));

        painter.text(
            egui::pos2(x_center, plot.max.y + 8.0),
            egui::Align2::CENTER_TOP,
            &total.category,
            egui::FontId::proportional(13.0),
            text_color,
        );
    }
}

pub fn render_pie_chart(ui: &mut Ui, totals: &[CategoryTotal], palette: &[Color32], dark: bool) {
    let (_, _, text_color) = super::theme::surface_colors(dark);
    let width = ui.available_width();
    let (rect, _) = ui.allocate_exact_size(egui::vec2(width, CHART_HEIGHT), egui::Sense::hover());
    let painter = ui.painter_at(rect);

    let sum = total_hours(totals);
    if sum <= 0.0 {
        painter.text(rect.center(), egui::Align2::CENTER_CENTER, "No entries", egui::FontId::proportional(14.0), text_color);
        return;
    }

    let legend_width = 140.0;
    let center = egui::pos2(rect.min.x + (rect.width() - legend_width) / 2.0, rect.center().y);
    let radius = ((rect.width() - legend_width).min(rect.height()) / 2.0 - 12.0).max(20.0);

    let mut angle = -TAU / 4.0;
    for total in totals {
        let share = total.share(sum);
        if share <= 0.0 {
            continue;
        }
        let sweep = TAU * (share / 100.0) as f32;
        let color = palette[total.palette_slot(palette.len())];

        // Convex pieces of at most ~10 degrees so each polygon stays convex
        let steps = ((sweep / 0.17).ceil() as usize).max(1);
        for step in 0..steps {
            let a0 = angle + sweep * step as f32 / steps as f32;
            let a1 = angle + sweep * (step + 1) as f32 / steps as f32;
            let points = vec![center, polar(center, radius, a0), polar(center, radius, a1)];
            painter.add(Shape::convex_polygon(points, color, Stroke::NONE));
        }

        if share >= MIN_LABELLED_SHARE {
            let mid = angle + sweep / 2.0;
            painter.text(
                polar(center, radius * 0.55, mid),
                egui::Align2::CENTER_CENTER,
                format!("{:.0}%", share),
                egui::FontId::proportional(12.0),
                Color32::WHITE,
            );
        }
        angle += sweep;
    }

    // Legend
    let mut y = rect.min.y + 16.0;
    let x = rect.max.x - legend_width + 8.0;
    for total in totals {
        let color = palette[total.palette_slot(palette.len())];
        painter.rect_filled(egui::Rect::from_min_size(egui::pos2(x, y - 5.0), egui::vec2(10.0, 10.0)), 2.0, color);
        painter.text(
            egui::pos2(x + 16.0, y),
            egui::Align2::LEFT_CENTER,
            format!("{} ({:.2} h)", total.category, total.hours()),
            egui::FontId::proportional(12.0),
            text_color,
        );
        y += 20.0;
    }
}

fn polar(center: Pos2, radius: f32, angle: f32) -> Pos2 {
    egui::pos2(center.x + radius * angle.cos(), center.y + radius * angle.sin())
}

/// Round the axis maximum up to 1, 2 or 5 times a power of ten
fn nice_ceiling(value: f64) -> f64 {
    if value <= 0.0 {
        return 1.0;
    }
    let magnitude = 10f64.powf(value.log10().floor());
    let normalized = value / magnitude;
    let nice = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

fn format_tick(value: f64) -> String {
    if value.fract().abs() < 1e-9 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}
