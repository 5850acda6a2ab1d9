use std::collections::HashMap;

use egui::{Color32, FontFamily, FontId, Rounding, Stroke, Style, TextStyle, Visuals};

use crate::api::Entry;

/// Chart palette in light mode
pub const LIGHT_PALETTE: [Color32; 5] = [
    Color32::from_rgb(0xa3, 0xb1, 0x8a),
    Color32::from_rgb(0x9e, 0xa4, 0x79),
    Color32::from_rgb(0x89, 0x90, 0x63),
    Color32::from_rgb(0x35, 0x40, 0x24),
    Color32::from_rgb(0x3a, 0x3d, 0x29),
];

/// Chart palette in dark mode
pub const DARK_PALETTE: [Color32; 5] = [
    Color32::from_rgb(0xf7, 0x25, 0x85),
    Color32::from_rgb(0xb5, 0x17, 0x9e),
    Color32::from_rgb(0x72, 0x09, 0xb7),
    Color32::from_rgb(0x56, 0x0b, 0xad),
    Color32::from_rgb(0x48, 0x0c, 0xa8),
];

const LIGHT_EVENT: Color32 = Color32::from_rgb(0x16, 0xa3, 0x4a);

pub fn palette(dark: bool) -> &'static [Color32] {
    if dark { &DARK_PALETTE } else { &LIGHT_PALETTE }
}

/// Calendar block colour for a category
pub fn event_color(category: &str, dark: bool) -> Color32 {
    if !dark {
        return LIGHT_EVENT;
    }
    match category {
        "Exercise" => Color32::from_rgb(0xf7, 0x25, 0x85),
        "Reading" => Color32::from_rgb(0x72, 0x09, 0xb7),
        "Work" => Color32::from_rgb(0x48, 0x0c, 0xa8),
        "Study" => Color32::from_rgb(0x43, 0x61, 0xee),
        _ => Color32::from_rgb(0xf7, 0x25, 0x85),
    }
}

/// Colour per entry id, rebuilt when the entries or the theme change and
/// handed to the calendar explicitly.
#[derive(Debug, Clone, Default)]
pub struct EventColors {
    dark: bool,
    colors: HashMap<i64, Color32>,
}

impl EventColors {
    pub fn build(entries: &[Entry], dark: bool) -> Self {
        let mut colors = HashMap::with_capacity(entries.len());
        for entry in entries {
            colors.entry(entry.id).or_insert_with(|| event_color(&entry.category, dark));
        }
        Self { dark, colors }
    }

    pub fn is_dark(&self) -> bool {
        self.dark
    }

    pub fn get(&self, entry: &Entry) -> Color32 {
        self.colors
            .get(&entry.id)
            .copied()
            .unwrap_or_else(|| event_color(&entry.category, self.dark))
    }
}

/// Font family for filled Phosphor icons
pub fn phosphor_fill_family() -> FontFamily {
    FontFamily::Name("phosphor-fill".into())
}

/// Font family for bold text
pub fn bold_family() -> FontFamily {
    FontFamily::Name("bold".into())
}

pub fn setup_fonts(ctx: &egui::Context) {
    let mut fonts = egui::FontDefinitions::default();

    // Add Phosphor Regular icons as fallback in Proportional family
    egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);

    // No bundled bold face: the bold family renders with the proportional stack
    let proportional = fonts.families
        .get(&FontFamily::Proportional)
        .cloned()
        .unwrap_or_default();
    fonts.families.insert(bold_family(), proportional.clone());

    // Phosphor Fill as a separate family, proportional fonts as fallback for text
    fonts.font_data.insert(
        "phosphor-fill".into(),
        egui_phosphor::Variant::Fill.font_data(),
    );
    let mut fill_family = vec!["phosphor-fill".to_owned()];
    fill_family.extend(proportional);
    fonts.families.insert(phosphor_fill_family(), fill_family);

    ctx.set_fonts(fonts);
}

pub fn setup_theme(ctx: &egui::Context, dark: bool, font_scale: f32) {
    let mut style = Style::default();

    let mut visuals = if dark { Visuals::dark() } else { Visuals::light() };

    if dark {
        let bg = Color32::from_rgb(0x17, 0x17, 0x17);
        visuals.panel_fill = bg;
        visuals.window_fill = bg;
        visuals.faint_bg_color = Color32::from_rgb(0x26, 0x26, 0x26);
        visuals.extreme_bg_color = Color32::BLACK;
    } else {
        // "bone" background of the light theme
        let bone = Color32::from_rgb(0xf9, 0xf6, 0xf0);
        visuals.panel_fill = bone;
        visuals.window_fill = bone;
        visuals.faint_bg_color = Color32::from_rgb(0xf3, 0xec, 0xe3);
    }

    let accent = if dark { DARK_PALETTE[0] } else { LIGHT_EVENT };
    visuals.widgets.active.bg_fill = accent;
    visuals.widgets.active.fg_stroke = Stroke::new(1.0, Color32::WHITE);
    visuals.selection.bg_fill = accent;
    visuals.selection.stroke = Stroke::new(1.0, Color32::WHITE);
    visuals.hyperlink_color = accent;

    // Rounded corners
    visuals.widgets.noninteractive.rounding = Rounding::same(6.0);
    visuals.widgets.inactive.rounding = Rounding::same(6.0);
    visuals.widgets.hovered.rounding = Rounding::same(6.0);
    visuals.widgets.active.rounding = Rounding::same(6.0);
    visuals.window_rounding = Rounding::same(8.0);

    style.visuals = visuals;

    let size = 14.0 * font_scale;
    style.text_styles = [
        (TextStyle::Small, FontId::new(size - 2.0, FontFamily::Proportional)),
        (TextStyle::Body, FontId::new(size, FontFamily::Proportional)),
        (TextStyle::Button, FontId::new(size, FontFamily::Proportional)),
        (TextStyle::Heading, FontId::new(size + 6.0, FontFamily::Proportional)),
        (TextStyle::Monospace, FontId::new(size, FontFamily::Monospace)),
    ]
    .into();

    style.spacing.item_spacing = egui::vec2(12.0, 10.0);
    style.spacing.button_padding = egui::vec2(14.0, 8.0);
    style.spacing.window_margin = egui::Margin::same(24.0);

    ctx.set_style(style);
}

/// Returns (card_bg, grid_line, muted_text) for the current theme
pub fn surface_colors(dark: bool) -> (Color32, Color32, Color32) {
    if dark {
        (
            Color32::from_rgb(0x17, 0x17, 0x17),
            Color32::from_rgb(0x26, 0x26, 0x26),
            Color32::from_rgb(0xa3, 0xa3, 0xa3),
        )
    } else {
        (
            Color32::from_rgb(0xf9, 0xf6, 0xf0),
            Color32::from_rgb(0xd4, 0xd4, 0xd4),
            Color32::from_rgb(0x52, 0x52, 0x52),
        )
    }
}

pub fn error_color() -> Color32 {
    Color32::from_rgb(0xef, 0x44, 0x44)
}

pub fn success_color() -> Color32 {
    Color32::from_rgb(0x22, 0xc5, 0x5e)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn entry(id: i64, category: &str) -> Entry {
        let t = Utc.with_ymd_and_hms(2026, 2, 16, 9, 0, 0).unwrap();
        Entry { id, category: category.into(), duration_seconds: 0, start_time: t, end_time: t }
    }

    #[test]
    fn known_categories_have_their_own_colour_in_dark_mode() {
        let colors = EventColors::build(&[entry(1, "Work"), entry(2, "Gardening")], true);
        assert_eq!(colors.get(&entry(1, "Work")), Color32::from_rgb(0x48, 0x0c, 0xa8));
        assert_eq!(colors.get(&entry(2, "Gardening")), DARK_PALETTE[0]);
    }

    #[test]
    fn first_colour_per_id_wins() {
        let colors = EventColors::build(&[entry(1, "Work"), entry(1, "Study")], true);
        assert_eq!(colors.get(&entry(1, "Study")), event_color("Work", true));
    }

    #[test]
    fn light_mode_is_uniform() {
        let colors = EventColors::build(&[entry(1, "Work")], false);
        assert_eq!(colors.get(&entry(1, "Work")), LIGHT_EVENT);
        assert!(!colors.is_dark());
    }
}
