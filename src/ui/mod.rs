mod app;
mod charts;
mod theme;
mod views;

pub use app::NamuApp;
pub use theme::{setup_fonts, setup_theme, EventColors};
