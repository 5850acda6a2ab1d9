//! Namu: a personal time tracker with a weekly calendar, charts and a timer,
//! backed by the Namu HTTP service.

pub mod api;
pub mod config;
pub mod layout;
pub mod logging;
pub mod session;
pub mod stats;
pub mod timer;
pub mod ui;
