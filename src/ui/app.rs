use std::future::Future;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::time::Duration;

use anyhow::Context as _;
use chrono::{Local, NaiveDate, Utc};
use eframe::egui;
use egui::{Color32, RichText};
use tracing::{info, warn};

use crate::api::time::{parse_input, to_input};
use crate::api::{
    ApiError, Category, CreatedEntry, Credentials, EntriesResponse, Entry, EntryUpdate,
    LoginResponse, NamuClient, NewCategory, NewEntry,
};
use crate::config::{ClockFormat, Config, ViewMode};
use crate::layout::{add_days, layout_week, week_start_of, HourWindow};
use crate::session::Session;
use crate::stats::{self, Summary};
use crate::timer::{format_elapsed, Timer, TimerState};
use super::charts;
use super::theme::{self, EventColors};
use super::views::{self, WeekNav};

pub struct NamuApp {
    config: Config,
    state: AppState,
    session: Option<Session>,
    client: NamuClient,
    ctx: egui::Context,

    // Login / register form
    login_mode: LoginMode,
    login_server: String,
    login_username: String,
    login_password: String,

    // Data
    username: String,
    entries: Vec<Entry>,
    categories: Vec<Category>,
    week_start: NaiveDate,
    event_colors: EventColors,

    // Timer
    timer: Timer,
    timer_category: Option<String>,
    timer_start_input: String,
    timer_end_input: String,

    // Manage
    selected_entry: Option<i64>,
    edit_category: Option<String>,
    edit_start_input: String,
    edit_end_input: String,
    new_category_name: String,

    // Status
    status_message: Option<(String, bool)>, // (message, is_error)
    pending: usize,
    is_offline: bool,

    // Async communication
    runtime: tokio::runtime::Runtime,
    result_rx: Receiver<AsyncResult>,
    result_tx: Sender<AsyncResult>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum AppState {
    Login,
    Main,
}

/// Button pressed in the manage view
#[derive(Debug, Clone, Copy, PartialEq)]
enum ManageAction {
    Select(i64),
    Save,
    ClearSelection,
    CreateEntry,
    CreateCategory,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum LoginMode {
    Login,
    Register,
}

enum AsyncResult {
    LoggedIn(LoginResponse),
    Registered(Credentials),
    SessionVerified(String),
    SessionRejected(String),
    EntriesLoaded(EntriesResponse),
    CategoriesLoaded(Vec<Category>),
    CategoryCreated(Category),
    EntryCreated(CreatedEntry),
    EntryUpdated(i64),
    Error(String),
    Offline,
}

impl AsyncResult {
    /// Results that only make sense while logged in
    fn needs_session(&self) -> bool {
        matches!(
            self,
            AsyncResult::SessionVerified(_)
                | AsyncResult::EntriesLoaded(_)
                | AsyncResult::CategoryCreated(_)
                | AsyncResult::EntryCreated(_)
                | AsyncResult::EntryUpdated(_)
        )
    }
}

impl From<ApiError> for AsyncResult {
    fn from(err: ApiError) -> Self {
        if err.is_unreachable() {
            AsyncResult::Offline
        } else if err.is_unauthorized() {
            AsyncResult::SessionRejected(err.to_string())
        } else {
            AsyncResult::Error(err.to_string())
        }
    }
}

fn make_client(config: &Config, session: Option<&Session>) -> anyhow::Result<NamuClient> {
    let client = NamuClient::new(config.base_url())?;
    Ok(match session {
        Some(session) => client.with_token(session.token.clone()),
        None => client,
    })
}

impl NamuApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> anyhow::Result<Self> {
        let config = Config::load().unwrap_or_else(|e| {
            warn!(error = %e, "Falling back to default config");
            Config::default()
        });
        super::setup_fonts(&cc.egui_ctx);
        super::setup_theme(&cc.egui_ctx, config.dark_mode, config.font_scale);

        let session = config.access_token.clone()
            .filter(|_| config.has_session())
            .map(|token| Session::restore(token, &config.username))
            .filter(|s| !s.is_expired(Utc::now()));
        let state = if session.is_some() { AppState::Main } else { AppState::Login };

        let runtime = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;
        let (result_tx, result_rx) = channel();
        let client = make_client(&config, session.as_ref())?;

        let mut app = Self {
            login_mode: LoginMode::Login,
            login_server: config.server_url.clone(),
            login_username: config.username.clone(),
            login_password: String::new(),
            username: session.as_ref().map(|s| s.username.clone()).unwrap_or_default(),
            event_colors: EventColors::build(&[], config.dark_mode),
            config,
            state,
            session,
            client,
            ctx: cc.egui_ctx.clone(),
            entries: Vec::new(),
            categories: Vec::new(),
            week_start: week_start_of(Local::now().date_naive()),
            timer: Timer::default(),
            timer_category: None,
            timer_start_input: String::new(),
            timer_end_input: String::new(),
            selected_entry: None,
            edit_category: None,
            edit_start_input: String::new(),
            edit_end_input: String::new(),
            new_category_name: String::new(),
            status_message: None,
            pending: 0,
            is_offline: false,
            runtime,
            result_rx,
            result_tx,
        };

        if app.state == AppState::Main {
            app.verify_session();
            app.refresh_data();
        }

        Ok(app)
    }

    /// Run `task` on the runtime and hand its result back to the UI thread
    fn spawn<F>(&mut self, task: F)
    where
        F: Future<Output = AsyncResult> + Send + 'static,
    {
        self.pending += 1;
        let tx = self.result_tx.clone();
        let ctx = self.ctx.clone();
        self.runtime.spawn(async move {
            let _ = tx.send(task.await);
            ctx.request_repaint();
        });
    }

    fn rebuild_client(&mut self) {
        match make_client(&self.config, self.session.as_ref()) {
            Ok(client) => self.client = client,
            Err(e) => self.status_message = Some((format!("HTTP client error: {}", e), true)),
        }
    }

    fn save_config(&mut self) {
        if let Err(e) = self.config.save() {
            warn!(error = %e, "Failed to save config");
            self.status_message = Some((format!("Failed to save settings: {}", e), true));
        }
    }

    fn check_async_results(&mut self) {
        while let Ok(result) = self.result_rx.try_recv() {
            self.pending = self.pending.saturating_sub(1);
            if self.session.is_none() && result.needs_session() {
                continue;
            }
            match result {
                AsyncResult::LoggedIn(response) => {
                    let session = Session::from_login(&response);
                    info!(username = %session.username, "Logged in");
                    self.username = session.username.clone();
                    self.config.username = session.username.clone();
                    self.config.access_token = Some(session.token.clone());
                    self.session = Some(session);
                    self.login_password.clear();
                    self.save_config();
                    self.rebuild_client();
                    self.state = AppState::Main;
                    self.status_message = None;
                    self.refresh_data();
                }
                AsyncResult::Registered(credentials) => {
                    info!(username = %credentials.username, "Registered");
                    self.status_message = Some(("Account created, logging in…".to_string(), false));
                    let client = self.client.clone();
                    self.spawn(async move {
                        match client.login(&credentials).await {
                            Ok(response) => AsyncResult::LoggedIn(response),
                            Err(e) => AsyncResult::Error(e.to_string()),
                        }
                    });
                }
                AsyncResult::SessionVerified(user) => {
                    self.username = user;
                }
                AsyncResult::SessionRejected(message) => {
                    if self.state == AppState::Main {
                        warn!(%message, "Session rejected by service");
                        self.logout();
                    }
                    self.status_message = Some((message, true));
                }
                AsyncResult::EntriesLoaded(response) => {
                    self.username = response.username;
                    self.entries = response.entries;
                    self.event_colors = EventColors::build(&self.entries, self.config.dark_mode);
                    self.is_offline = false;
                }
                AsyncResult::CategoriesLoaded(categories) => {
                    self.categories = categories;
                }
                AsyncResult::CategoryCreated(category) => {
                    self.status_message = Some((format!("Category \"{}\" ready", category.name), false));
                    if !self.categories.iter().any(|c| c.id == category.id) {
                        self.categories.push(category);
                        self.categories.sort_by(|a, b| a.name.cmp(&b.name));
                    }
                    self.new_category_name.clear();
                }
                AsyncResult::EntryCreated(entry) => {
                    info!(id = entry.id, category = %entry.category, "Entry created");
                    self.status_message = Some(("Entry submitted successfully!".to_string(), false));
                    self.timer.reset();
                    self.timer_category = None;
                    self.timer_start_input.clear();
                    self.timer_end_input.clear();
                    self.refresh_entries();
                }
                AsyncResult::EntryUpdated(id) => {
                    info!(id, "Entry updated");
                    self.status_message = Some(("Entry updated".to_string(), false));
                    self.refresh_entries();
                }
                AsyncResult::Error(message) => {
                    self.status_message = Some((message, true));
                }
                AsyncResult::Offline => {
                    self.is_offline = true;
                }
            }
        }
    }

    fn check_session_expiry(&mut self) {
        let expired = self.session.as_ref().is_some_and(|s| s.is_expired(Utc::now()));
        if expired {
            info!("Session token expired");
            self.logout();
            self.status_message = Some(("Token expired".to_string(), true));
        }
    }

    fn verify_session(&mut self) {
        let client = self.client.clone();
        self.spawn(async move {
            match client.verify_session().await {
                Ok(response) => AsyncResult::SessionVerified(response.user),
                Err(e) if e.is_unreachable() => AsyncResult::Offline,
                Err(e) => AsyncResult::SessionRejected(e.to_string()),
            }
        });
    }

    fn refresh_data(&mut self) {
        self.refresh_entries();
        self.refresh_categories();
    }

    fn refresh_entries(&mut self) {
        let client = self.client.clone();
        self.spawn(async move {
            match client.fetch_entries().await {
                Ok(response) => AsyncResult::EntriesLoaded(response),
                Err(e) => e.into(),
            }
        });
    }

    fn refresh_categories(&mut self) {
        let client = self.client.clone();
        self.spawn(async move {
            match client.fetch_categories().await {
                Ok(categories) => AsyncResult::CategoriesLoaded(categories),
                Err(e) => e.into(),
            }
        });
    }

    fn submit_login(&mut self) {
        self.config.server_url = self.login_server.trim().to_string();
        self.rebuild_client();
        self.status_message = None;

        let credentials = Credentials::new(&self.login_username, &self.login_password);
        let client = self.client.clone();
        match self.login_mode {
            LoginMode::Login => self.spawn(async move {
                match client.login(&credentials).await {
                    Ok(response) => AsyncResult::LoggedIn(response),
                    Err(e) => AsyncResult::Error(e.to_string()),
                }
            }),
            LoginMode::Register => self.spawn(async move {
                match client.register(&credentials).await {
                    Ok(_) => AsyncResult::Registered(credentials),
                    Err(e) => AsyncResult::Error(e.to_string()),
                }
            }),
        }
    }

    fn logout(&mut self) {
        self.session = None;
        self.config.clear_session();
        self.save_config();
        self.rebuild_client();
        self.entries.clear();
        self.event_colors = EventColors::build(&[], self.config.dark_mode);
        self.timer.reset();
        self.selected_entry = None;
        self.state = AppState::Login;
    }

    fn navigate(&mut self, nav: WeekNav) {
        self.week_start = match nav {
            WeekNav::Previous => add_days(self.week_start, -7),
            WeekNav::Current => week_start_of(Local::now().date_naive()),
            WeekNav::Next => add_days(self.week_start, 7),
        };
    }

    fn toggle_dark_mode(&mut self) {
        self.config.dark_mode = !self.config.dark_mode;
        super::setup_theme(&self.ctx, self.config.dark_mode, self.config.font_scale);
        self.event_colors = EventColors::build(&self.entries, self.config.dark_mode);
        self.save_config();
    }

    fn select_entry(&mut self, id: i64) {
        let Some(entry) = self.entries.iter().find(|e| e.id == id) else {
            return;
        };
        self.edit_category = Some(entry.category.clone());
        self.edit_start_input = to_input(&entry.start_time, &Local);
        self.edit_end_input = to_input(&entry.end_time, &Local);
        self.selected_entry = Some(id);
        self.config.view_mode = ViewMode::Manage;
    }

    fn clear_selection(&mut self) {
        self.selected_entry = None;
        self.edit_category = None;
        self.edit_start_input.clear();
        self.edit_end_input.clear();
    }

    /// Category, start and end from the manage form
    fn edit_form_values(&mut self) -> Option<(String, chrono::DateTime<Utc>, chrono::DateTime<Utc>)> {
        let Some(category) = self.edit_category.clone() else {
            self.status_message = Some(("Select a category".to_string(), true));
            return None;
        };
        let Some(start) = parse_input(&self.edit_start_input, &Local) else {
            self.status_message = Some(("Start must look like 2026-02-16T09:30".to_string(), true));
            return None;
        };
        let Some(end) = parse_input(&self.edit_end_input, &Local) else {
            self.status_message = Some(("End must look like 2026-02-16T10:30".to_string(), true));
            return None;
        };
        Some((category, start, end))
    }

    fn save_selected_entry(&mut self) {
        let Some(id) = self.selected_entry else { return };
        let Some((category, start_time, end_time)) = self.edit_form_values() else { return };
        let update = EntryUpdate { category, start_time, end_time };
        let client = self.client.clone();
        self.spawn(async move {
            match client.update_entry(id, &update).await {
                Ok(id) => AsyncResult::EntryUpdated(id),
                Err(e) => e.into(),
            }
        });
    }

    fn create_entry_from_form(&mut self) {
        let Some((category, start_time, end_time)) = self.edit_form_values() else { return };
        let entry = NewEntry {
            username: self.username.clone(),
            category,
            start_time,
            end_time,
        };
        let client = self.client.clone();
        self.spawn(async move {
            match client.create_entry(&entry).await {
                Ok(created) => AsyncResult::EntryCreated(created),
                Err(e) => e.into(),
            }
        });
    }

    fn submit_timer(&mut self) {
        let Some(entry) = self.timer.draft(&self.username, self.timer_category.as_deref()) else {
            return;
        };
        let client = self.client.clone();
        self.spawn(async move {
            match client.create_entry(&entry).await {
                Ok(created) => AsyncResult::EntryCreated(created),
                Err(e) => e.into(),
            }
        });
    }

    fn create_category(&mut self) {
        let category = match NewCategory::new(&self.new_category_name) {
            Ok(category) => category,
            Err(e) => {
                self.status_message = Some((e.to_string(), true));
                return;
            }
        };
        let client = self.client.clone();
        self.spawn(async move {
            match client.create_category(&category).await {
                Ok(category) => AsyncResult::CategoryCreated(category),
                Err(e) => e.into(),
            }
        });
    }

    /// Entries in scope for charts and table
    fn visible_entries(&self) -> Vec<&Entry> {
        if self.config.show_all {
            self.entries.iter().collect()
        } else {
            stats::entries_in_week(&self.entries, self.week_start, &Local)
        }
    }

    fn render_status(&mut self, ui: &mut egui::Ui) {
        let mut dismiss = false;
        if let Some((message, is_error)) = &self.status_message {
            ui.horizontal(|ui| {
                let color = if *is_error { theme::error_color() } else { theme::success_color() };
                ui.label(RichText::new(message).color(color));
                if ui.small_button(egui_phosphor::regular::X).clicked() {
                    dismiss = true;
                }
            });
        }
        if dismiss {
            self.status_message = None;
        }
    }

    fn render_login(&mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(80.0);
            ui.heading(RichText::new("Namu").size(32.0).strong());
            ui.label("Personal time tracking");
            ui.add_space(24.0);

            ui.horizontal(|ui| {
                ui.selectable_value(&mut self.login_mode, LoginMode::Login, "Log in");
                ui.selectable_value(&mut self.login_mode, LoginMode::Register, "Register");
            });
            ui.add_space(12.0);

            let mut submit = false;
            egui::Grid::new("login_grid")
                .num_columns(2)
                .spacing([20.0, 10.0])
                .show(ui, |ui| {
                    ui.label("Server");
                    ui.add(egui::TextEdit::singleline(&mut self.login_server)
                        .hint_text("http://localhost:3000")
                        .desired_width(280.0));
                    ui.end_row();

                    ui.label("Username");
                    ui.add(egui::TextEdit::singleline(&mut self.login_username)
                        .desired_width(280.0));
                    ui.end_row();

                    ui.label("Password");
                    let response = ui.add(egui::TextEdit::singleline(&mut self.login_password)
                        .password(true)
                        .desired_width(280.0));
                    if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                        submit = true;
                    }
                    ui.end_row();
                });

            ui.add_space(16.0);
            let label = match self.login_mode {
                LoginMode::Login => "Log in",
                LoginMode::Register => "Create account",
            };
            if ui.add_enabled(self.pending == 0, egui::Button::new(label)).clicked() {
                submit = true;
            }
            if self.pending > 0 {
                ui.spinner();
            }
            ui.add_space(12.0);
            self.render_status(ui);

            if submit && self.pending == 0 {
                self.submit_login();
            }
        });
    }

    fn render_header(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label(RichText::new("Namu").size(20.0).strong());
            ui.add_space(16.0);
            ui.selectable_value(&mut self.config.view_mode, ViewMode::Calendar, "Calendar");
            ui.selectable_value(&mut self.config.view_mode, ViewMode::Charts, "Charts");
            ui.selectable_value(&mut self.config.view_mode, ViewMode::Entries, "Entries");
            ui.selectable_value(&mut self.config.view_mode, ViewMode::Timer, "Timer");
            ui.selectable_value(&mut self.config.view_mode, ViewMode::Manage, "Manage");

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button(egui_phosphor::regular::SIGN_OUT).on_hover_text("Log out").clicked() {
                    self.logout();
                    return;
                }
                let theme_icon = if self.config.dark_mode {
                    egui_phosphor::regular::SUN
                } else {
                    egui_phosphor::regular::MOON
                };
                if ui.button(theme_icon).on_hover_text("Toggle dark mode").clicked() {
                    self.toggle_dark_mode();
                }
                if ui.button(egui_phosphor::regular::ARROWS_CLOCKWISE).on_hover_text("Refresh").clicked() {
                    self.refresh_data();
                }
                let clock_label = match self.config.clock_format {
                    ClockFormat::Hour24 => "24h",
                    ClockFormat::Hour12 => "12h",
                };
                if ui.button(clock_label).on_hover_text("Clock format").clicked() {
                    self.config.clock_format = match self.config.clock_format {
                        ClockFormat::Hour24 => ClockFormat::Hour12,
                        ClockFormat::Hour12 => ClockFormat::Hour24,
                    };
                    self.save_config();
                }
                if self.pending > 0 {
                    ui.spinner();
                }
                ui.label(RichText::new(&self.username).color(Color32::GRAY));
            });
        });
    }

    fn render_offline(&mut self, ui: &mut egui::Ui) {
        ui.add_space(40.0);
        ui.vertical_centered(|ui| {
            ui.label(
                RichText::new(egui_phosphor::regular::WIFI_SLASH)
                    .size(34.0)
                    .color(theme::error_color())
            );
            ui.add_space(16.0);
            ui.label(RichText::new("Could not reach the Namu service").size(20.0));
            ui.add_space(8.0);
            ui.label(RichText::new(self.config.base_url()).color(Color32::GRAY));
            ui.add_space(24.0);
            if ui.button(format!("{} Retry", egui_phosphor::regular::ARROWS_CLOCKWISE)).clicked() {
                self.is_offline = false;
                self.refresh_data();
            }
        });
    }

    fn render_scope_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if !self.config.show_all {
                if let Some(nav) = views::render_week_navigator(ui, self.week_start) {
                    self.navigate(nav);
                }
            }
            ui.add_space(16.0);
            if ui.checkbox(&mut self.config.show_all, "All entries").changed() {
                self.save_config();
            }
        });
    }

    fn render_calendar(&mut self, ui: &mut egui::Ui) {
        if let Some(nav) = views::render_week_navigator(ui, self.week_start) {
            self.navigate(nav);
        }
        ui.add_space(8.0);

        let clicked = {
            let layout = layout_week(&self.entries, self.week_start, &Local);
            let window = HourWindow::fit(
                &layout,
                self.config.schedule_start_hour,
                self.config.schedule_end_hour,
            );
            views::render_calendar(ui, &layout, window, &self.event_colors, self.config.clock_format)
        };
        if let Some(id) = clicked {
            self.select_entry(id);
        }
    }

    fn render_charts(&mut self, ui: &mut egui::Ui) {
        self.render_scope_bar(ui);
        ui.add_space(8.0);

        let dark = self.config.dark_mode;
        let visible = self.visible_entries();
        let summary = Summary::of(visible.iter().copied());
        let totals = stats::category_breakdown(visible.iter().copied());
        let palette = theme::palette(dark);

        views::render_summary_cards(ui, &summary, self.config.show_all, dark);
        ui.add_space(12.0);
        ui.columns(2, |columns| {
            columns[0].label(RichText::new("Hours by category").strong());
            charts::render_bar_chart(&mut columns[0], &totals, palette, dark);
            columns[1].label(RichText::new("Share of time").strong());
            charts::render_pie_chart(&mut columns[1], &totals, palette, dark);
        });
    }

    fn render_entries(&mut self, ui: &mut egui::Ui) {
        self.render_scope_bar(ui);
        ui.add_space(8.0);
        let clicked = {
            let visible = self.visible_entries();
            views::render_entries_table(ui, &visible, self.config.clock_format)
        };
        if let Some(id) = clicked {
            self.select_entry(id);
        }
    }

    fn category_picker(ui: &mut egui::Ui, id: &str, categories: &[Category], selected: &mut Option<String>) {
        let text = selected.clone().unwrap_or_else(|| "Select a category".to_string());
        egui::ComboBox::from_id_salt(id)
            .selected_text(text)
            .width(240.0)
            .show_ui(ui, |ui| {
                for category in categories {
                    ui.selectable_value(selected, Some(category.name.clone()), category.name.as_str());
                }
            });
    }

    fn render_timer(&mut self, ui: &mut egui::Ui) {
        let now = Utc::now();
        ui.heading("Timer");
        ui.label("Select a category, start the timer, then submit your entry.");
        ui.add_space(12.0);

        ui.horizontal(|ui| {
            ui.label("Category");
            if self.categories.is_empty() {
                ui.label(RichText::new("No categories yet").color(Color32::GRAY));
            } else {
                Self::category_picker(ui, "timer_category", &self.categories, &mut self.timer_category);
            }
        });
        ui.add_space(16.0);

        ui.vertical_centered(|ui| {
            ui.label(
                RichText::new(format_elapsed(self.timer.elapsed_seconds(now)))
                    .size(56.0)
                    .monospace(),
            );
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                let running = self.timer.is_running();
                if ui.add_enabled(!running, egui::Button::new(format!("{} Start", egui_phosphor::regular::PLAY))).clicked() {
                    self.timer.start(now);
                    self.timer_start_input = to_input(&now, &Local);
                    self.timer_end_input.clear();
                    self.status_message = None;
                }
                if ui.add_enabled(running, egui::Button::new(format!("{} Stop", egui_phosphor::regular::STOP))).clicked() {
                    self.timer.stop(now);
                    self.timer_end_input = to_input(&now, &Local);
                }
            });
        });
        ui.add_space(16.0);

        let editable = self.timer.state() != TimerState::Idle;
        egui::Grid::new("timer_times")
            .num_columns(2)
            .spacing([20.0, 10.0])
            .show(ui, |ui| {
                ui.label("Start");
                let start = ui.add_enabled(editable, egui::TextEdit::singleline(&mut self.timer_start_input)
                    .hint_text("YYYY-MM-DDTHH:MM")
                    .desired_width(200.0));
                if start.changed() {
                    if let Some(dt) = parse_input(&self.timer_start_input, &Local) {
                        self.timer.set_start(dt);
                    }
                }
                ui.end_row();

                ui.label("End");
                let end = ui.add_enabled(
                    self.timer.state() == TimerState::Stopped,
                    egui::TextEdit::singleline(&mut self.timer_end_input)
                        .hint_text("YYYY-MM-DDTHH:MM")
                        .desired_width(200.0),
                );
                if end.changed() {
                    if let Some(dt) = parse_input(&self.timer_end_input, &Local) {
                        self.timer.set_end(dt);
                    }
                }
                ui.end_row();

                if let Some(seconds) = self.timer.duration_seconds() {
                    ui.label("Duration");
                    let text = if seconds > 0 {
                        RichText::new(stats::format_duration(seconds))
                    } else {
                        RichText::new("End must be after start").color(theme::error_color())
                    };
                    ui.label(text);
                    ui.end_row();
                }
            });

        ui.add_space(16.0);
        let ready = self.timer.draft(&self.username, self.timer_category.as_deref()).is_some();
        if ui.add_enabled(ready && self.pending == 0, egui::Button::new("Submit entry")).clicked() {
            self.submit_timer();
        }

        if self.timer.is_running() {
            ui.ctx().request_repaint_after(Duration::from_secs(1));
        }
    }

    fn render_manage(&mut self, ui: &mut egui::Ui) {
        let clock_format = self.config.clock_format;
        let mut action = None;

        ui.columns(2, |columns| {
            let ui = &mut columns[0];
            ui.label(RichText::new("Entries").strong());
            egui::ScrollArea::vertical().id_salt("manage_entries").show(ui, |ui| {
                for entry in self.entries.iter().rev() {
                    let selected = self.selected_entry == Some(entry.id);
                    let label = format!(
                        "{}  {}  ({})",
                        entry.category,
                        views::format_local(&entry.start_time, clock_format),
                        stats::format_duration(entry.duration_seconds),
                    );
                    if ui.selectable_label(selected, label).clicked() {
                        action = Some(ManageAction::Select(entry.id));
                    }
                }
            });

            let ui = &mut columns[1];
            let title = if self.selected_entry.is_some() { "Edit entry" } else { "New entry" };
            ui.label(RichText::new(title).strong());
            egui::Grid::new("manage_form")
                .num_columns(2)
                .spacing([20.0, 10.0])
                .show(ui, |ui| {
                    ui.label("Category");
                    Self::category_picker(ui, "edit_category", &self.categories, &mut self.edit_category);
                    ui.end_row();

                    ui.label("Start");
                    ui.add(egui::TextEdit::singleline(&mut self.edit_start_input)
                        .hint_text("YYYY-MM-DDTHH:MM")
                        .desired_width(200.0));
                    ui.end_row();

                    ui.label("End");
                    ui.add(egui::TextEdit::singleline(&mut self.edit_end_input)
                        .hint_text("YYYY-MM-DDTHH:MM")
                        .desired_width(200.0));
                    ui.end_row();
                });

            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if self.selected_entry.is_some() {
                    if ui.add_enabled(self.pending == 0, egui::Button::new("Save changes")).clicked() {
                        action = Some(ManageAction::Save);
                    }
                    if ui.button("Clear selection").clicked() {
                        action = Some(ManageAction::ClearSelection);
                    }
                } else if ui.add_enabled(self.pending == 0, egui::Button::new("Create entry")).clicked() {
                    action = Some(ManageAction::CreateEntry);
                }
            });

            ui.add_space(24.0);
            ui.label(RichText::new("New category").strong());
            ui.horizontal(|ui| {
                ui.add(egui::TextEdit::singleline(&mut self.new_category_name)
                    .hint_text("e.g. Reading")
                    .desired_width(200.0));
                if ui.add_enabled(self.pending == 0, egui::Button::new("Add category")).clicked() {
                    action = Some(ManageAction::CreateCategory);
                }
            });
        });

        match action {
            Some(ManageAction::Select(id)) => self.select_entry(id),
            Some(ManageAction::Save) => self.save_selected_entry(),
            Some(ManageAction::ClearSelection) => self.clear_selection(),
            Some(ManageAction::CreateEntry) => self.create_entry_from_form(),
            Some(ManageAction::CreateCategory) => self.create_category(),
            None => {}
        }
    }

    fn render_main(&mut self, ui: &mut egui::Ui) {
        self.render_status(ui);

        if self.is_offline {
            self.render_offline(ui);
            return;
        }

        match self.config.view_mode {
            ViewMode::Calendar => self.render_calendar(ui),
            ViewMode::Charts => self.render_charts(ui),
            ViewMode::Entries => self.render_entries(ui),
            ViewMode::Timer => self.render_timer(ui),
            ViewMode::Manage => self.render_manage(ui),
        }
    }
}

impl eframe::App for NamuApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_async_results();
        self.check_session_expiry();

        match self.state {
            AppState::Login => {
                egui::CentralPanel::default().show(ctx, |ui| self.render_login(ui));
            }
            AppState::Main => {
                egui::TopBottomPanel::top("header")
                    .frame(egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::symmetric(16.0, 10.0)))
                    .show(ctx, |ui| self.render_header(ui));
                egui::CentralPanel::default().show(ctx, |ui| self.render_main(ui));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_results_need_a_session() {
        let loaded = AsyncResult::EntriesLoaded(EntriesResponse {
            username: "alice".to_string(),
            entries: Vec::new(),
        });
        assert!(loaded.needs_session());
        assert!(AsyncResult::EntryUpdated(3).needs_session());
        assert!(!AsyncResult::SessionRejected("Token has expired".to_string()).needs_session());
        assert!(!AsyncResult::Offline.needs_session());
    }

    #[test]
    fn rejected_token_ends_the_session() {
        let result: AsyncResult =
            ApiError::from_response(422, r#"{"msg": "Signature verification failed"}"#).into();
        assert!(matches!(result, AsyncResult::SessionRejected(ref m) if m == "Signature verification failed"));

        let result: AsyncResult = ApiError::from_response(401, r#"{"msg": "Token has expired"}"#).into();
        assert!(matches!(result, AsyncResult::SessionRejected(ref m) if m == "Token has expired"));
    }
}
