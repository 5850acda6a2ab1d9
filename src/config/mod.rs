use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Overrides `server_url` from the config file
pub const SERVER_URL_ENV: &str = "NAMU_SERVER_URL";

const DEFAULT_SERVER_URL: &str = "http://localhost:3000";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ClockFormat {
    #[default]
    Hour24,      // "14:30"
    Hour12,      // "2:30pm"
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ViewMode {
    #[default]
    Calendar,    // Weekly calendar grid
    Charts,      // Summary cards, bar and pie charts
    Entries,     // Table of entries
    Timer,       // Stopwatch to record a new entry
    Manage,      // Edit entries, add categories
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_server_url")]
    pub server_url: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default = "default_font_scale")]
    pub font_scale: f32,
    #[serde(default)]
    pub clock_format: ClockFormat,
    #[serde(default = "default_true")]
    pub dark_mode: bool,
    #[serde(default)]
    pub view_mode: ViewMode,
    /// Show every entry instead of the selected week in charts and table
    #[serde(default)]
    pub show_all: bool,
    #[serde(default = "default_schedule_start_hour")]
    pub schedule_start_hour: u8,
    #[serde(default = "default_schedule_end_hour")]
    pub schedule_end_hour: u8,
}

fn default_server_url() -> String {
    DEFAULT_SERVER_URL.to_string()
}

fn default_schedule_start_hour() -> u8 {
    6  // 6am
}

fn default_schedule_end_hour() -> u8 {
    22  // 10pm
}

fn default_true() -> bool {
    true
}

fn default_font_scale() -> f32 {
    1.0
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            username: String::new(),
            access_token: None,
            font_scale: 1.0,
            clock_format: ClockFormat::Hour24,
            dark_mode: true,
            view_mode: ViewMode::Calendar,
            show_all: false,
            schedule_start_hour: default_schedule_start_hour(),
            schedule_end_hour: default_schedule_end_hour(),
        }
    }
}

impl Config {
    /// Load from the platform config dir, then apply `NAMU_SERVER_URL`
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        if let Ok(url) = std::env::var(SERVER_URL_ENV) {
            if !url.trim().is_empty() {
                config.server_url = url;
            }
        }
        Ok(config)
    }

    /// Missing file means defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let contents = fs::read_to_string(path)
            .context("Failed to read config file")?;
        serde_json::from_str(&contents)
            .context("Failed to parse config file")
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;

        Ok(())
    }

    /// A token is stored, so the app can try to resume the session
    pub fn has_session(&self) -> bool {
        self.access_token.as_deref().is_some_and(|t| !t.is_empty())
    }

    pub fn clear_session(&mut self) {
        self.access_token = None;
    }

    fn config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("dev", "namu", "namu")
            .context("Could not determine config directory")?;
        Ok(proj_dirs.config_dir().join("config.json"))
    }

    /// Server URL with a scheme and without trailing slashes
    pub fn base_url(&self) -> String {
        let url = self.server_url.trim().trim_end_matches('/');
        if url.is_empty() {
            DEFAULT_SERVER_URL.to_string()
        } else if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else {
            format!("http://{}", url)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_normalization() {
        let mut config = Config::default();
        assert_eq!(config.base_url(), "http://localhost:3000");

        config.server_url = " namu.example.com:3000/ ".into();
        assert_eq!(config.base_url(), "http://namu.example.com:3000");

        config.server_url = "https://namu.example.com//".into();
        assert_eq!(config.base_url(), "https://namu.example.com");

        config.server_url = String::new();
        assert_eq!(config.base_url(), "http://localhost:3000");
    }

    #[test]
    fn partial_file_gets_defaults() {
        let config: Config = serde_json::from_str(r#"{"username": "alice"}"#).unwrap();
        assert_eq!(config.username, "alice");
        assert_eq!(config.server_url, "http://localhost:3000");
        assert!(config.dark_mode);
        assert_eq!(config.view_mode, ViewMode::Calendar);
        assert_eq!(config.schedule_start_hour, 6);
        assert!(!config.has_session());
    }

    #[test]
    fn save_and_load_round_trip() {
        let path = std::env::temp_dir()
            .join(format!("namu-config-test-{}", std::process::id()))
            .join("config.json");
        let mut config = Config::default();
        config.username = "bob".into();
        config.access_token = Some("tok".into());
        config.view_mode = ViewMode::Timer;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.username, "bob");
        assert!(loaded.has_session());
        assert_eq!(loaded.view_mode, ViewMode::Timer);

        fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[test]
    fn missing_file_is_default() {
        let path = std::env::temp_dir().join("namu-config-does-not-exist.json");
        let config = Config::load_from(&path).unwrap();
        assert!(config.access_token.is_none());
    }
}
