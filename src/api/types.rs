use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::error::{ApiError, ApiResult};
use super::time::timestamp;

/// Longest username or category name the service accepts
pub const MAX_NAME_LEN: usize = 100;
/// Shortest password the service accepts at registration
pub const MIN_PASSWORD_LEN: usize = 6;

/// A recorded activity interval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: i64,
    pub category: String,
    /// Supplied by the service; not guaranteed to match the timestamps
    #[serde(default)]
    pub duration_seconds: i64,
    #[serde(with = "timestamp")]
    pub start_time: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub end_time: DateTime<Utc>,
}

impl Entry {
    /// Wall-clock start in the given zone
    pub fn local_start<Tz: TimeZone>(&self, tz: &Tz) -> NaiveDateTime {
        self.start_time.with_timezone(tz).naive_local()
    }

    /// Wall-clock end in the given zone
    pub fn local_end<Tz: TimeZone>(&self, tz: &Tz) -> NaiveDateTime {
        self.end_time.with_timezone(tz).naive_local()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntriesResponse {
    pub username: String,
    #[serde(default)]
    pub entries: Vec<Entry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoriesResponse {
    #[serde(default)]
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: username.trim().to_string(),
            password: password.to_string(),
        }
    }

    /// Login only needs both fields present
    pub fn validate_for_login(&self) -> ApiResult<()> {
        if self.username.is_empty() || self.password.is_empty() {
            return Err(ApiError::BadRequest(
                "Username and password are required".to_string(),
            ));
        }
        Ok(())
    }

    /// Registration rules enforced by the service, checked before sending
    pub fn validate_for_register(&self) -> ApiResult<()> {
        let len = self.username.chars().count();
        if len == 0 || len > MAX_NAME_LEN {
            return Err(ApiError::BadRequest(format!(
                "Username must be between 1 and {} characters",
                MAX_NAME_LEN
            )));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ApiError::BadRequest(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub authenticated: bool,
    pub user_id: i64,
    pub username: String,
    pub access_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub user_id: i64,
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtectedResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub user: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewCategory {
    pub name: String,
}

impl NewCategory {
    pub fn new(name: &str) -> ApiResult<Self> {
        let name = name.trim();
        let len = name.chars().count();
        if len == 0 || len > MAX_NAME_LEN {
            return Err(ApiError::BadRequest(format!(
                "Category name must be between 1 and {} characters",
                MAX_NAME_LEN
            )));
        }
        Ok(Self {
            name: name.to_string(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub category: Category,
}

/// Body for creating an entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewEntry {
    pub username: String,
    pub category: String,
    #[serde(with = "timestamp")]
    pub start_time: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub end_time: DateTime<Utc>,
}

impl NewEntry {
    pub fn validate(&self) -> ApiResult<()> {
        if self.username.trim().is_empty() {
            return Err(ApiError::Unauthorized("Not authenticated. Please log in.".to_string()));
        }
        validate_interval(&self.category, self.start_time, self.end_time)
    }
}

/// Body for updating an entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryUpdate {
    pub category: String,
    #[serde(with = "timestamp")]
    pub start_time: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub end_time: DateTime<Utc>,
}

impl EntryUpdate {
    pub fn validate(&self) -> ApiResult<()> {
        validate_interval(&self.category, self.start_time, self.end_time)
    }
}

fn validate_interval(category: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> ApiResult<()> {
    if category.trim().is_empty() {
        return Err(ApiError::BadRequest("category, start_time and end_time are required".to_string()));
    }
    if end <= start {
        return Err(ApiError::BadRequest("end_time must be after start_time".to_string()));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedEntry {
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
    pub category: String,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedEntryResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub entry: CreatedEntry,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatedEntryResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}
