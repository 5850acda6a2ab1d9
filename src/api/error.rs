use serde::Deserialize;
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

/// Failures talking to the Namu service.
///
/// `Display` is the plain message shown to the user; `status_code` is the
/// HTTP status the failure corresponds to.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Could not reach the Namu service")]
    Unreachable(#[source] reqwest::Error),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{message}")]
    Upstream { status: u16, message: String },

    #[error("Unexpected response from the Namu service")]
    Decode(#[source] reqwest::Error),
}

/// Error body shape used by the service: `{"error": "..."}`, `{"msg": "..."}` from
/// token checks, occasionally `{"message": "..."}`
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    msg: Option<String>,
    message: Option<String>,
}

impl ApiError {
    /// Build an error from a non-success response
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.error.or(b.msg).or(b.message))
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| format!("Request failed with status {}", status));

        match status {
            400 => ApiError::BadRequest(message),
            // 422 is a malformed or badly signed token
            401 | 422 => ApiError::Unauthorized(message),
            404 => ApiError::NotFound(message),
            409 => ApiError::Conflict(message),
            _ => ApiError::Upstream { status, message },
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::Unreachable(_) => 502,
            ApiError::Unauthorized(_) => 401,
            ApiError::BadRequest(_) => 400,
            ApiError::NotFound(_) => 404,
            ApiError::Conflict(_) => 409,
            ApiError::Upstream { status, .. } => *status,
            ApiError::Decode(_) => 502,
        }
    }

    /// The session token was rejected or is missing
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized(_))
    }

    pub fn is_unreachable(&self) -> bool {
        matches!(self, ApiError::Unreachable(_))
    }
}
