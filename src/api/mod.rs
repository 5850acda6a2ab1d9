mod types;
mod client;
mod error;
pub mod time;

pub use types::*;
pub use client::NamuClient;
pub use error::{ApiError, ApiResult};
pub use time::{parse_timestamp, to_iso_utc};
