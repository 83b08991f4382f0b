pub mod call_handling;
pub mod call_queues;
pub mod client;
pub mod common;
pub mod error;
pub mod oauth;
pub mod pool;
pub mod shared_line_groups;
pub mod test_helpers;
pub mod users;

pub use client::{Client, RetryConfig};
pub use common::{ApiErrorBody, ApiQueryParams, Optional, PaginationParams};
pub use error::{ApiError, Outcome};

use serde::Serialize;

pub const DEFAULT_API_ENDPOINT: &str = "https://api.zoom.us/v2";

/// Phone number reference in assignment bodies: `{"id"}` or `{"number"}`
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct PhoneNumberRef {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
}

impl PhoneNumberRef {
    pub fn by_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            number: None,
        }
    }

    pub fn by_number(number: impl Into<String>) -> Self {
        Self {
            id: None,
            number: Some(number.into()),
        }
    }
}
