use thiserror::Error;

use super::common::ApiErrorBody;

/// Domain code Zoom returns (with HTTP 400) for an object that was already deleted
pub const CODE_ALREADY_DELETED: i64 = 300;
/// Domain code Zoom returns (with HTTP 400 or 404) for an object that does not exist
pub const CODE_NOT_FOUND: i64 = 404;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error (HTTP {status}): {message}")]
    ApiError {
        status: u16,
        message: String,
        #[source]
        details: Option<Box<ApiErrorBody>>,
    },

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("Authentication failed")]
    AuthError,

    #[error("OAuth token request failed: {0}")]
    OAuthError(String),

    #[error("Request timeout after {0} seconds")]
    Timeout(u64),

    #[error("Too many requests, rate limited")]
    RateLimited,

    #[error("Service unavailable, retry later")]
    ServiceUnavailable,

    #[error("Request cancelled")]
    Cancelled,
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::ApiError { status, .. } => Some(*status),
            ApiError::AuthError => Some(401),
            ApiError::RateLimited => Some(429),
            _ => None,
        }
    }

    /// Zoom domain code from the error body, if the body carried one
    pub fn code(&self) -> Option<i64> {
        match self {
            ApiError::ApiError {
                details: Some(body),
                ..
            } => body.code,
            _ => None,
        }
    }

    /// HTTP 400 with domain code 300
    pub fn is_already_deleted(&self) -> bool {
        self.status() == Some(400) && self.code() == Some(CODE_ALREADY_DELETED)
    }

    /// Plain HTTP 404, or HTTP 400/404 with domain code 404
    pub fn is_not_found(&self) -> bool {
        match (self.status(), self.code()) {
            (Some(404), _) => true,
            (Some(400), Some(CODE_NOT_FOUND)) => true,
            _ => false,
        }
    }
}

/// Result of reading a remote object whose absence is a normal outcome.
///
/// `Gone` means the remote reported the object as already deleted (or simply
/// not present); it is never an error.
#[derive(Debug)]
pub enum Outcome<T, E = ApiError> {
    Found(T),
    Gone,
    Error(E),
}

impl<T, E> Outcome<T, E> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U, E> {
        match self {
            Outcome::Found(v) => Outcome::Found(f(v)),
            Outcome::Gone => Outcome::Gone,
            Outcome::Error(e) => Outcome::Error(e),
        }
    }

    pub fn map_err<F>(self, f: impl FnOnce(E) -> F) -> Outcome<T, F> {
        match self {
            Outcome::Found(v) => Outcome::Found(v),
            Outcome::Gone => Outcome::Gone,
            Outcome::Error(e) => Outcome::Error(f(e)),
        }
    }

    /// Collapse into a `Result`, with `Gone` as `None`
    pub fn into_result(self) -> Result<Option<T>, E> {
        match self {
            Outcome::Found(v) => Ok(Some(v)),
            Outcome::Gone => Ok(None),
            Outcome::Error(e) => Err(e),
        }
    }

    pub fn is_gone(&self) -> bool {
        matches!(self, Outcome::Gone)
    }
}

impl<T> Outcome<T, ApiError> {
    /// Reads translate the already-deleted sentinel to `Gone`
    pub fn from_read(result: Result<T, ApiError>) -> Self {
        match result {
            Ok(v) => Outcome::Found(v),
            Err(e) if e.is_already_deleted() => Outcome::Gone,
            Err(e) => Outcome::Error(e),
        }
    }

    /// Like [`Outcome::from_read`] but a 404 also means gone
    pub fn from_lookup(result: Result<T, ApiError>) -> Self {
        match result {
            Ok(v) => Outcome::Found(v),
            Err(e) if e.is_already_deleted() || e.is_not_found() => Outcome::Gone,
            Err(e) => Outcome::Error(e),
        }
    }
}

/// Deletes treat the not-found sentinel as success
pub fn ignore_not_found(result: Result<(), ApiError>) -> Result<(), ApiError> {
    match result {
        Err(e) if e.is_not_found() => {
            tracing::debug!("Ignoring not found response on delete: {}", e);
            Ok(())
        }
        other => other,
    }
}
