use thiserror::Error;

use crate::api::ApiError;

#[derive(Debug, Error)]
pub enum ReconcileError {
    /// Local contract violation, raised before any remote mutation
    #[error("{0}")]
    Validation(String),

    #[error("{context}: {source}")]
    Remote {
        context: String,
        #[source]
        source: ApiError,
    },

    /// A remote object the operation depends on does not exist
    #[error("{0}")]
    NotFound(String),

    /// The remote returned data the provider cannot interpret
    #[error("{0}")]
    Unexpected(String),

    #[error("operation cancelled")]
    Cancelled,
}

impl ReconcileError {
    pub fn validation(message: impl Into<String>) -> Self {
        ReconcileError::Validation(message.into())
    }

    /// Wrap an API failure with the operation and target it belongs to,
    /// for use with `map_err`
    pub fn remote(context: impl Into<String>) -> impl FnOnce(ApiError) -> Self {
        let context = context.into();
        move |source| ReconcileError::Remote { context, source }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ReconcileError::Validation(_))
    }
}
