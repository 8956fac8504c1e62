use thiserror::Error;

/// Canonical error type shared by the storage gateway and the API.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No document matched the requested identifier.
    #[error("{entity} `{id}` was not found")]
    NotFound {
        /// Entity type name (e.g. `"college"`).
        entity: &'static str,
        /// Identifier of the missing entity.
        id: String,
    },

    /// Identifier is not a valid ObjectId.
    #[error("invalid identifier `{id}`: {reason}")]
    InvalidId {
        /// Identifier as supplied by the caller.
        id: String,
        /// Parser message.
        reason: String,
    },

    /// The underlying document store failed or rejected the operation.
    #[error("storage error: {0}")]
    Storage(String),

    /// Conversion between JSON and BSON failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(String),

    /// Unexpected internal error occurred.
    #[error("internal error: {message}")]
    Internal {
        /// Human-readable details for debugging purposes.
        message: String,
    },
}

impl CoreError {
    /// Creates a `NotFound` variant.
    #[must_use]
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Creates an `InvalidId` variant.
    #[must_use]
    pub fn invalid_id(id: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidId {
            id: id.into(),
            reason: reason.to_string(),
        }
    }

    /// Creates an `Internal` variant.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns true when the error means "no such document".
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<bson::ser::Error> for CoreError {
    fn from(err: bson::ser::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<config::ConfigError> for CoreError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

/// Convenient result alias for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
