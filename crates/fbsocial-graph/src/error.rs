//! Error types for the Graph client

use serde::Serialize;
use thiserror::Error;

/// A failure reported by the Graph API, reduced to a fixed set of categories.
///
/// The `Display` output is the message the API sent, so callers can show it
/// as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiFailure {
    /// The operation needs a permission the token was not granted
    #[error("{message}")]
    InsufficientPermission {
        message: String,
        /// Permission named by the API, when the message names one
        required_permission: Option<String>,
    },

    /// The target user must be a friend of the current user
    #[error("{message}")]
    NotAFriend { message: String },

    /// Unknown path, alias or object
    #[error("{message}")]
    ResourceNotFound { message: String },

    /// The current user does not own the resource
    #[error("{message}")]
    ResourceOwnership { message: String },

    /// The resource needs a token and none was supplied
    #[error("{message}")]
    MissingAuthorization { message: String },

    /// The token outlived its expiry
    #[error("{message}")]
    ExpiredAuthorization { message: String },

    /// The token was invalidated by a password change, app removal or sign-out
    #[error("{message}")]
    RevokedAuthorization { message: String },

    /// The token was rejected for any other reason
    #[error("{message}")]
    InvalidAuthorization { message: String },

    /// Anything the table above does not cover
    #[error("{message}")]
    Uncategorized {
        message: String,
        status: u16,
        body: String,
    },
}

/// Category of an [`ApiFailure`], without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureCategory {
    InsufficientPermission,
    NotAFriend,
    ResourceNotFound,
    ResourceOwnership,
    MissingAuthorization,
    ExpiredAuthorization,
    RevokedAuthorization,
    InvalidAuthorization,
    Uncategorized,
}

impl ApiFailure {
    pub fn category(&self) -> FailureCategory {
        match self {
            ApiFailure::InsufficientPermission { .. } => FailureCategory::InsufficientPermission,
            ApiFailure::NotAFriend { .. } => FailureCategory::NotAFriend,
            ApiFailure::ResourceNotFound { .. } => FailureCategory::ResourceNotFound,
            ApiFailure::ResourceOwnership { .. } => FailureCategory::ResourceOwnership,
            ApiFailure::MissingAuthorization { .. } => FailureCategory::MissingAuthorization,
            ApiFailure::ExpiredAuthorization { .. } => FailureCategory::ExpiredAuthorization,
            ApiFailure::RevokedAuthorization { .. } => FailureCategory::RevokedAuthorization,
            ApiFailure::InvalidAuthorization { .. } => FailureCategory::InvalidAuthorization,
            ApiFailure::Uncategorized { .. } => FailureCategory::Uncategorized,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiFailure::InsufficientPermission { message, .. }
            | ApiFailure::NotAFriend { message }
            | ApiFailure::ResourceNotFound { message }
            | ApiFailure::ResourceOwnership { message }
            | ApiFailure::MissingAuthorization { message }
            | ApiFailure::ExpiredAuthorization { message }
            | ApiFailure::RevokedAuthorization { message }
            | ApiFailure::InvalidAuthorization { message }
            | ApiFailure::Uncategorized { message, .. } => message,
        }
    }

    pub fn required_permission(&self) -> Option<&str> {
        match self {
            ApiFailure::InsufficientPermission {
                required_permission,
                ..
            } => required_permission.as_deref(),
            _ => None,
        }
    }

    /// True when the user has to sign in again before retrying
    pub fn requires_reauthorization(&self) -> bool {
        matches!(
            self.category(),
            FailureCategory::MissingAuthorization
                | FailureCategory::ExpiredAuthorization
                | FailureCategory::RevokedAuthorization
                | FailureCategory::InvalidAuthorization
        )
    }
}

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Graph API error: {0}")]
    Api(#[from] ApiFailure),

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl GraphError {
    /// Category of the API failure, if this error is one
    pub fn category(&self) -> Option<FailureCategory> {
        match self {
            GraphError::Api(failure) => Some(failure.category()),
            _ => None,
        }
    }
}

pub type GraphResult<T> = Result<T, GraphError>;
