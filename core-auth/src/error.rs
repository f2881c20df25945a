use thiserror::Error;

/// Errors produced by the credential store, gateway, and session layer.
///
/// The enum is `Clone` because a single refresh operation can be awaited by
/// many concurrent requests; each waiter receives its own copy of the
/// settlement.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("No refresh token available; session has ended")]
    MissingRefreshToken,

    #[error("Token refresh failed with status {status}: {message}")]
    RefreshFailed { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Secure storage unavailable: {0}")]
    SecureStorageUnavailable(String),

    #[error("Serialization failed: {0}")]
    Serialization(String),

    #[error("API request failed with status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Not authenticated")]
    NotAuthenticated,
}

pub type Result<T> = std::result::Result<T, AuthError>;
