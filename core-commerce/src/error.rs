use bridge_traits::http::HttpResponse;
use core_auth::{response_error_message, AuthError};
use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CommerceError {
    /// Backend rejected the request with a non-success status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Response body did not match the expected shape.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Authentication layer failure (token refresh, secure storage).
    #[error(transparent)]
    Auth(#[from] AuthError),
}

pub type Result<T> = std::result::Result<T, CommerceError>;

/// Turns a response into an API error with the backend's message.
pub(crate) fn api_error(response: &HttpResponse) -> CommerceError {
    CommerceError::Api {
        status: response.status,
        message: response_error_message(response),
    }
}

/// Checks the status and deserializes the body, or surfaces the API error.
pub(crate) fn expect_json<T: DeserializeOwned>(response: HttpResponse) -> Result<T> {
    if !response.is_success() {
        return Err(api_error(&response));
    }
    response
        .json::<T>()
        .map_err(|e| CommerceError::Parse(e.to_string()))
}

/// Checks the status and discards the body.
pub(crate) fn expect_success(response: HttpResponse) -> Result<()> {
    if !response.is_success() {
        return Err(api_error(&response));
    }
    Ok(())
}
