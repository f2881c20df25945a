use serde::{Deserialize, Serialize};
use std::fmt;

/// A matched pair of session credentials.
///
/// The access token authorizes individual API requests; the refresh token is
/// only ever sent to the refresh endpoint to obtain a new access token after
/// the server rejects one with 401.
///
/// # Examples
///
/// ```
/// use core_auth::AuthTokens;
///
/// let tokens = AuthTokens::new("access".to_string(), Some("refresh".to_string()));
/// assert_eq!(tokens.access_token(), "access");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct AuthTokens {
    access_token: String,
    refresh_token: Option<String>,
}

impl AuthTokens {
    /// Create a new credential pair
    pub fn new(access_token: String, refresh_token: Option<String>) -> Self {
        Self {
            access_token,
            refresh_token,
        }
    }

    /// Get the access token
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Get the refresh token, if one is held
    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }
}

impl fmt::Debug for AuthTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthTokens")
            .field("access_token", &"[REDACTED]")
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

/// An authenticated storefront user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub username: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub mobile: Option<String>,
}

/// Outcome of an OTP verification attempt.
///
/// The backend either signs the user in directly or, for addresses it has
/// never seen, asks the client to collect a username and finish signup.
#[derive(Debug, Clone, PartialEq)]
pub enum LoginOutcome {
    /// Credentials were issued and stored; the session is live.
    LoggedIn(User),
    /// The email is new; call `complete_signup` with a username next.
    SignupRequired,
}
