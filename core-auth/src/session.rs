//! # OTP Session Management
//!
//! High-level sign-in flows for the storefront's email OTP scheme.
//!
//! ## Flow
//!
//! 1. [`AuthSession::request_otp`] asks the backend to email a one-time code.
//! 2. [`AuthSession::verify_otp`] exchanges the code. Known addresses get a
//!    credential pair immediately; new ones are asked to finish signup.
//! 3. [`AuthSession::complete_signup`] creates the account with a username
//!    and stores the issued credentials.
//!
//! All authenticated traffic goes through the [`ApiGateway`], so an expired
//! access token is refreshed transparently.
//!
//! ## Usage
//!
//! ```no_run
//! use core_auth::{ApiGateway, AuthSession, LoginOutcome};
//! use std::sync::Arc;
//! # async fn example(gateway: Arc<ApiGateway>) -> core_auth::Result<()> {
//! let session = AuthSession::new(gateway);
//!
//! session.request_otp("user@example.com").await?;
//!
//! match session.verify_otp("user@example.com", "123456").await? {
//!     LoginOutcome::LoggedIn(user) => println!("hello {}", user.username),
//!     LoginOutcome::SignupRequired => { /* collect a username */ }
//! }
//! # Ok(())
//! # }
//! ```

use crate::error::{AuthError, Result};
use crate::gateway::{response_error_message, ApiGateway};
use crate::types::{AuthTokens, LoginOutcome, User};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

const REQUEST_OTP_ENDPOINT: &str = "users/auth/request-otp/";
const VERIFY_OTP_ENDPOINT: &str = "users/auth/verify-otp/";
const COMPLETE_SIGNUP_ENDPOINT: &str = "users/auth/complete-signup/";
const ME_ENDPOINT: &str = "users/auth/me/";

#[derive(Serialize)]
struct RequestOtpBody<'a> {
    email: &'a str,
}

#[derive(Serialize)]
struct VerifyOtpBody<'a> {
    email: &'a str,
    code: &'a str,
}

#[derive(Serialize)]
struct CompleteSignupBody<'a> {
    email: &'a str,
    code: &'a str,
    username: &'a str,
}

/// Verification either issues credentials or asks for signup completion.
#[derive(Deserialize)]
#[serde(untagged)]
enum VerifyOtpResponse {
    LoggedIn {
        access: String,
        refresh: String,
        user: User,
    },
    Next {
        next: String,
    },
}

#[derive(Deserialize)]
struct SignupResponse {
    access: String,
    refresh: String,
}

/// Orchestrates the OTP sign-in flows over the authenticated gateway.
///
/// Stateless apart from the gateway it owns a handle to; the stored
/// credential pair is the session.
#[derive(Clone)]
pub struct AuthSession {
    gateway: Arc<ApiGateway>,
}

impl AuthSession {
    /// Create a session layer over the gateway.
    pub fn new(gateway: Arc<ApiGateway>) -> Self {
        Self { gateway }
    }

    /// Ask the backend to email a one-time code to `email`.
    #[instrument(skip_all)]
    pub async fn request_otp(&self, email: &str) -> Result<()> {
        info!("Requesting OTP code");

        let response = self
            .gateway
            .post_json(REQUEST_OTP_ENDPOINT, &RequestOtpBody { email })
            .await?;

        if !response.is_success() {
            return Err(api_error(&response));
        }

        Ok(())
    }

    /// Exchange an emailed code for credentials.
    ///
    /// On success for a known account the credential pair is stored and the
    /// user is returned; a new account gets [`LoginOutcome::SignupRequired`]
    /// and must call [`Self::complete_signup`].
    #[instrument(skip_all)]
    pub async fn verify_otp(&self, email: &str, code: &str) -> Result<LoginOutcome> {
        let response = self
            .gateway
            .post_json(VERIFY_OTP_ENDPOINT, &VerifyOtpBody { email, code })
            .await?;

        if !response.is_success() {
            return Err(api_error(&response));
        }

        let body: VerifyOtpResponse = response
            .json()
            .map_err(|e| AuthError::Serialization(e.to_string()))?;

        match body {
            VerifyOtpResponse::LoggedIn {
                access,
                refresh,
                user,
            } => {
                let tokens = AuthTokens::new(access, Some(refresh));
                self.gateway.credentials().store_tokens(&tokens).await?;
                info!(username = %user.username, "OTP verified, session established");
                Ok(LoginOutcome::LoggedIn(user))
            }
            VerifyOtpResponse::Next { next } => {
                debug!(next = %next, "OTP verified, signup not finished");
                Ok(LoginOutcome::SignupRequired)
            }
        }
    }

    /// Finish signup for a new account with the chosen username.
    ///
    /// Requires the same email and OTP code that passed verification.
    /// Stores the issued credentials and returns the created user.
    #[instrument(skip_all)]
    pub async fn complete_signup(&self, email: &str, code: &str, username: &str) -> Result<User> {
        let response = self
            .gateway
            .post_json(
                COMPLETE_SIGNUP_ENDPOINT,
                &CompleteSignupBody {
                    email,
                    code,
                    username,
                },
            )
            .await?;

        if !response.is_success() {
            return Err(api_error(&response));
        }

        let body: SignupResponse = response
            .json()
            .map_err(|e| AuthError::Serialization(e.to_string()))?;

        let tokens = AuthTokens::new(body.access, Some(body.refresh));
        self.gateway.credentials().store_tokens(&tokens).await?;

        let user = self.current_user().await?;
        info!(username = %user.username, "Signup completed, session established");

        Ok(user)
    }

    /// Fetch the authenticated user's profile.
    pub async fn current_user(&self) -> Result<User> {
        let response = self.gateway.get(ME_ENDPOINT).await?;

        if response.status == 401 {
            return Err(AuthError::NotAuthenticated);
        }
        if !response.is_success() {
            return Err(api_error(&response));
        }

        response
            .json()
            .map_err(|e| AuthError::Serialization(e.to_string()))
    }

    /// Restore a persisted session at startup.
    ///
    /// Returns `Ok(None)` when no credentials are stored or the stored
    /// session is no longer accepted by the backend; transport failures
    /// propagate so the caller can retry.
    #[instrument(skip_all)]
    pub async fn restore_session(&self) -> Result<Option<User>> {
        if self.gateway.credentials().access_token().await?.is_none() {
            debug!("No stored credentials, nothing to restore");
            return Ok(None);
        }

        match self.current_user().await {
            Ok(user) => {
                info!(username = %user.username, "Session restored");
                Ok(Some(user))
            }
            Err(
                AuthError::NotAuthenticated
                | AuthError::MissingRefreshToken
                | AuthError::RefreshFailed { .. },
            ) => {
                warn!("Stored session rejected by backend");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Drop the local session.
    ///
    /// Clears both credentials from secure storage; the backend holds no
    /// server-side session to end.
    #[instrument(skip_all)]
    pub async fn logout(&self) -> Result<()> {
        self.gateway.credentials().clear().await?;
        info!("Signed out");
        Ok(())
    }
}

fn api_error(response: &bridge_traits::HttpResponse) -> AuthError {
    AuthError::Api {
        status: response.status,
        message: response_error_message(response),
    }
}
