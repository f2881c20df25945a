//! # Authentication Module
//!
//! Authenticated request gateway and OTP session flows for the storefront API.
//!
//! ## Overview
//!
//! This module owns the session credential pair and every authenticated HTTP
//! request. The [`ApiGateway`] stamps requests with the stored access token,
//! coordinates a single shared refresh when the backend answers 401, and
//! notifies the host once when a session ends for good. [`AuthSession`]
//! layers the email OTP sign-in flows on top.
//!
//! ## Features
//!
//! - Bearer credential attachment from secure storage on every request
//! - De-duplicated, 401-driven token refresh (at most one in flight)
//! - One retry per rejected request; the refresh endpoint itself is exempt
//! - Single-slot session-ended callback for the host app
//! - Email OTP sign-in, signup completion, session restore, and logout

pub mod credential_store;
pub mod error;
pub mod gateway;
pub mod session;
pub mod types;

pub use credential_store::{CredentialStore, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};
pub use error::{AuthError, Result};
pub use gateway::{response_error_message, ApiGateway, REFRESH_ENDPOINT};
pub use session::AuthSession;
pub use types::{AuthTokens, LoginOutcome, User};
