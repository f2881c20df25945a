//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the storefront core:
//! - Logging and tracing infrastructure
//! - Configuration management
//!
//! ## Overview
//!
//! This crate contains the runtime utilities that other modules depend on.
//! It establishes the logging conventions and the configuration entry point
//! used throughout the system.

pub mod config;
pub mod error;
pub mod logging;

pub use config::{StorefrontConfig, StorefrontConfigBuilder};
pub use error::{Error, Result};
pub use logging::{init_logging, LogFormat, LogLevel, LoggingConfig};
