//! LibreTranslate Client - Async Rust client for LibreTranslate servers
//!
//! This library covers the public operations of the LibreTranslate HTTP
//! API (languages, frontend settings, translation) on top of a retrying
//! request core with cooperative cancellation.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

pub mod client;
pub mod config;
pub mod errors;
pub mod models;
pub mod request;
pub mod retry;

// Re-export key types for convenience
pub use client::LibreTranslate;
pub use config::ClientConfig;
pub use errors::{Error, Result};
pub use models::{Format, FrontendSetting, FrontendSettingLanguage, Language, TranslatedText};
pub use request::RequestExecutor;
pub use retry::RetryPolicy;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
