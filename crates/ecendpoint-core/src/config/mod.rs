//! Profile configuration for ecendpoint
//!
// Allow nested config module - this is intentional for the config subsystem

#![allow(clippy::module_inception)]
//!
//! Named profiles stored in TOML describe how to reach ElastiCache: region,
//! endpoint override, and the ordered credential sources. A profile is turned
//! into a [`ClientConfig`](crate::ClientConfig) with [`Profile::to_client_config`].
//!
//! # Features
//!
//! - Multiple named profiles with a default
//! - Secret material in the OS keyring (optional `secure-storage` feature)
//! - Environment variable expansion in config files
//! - Platform-specific config file locations

pub mod config;
pub mod credential;
pub mod error;

// Re-export main types for convenience
pub use config::{Config, Profile};
pub use credential::{CredentialStorage, CredentialStore};
pub use error::{ConfigError, Result};
