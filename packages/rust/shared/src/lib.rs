//! Shared types, error model, and configuration for docsync.
//!
//! This crate is the foundation depended on by all other docsync crates.
//! It provides:
//! - [`DocSyncError`] — the unified error type
//! - Domain types ([`RemoteFileRef`]) and the [`derive_title`] rule
//! - Configuration ([`SyncConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{CONFIG_FILE_NAME, SyncConfig, load_config, load_config_from};
pub use error::{DocSyncError, Result};
pub use types::{RemoteFileRef, derive_title};
