//! Sync configuration for docsync.
//!
//! Settings live in an optional `docsync.toml` next to the site's
//! `mkdocs.yml`. Missing keys fall back to per-field defaults, and a missing
//! file means "all defaults".

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DocSyncError, Result};

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "docsync.toml";

// ---------------------------------------------------------------------------
// SyncConfig (matching docsync.toml schema)
// ---------------------------------------------------------------------------

/// Everything one sync run needs to know, passed explicitly to the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SyncConfig {
    /// Remote repository as `owner/name`.
    #[serde(default = "default_repo")]
    pub repo: String,

    /// Branch (or any ref) to read the docs from.
    #[serde(default = "default_branch")]
    pub branch: String,

    /// Docs folder inside the remote repository.
    #[serde(default = "default_remote_path")]
    pub remote_path: String,

    /// Local destination directory, wiped and refilled on every run.
    #[serde(default = "default_local_dir")]
    pub local_dir: PathBuf,

    /// Site generator config file whose `nav` gets rewritten.
    #[serde(default = "default_nav_config")]
    pub nav_config: PathBuf,

    /// Name of the navigation section owned by docsync.
    #[serde(default = "default_section")]
    pub section: String,

    /// Base URL of the hosting provider's REST API.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Document file extension, including the leading dot.
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Name of the env var holding the access token (never store the token itself).
    #[serde(default = "default_token_env")]
    pub token_env: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            repo: default_repo(),
            branch: default_branch(),
            remote_path: default_remote_path(),
            local_dir: default_local_dir(),
            nav_config: default_nav_config(),
            section: default_section(),
            api_base: default_api_base(),
            extension: default_extension(),
            token_env: default_token_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_repo() -> String {
    "carletonai/CuMind".into()
}
fn default_branch() -> String {
    "dev".into()
}
fn default_remote_path() -> String {
    "docs".into()
}
fn default_local_dir() -> PathBuf {
    PathBuf::from("docs/CuMind")
}
fn default_nav_config() -> PathBuf {
    PathBuf::from("mkdocs.yml")
}
fn default_section() -> String {
    "CuMind".into()
}
fn default_api_base() -> String {
    "https://api.github.com".into()
}
fn default_extension() -> String {
    ".md".into()
}
fn default_token_env() -> String {
    "GITHUB_TOKEN".into()
}
fn default_timeout_secs() -> u64 {
    30
}

impl SyncConfig {
    /// Check the values that would otherwise fail late (mid-run) or silently.
    pub fn validate(&self) -> Result<()> {
        let mut parts = self.repo.split('/');
        let well_formed = matches!(
            (parts.next(), parts.next(), parts.next()),
            (Some(owner), Some(name), None) if !owner.is_empty() && !name.is_empty()
        );
        if !well_formed {
            return Err(DocSyncError::config(format!(
                "repo must look like `owner/name`, got `{}`",
                self.repo
            )));
        }

        if self.section.trim().is_empty() {
            return Err(DocSyncError::config("section name must not be empty"));
        }

        if !self.extension.starts_with('.') || self.extension.len() < 2 {
            return Err(DocSyncError::config(format!(
                "extension must start with a dot, got `{}`",
                self.extension
            )));
        }

        Ok(())
    }

    /// Read the access token from the configured env var.
    ///
    /// Unset and empty both mean unauthenticated access.
    pub fn resolve_token(&self) -> Option<String> {
        match std::env::var(&self.token_env) {
            Ok(val) if !val.trim().is_empty() => Some(val.trim().to_string()),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load `docsync.toml` from the working directory. Returns defaults if it does not exist.
pub fn load_config() -> Result<SyncConfig> {
    let path = Path::new(CONFIG_FILE_NAME);

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(SyncConfig::default());
    }

    load_config_from(path)
}

/// Load the sync config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<SyncConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| DocSyncError::io(path, e))?;

    let config: SyncConfig = toml::from_str(&content).map_err(|e| {
        DocSyncError::config(format!("failed to parse {}: {e}", path.display()))
    })?;
    config.validate()?;

    tracing::debug!(?path, repo = %config.repo, "loaded config");
    Ok(config)
}
