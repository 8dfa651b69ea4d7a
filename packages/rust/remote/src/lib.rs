//! Remote side of the sync: listing the docs folder through the hosting
//! provider's contents API and downloading each document's raw text.
//!
//! Both halves share one [`reqwest::Client`] built by [`build_client`], which
//! carries the `User-Agent`, the timeout, and the optional token header so
//! every request is authenticated the same way.

mod fetcher;
mod lister;

use std::time::Duration;

use reqwest::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};

use docsync_shared::{DocSyncError, Result, SyncConfig};

pub use fetcher::ContentFetcher;
pub use lister::{RemoteLister, filter_docs};

/// User-Agent string for API and download requests.
const USER_AGENT: &str = concat!("docsync/", env!("CARGO_PKG_VERSION"));

/// Build the HTTP client shared by the lister and the fetcher.
///
/// When `token` is present it is sent as `Authorization: token <value>` on
/// every request; without it access is anonymous (and rate-limited).
pub fn build_client(token: Option<&str>, timeout_secs: u64) -> Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));

    if let Some(token) = token {
        let mut value = HeaderValue::from_str(&format!("token {token}"))
            .map_err(|_| DocSyncError::config("access token contains invalid header characters"))?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }

    Client::builder()
        .user_agent(USER_AGENT)
        .default_headers(headers)
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| DocSyncError::config(format!("failed to build HTTP client: {e}")))
}

/// Build the client straight from a [`SyncConfig`], resolving the token env var.
pub fn client_for(config: &SyncConfig) -> Result<Client> {
    let token = config.resolve_token();
    tracing::debug!(authenticated = token.is_some(), "building HTTP client");
    build_client(token.as_deref(), config.timeout_secs)
}
