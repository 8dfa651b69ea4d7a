//! The one error type shared by every docsync crate.
//!
//! Remote failures keep the URL that failed so the run summary can say which
//! request broke. The CLI wraps these in `color-eyre` reports.

use std::path::PathBuf;

/// Every failure a docsync library call can report.
#[derive(Debug, thiserror::Error)]
pub enum DocSyncError {
    /// `docsync.toml`, a setting derived from it, or the HTTP client built from it.
    #[error("config error: {message}")]
    Config { message: String },

    /// The request produced no usable response (connect, timeout, body read).
    #[error("request to {url} failed: {reason}")]
    Request { url: String, reason: String },

    /// The remote answered with a non-success status.
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// A directory listing or the site config is not in the expected format.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// The site config holds something docsync would damage by rewriting it.
    #[error("refusing to rewrite navigation: {message}")]
    Nav { message: String },

    /// A remote file name that would land outside the local docs folder.
    #[error("unsafe file name {name:?}")]
    UnsafeName { name: String },

    /// Local filesystem failure.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// `Result` with [`DocSyncError`] as the error.
pub type Result<T> = std::result::Result<T, DocSyncError>;

impl DocSyncError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// A request to `url` that failed before a status was available.
    pub fn request(url: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::Request {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    pub fn status(url: impl Into<String>, status: u16) -> Self {
        Self::Status {
            url: url.into(),
            status,
        }
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    pub fn nav(msg: impl Into<String>) -> Self {
        Self::Nav {
            message: msg.into(),
        }
    }

    /// Attach the path that was being read or written.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// The remote URL involved, for request and status failures.
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Request { url, .. } | Self::Status { url, .. } => Some(url),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_names_url_and_code() {
        let err = DocSyncError::status("https://api.example.com/repos/a/b/contents/docs", 403);
        assert_eq!(
            err.to_string(),
            "https://api.example.com/repos/a/b/contents/docs returned HTTP 403"
        );
        assert_eq!(err.url(), Some("https://api.example.com/repos/a/b/contents/docs"));
    }

    #[test]
    fn request_error_keeps_reason() {
        let err = DocSyncError::request("https://raw.example.com/a.md", "connection refused");
        assert!(err.to_string().contains("connection refused"));
        assert_eq!(err.url(), Some("https://raw.example.com/a.md"));
        assert_eq!(DocSyncError::nav("`nav` is not a list").url(), None);
    }

    #[test]
    fn io_error_keeps_path() {
        let err = DocSyncError::io(
            "docs/CuMind",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("docs/CuMind"));
        assert!(msg.contains("denied"));
    }
}
