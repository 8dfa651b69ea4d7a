//! Raw content download for listed documents.

use reqwest::Client;
use tracing::{debug, instrument};

use docsync_shared::{DocSyncError, RemoteFileRef, Result};

/// Downloads the raw text of a remote document.
#[derive(Debug, Clone)]
pub struct ContentFetcher {
    client: Client,
}

impl ContentFetcher {
    /// Wrap the shared client; its default headers carry the token, if any.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Fetch `file.download_url`.
    ///
    /// The caller decides whether a failure skips the file or aborts.
    #[instrument(skip_all, fields(name = %file.name))]
    pub async fn fetch(&self, file: &RemoteFileRef) -> Result<String> {
        let url = &file.download_url;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DocSyncError::request(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DocSyncError::status(url, status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| DocSyncError::request(url, format!("failed to read body: {e}")))?;

        debug!(bytes = body.len(), "downloaded");
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build_client;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn file_at(server: &MockServer, name: &str) -> RemoteFileRef {
        RemoteFileRef {
            name: name.into(),
            download_url: format!("{}/raw/{name}", server.uri()),
        }
    }

    #[tokio::test]
    async fn fetches_raw_text() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/raw/intro.md"))
            .respond_with(ResponseTemplate::new(200).set_body_string("# Intro\n\nHello.\n"))
            .mount(&server)
            .await;

        let fetcher = ContentFetcher::new(build_client(None, 5).unwrap());
        let body = fetcher.fetch(&file_at(&server, "intro.md")).await.unwrap();
        assert_eq!(body, "# Intro\n\nHello.\n");
    }

    #[tokio::test]
    async fn download_sends_token_header() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/raw/intro.md"))
            .and(header("authorization", "token s3cret"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = ContentFetcher::new(build_client(Some("s3cret"), 5).unwrap());
        assert!(fetcher.fetch(&file_at(&server, "intro.md")).await.is_ok());
    }

    #[tokio::test]
    async fn server_error_reports_status() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let fetcher = ContentFetcher::new(build_client(None, 5).unwrap());
        let file = file_at(&server, "broken.md");
        let err = fetcher.fetch(&file).await.unwrap_err();
        assert!(matches!(err, DocSyncError::Status { status: 500, .. }));
        assert_eq!(err.url(), Some(file.download_url.as_str()));
    }
}
