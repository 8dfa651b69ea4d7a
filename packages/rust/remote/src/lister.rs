//! Directory listing via the contents API.

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, instrument};
use url::Url;

use docsync_shared::{DocSyncError, RemoteFileRef, Result, SyncConfig};

/// One element of the contents API's directory listing.
///
/// Directories and submodules come back with `download_url: null`.
#[derive(Debug, Deserialize)]
struct ContentsEntry {
    name: String,
    #[serde(default)]
    download_url: Option<String>,
}

/// Lists the document files in one folder of a remote repository.
#[derive(Debug, Clone)]
pub struct RemoteLister {
    client: Client,
    api_base: String,
    repo: String,
    branch: String,
    remote_path: String,
    extension: String,
}

impl RemoteLister {
    /// Create a lister for the repository, branch, and folder named in `config`.
    pub fn new(client: Client, config: &SyncConfig) -> Self {
        Self {
            client,
            api_base: config.api_base.clone(),
            repo: config.repo.clone(),
            branch: config.branch.clone(),
            remote_path: config.remote_path.clone(),
            extension: config.extension.clone(),
        }
    }

    /// `{api_base}/repos/{owner/repo}/contents/{path}?ref={branch}`
    pub fn contents_url(&self) -> Result<Url> {
        let raw = format!(
            "{}/repos/{}/contents/{}",
            self.api_base.trim_end_matches('/'),
            self.repo,
            self.remote_path.trim_matches('/'),
        );
        let mut url = Url::parse(&raw)
            .map_err(|e| DocSyncError::config(format!("invalid contents URL '{raw}': {e}")))?;
        url.query_pairs_mut().append_pair("ref", &self.branch);
        Ok(url)
    }

    /// List the remote document files.
    ///
    /// Failures are returned, not absorbed: the pipeline turns them into an
    /// empty run with the reason recorded in its summary.
    #[instrument(skip_all, fields(repo = %self.repo, branch = %self.branch, path = %self.remote_path))]
    pub async fn list(&self) -> Result<Vec<RemoteFileRef>> {
        let url = self.contents_url()?;
        debug!(%url, "listing remote docs");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| DocSyncError::request(url.as_str(), e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DocSyncError::status(url.as_str(), status.as_u16()));
        }

        let entries: Vec<ContentsEntry> = response.json().await.map_err(|e| {
            DocSyncError::parse(format!("{url}: expected a directory listing: {e}"))
        })?;

        let total = entries.len();
        let docs = filter_docs(
            entries.into_iter().map(|e| (e.name, e.download_url)),
            &self.extension,
        );

        info!(total, docs = docs.len(), "remote listing received");
        Ok(docs)
    }
}

/// Keep `(name, download_url)` pairs that name a document and can be downloaded.
pub fn filter_docs<I>(entries: I, extension: &str) -> Vec<RemoteFileRef>
where
    I: IntoIterator<Item = (String, Option<String>)>,
{
    entries
        .into_iter()
        .filter_map(|(name, download_url)| {
            if !name.ends_with(extension) {
                return None;
            }
            match download_url {
                Some(download_url) => Some(RemoteFileRef { name, download_url }),
                None => {
                    debug!(%name, "no download URL (directory?), ignoring");
                    None
                }
            }
        })
        .collect()
}
