//! End-to-end sync: reset store → list remote → fetch + write → rebuild nav.
//!
//! Expected failures (listing errors, individual download errors, empty
//! results) never abort the run. They come back as values in the
//! [`SyncSummary`]. Local filesystem and config-file failures do propagate.

use std::collections::HashSet;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use reqwest::Client;
use tracing::{info, instrument, warn};

use docsync_nav::{NavUpdate, NavigationMerger};
use docsync_remote::{ContentFetcher, RemoteLister, client_for};
use docsync_shared::{Result, SyncConfig};
use docsync_store::{LocalStore, is_safe_filename};

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// How the run as a whole ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Files were processed and the navigation step ran.
    Completed,
    /// The remote folder held no documents; navigation was not touched.
    NothingToSync,
    /// The remote folder could not be listed; navigation was not touched.
    ListingFailed {
        /// Logged error text.
        reason: String,
    },
}

/// Why a listed file was not written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The download failed; carries the error text.
    DownloadFailed(String),
    /// The download succeeded but the body was empty.
    EmptyBody,
    /// Another listed file already had this name.
    Duplicate,
    /// The name would resolve outside the local store.
    UnsafeName,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DownloadFailed(e) => write!(f, "download failed: {e}"),
            Self::EmptyBody => f.write_str("downloaded file is empty"),
            Self::Duplicate => f.write_str("duplicate file name in listing"),
            Self::UnsafeName => f.write_str("unsafe file name"),
        }
    }
}

/// Per-file result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Written to the local store.
    Saved {
        /// Where the file landed.
        path: PathBuf,
    },
    /// Not written; the run continued.
    Skipped {
        /// Why.
        reason: SkipReason,
    },
}

/// One listed remote file and what happened to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileResult {
    /// Remote file name.
    pub name: String,
    /// What happened to it.
    pub outcome: FileOutcome,
}

/// Everything a run did, in the order it did it.
#[derive(Debug, Clone)]
pub struct SyncSummary {
    /// How the run ended.
    pub outcome: SyncOutcome,
    /// One result per listed document, in listing order.
    pub files: Vec<FileResult>,
    /// What happened to the navigation document.
    pub nav: NavUpdate,
    /// Total elapsed time.
    pub elapsed: Duration,
}

impl SyncSummary {
    /// Number of files written to the local store.
    pub fn saved(&self) -> usize {
        self.files
            .iter()
            .filter(|f| matches!(f.outcome, FileOutcome::Saved { .. }))
            .count()
    }

    /// Files that were listed but not written.
    pub fn skipped(&self) -> impl Iterator<Item = (&str, &SkipReason)> {
        self.files.iter().filter_map(|f| match &f.outcome {
            FileOutcome::Skipped { reason } => Some((f.name.as_str(), reason)),
            FileOutcome::Saved { .. } => None,
        })
    }
}

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

/// Progress callback for human-readable status notices.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called after each file is written.
    fn file_saved(&self, name: &str, current: usize, total: usize);
    /// Called when a listed file is skipped.
    fn file_skipped(&self, name: &str, reason: &SkipReason);
    /// Called when the run completes.
    fn done(&self, summary: &SyncSummary);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn file_saved(&self, _name: &str, _current: usize, _total: usize) {}
    fn file_skipped(&self, _name: &str, _reason: &SkipReason) {}
    fn done(&self, _summary: &SyncSummary) {}
}

// ---------------------------------------------------------------------------
// Syncer
// ---------------------------------------------------------------------------

/// The wired-up components of one sync.
pub struct Syncer {
    store: LocalStore,
    lister: RemoteLister,
    fetcher: ContentFetcher,
    merger: NavigationMerger,
    repo: String,
}

impl Syncer {
    /// Wire components from `config`, resolving the token from its env var.
    pub fn new(config: &SyncConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_client(config, client_for(config)?))
    }

    /// Wire components around an already-built HTTP client.
    pub fn with_client(config: &SyncConfig, client: Client) -> Self {
        Self {
            store: LocalStore::new(&config.local_dir, &config.extension),
            lister: RemoteLister::new(client.clone(), config),
            fetcher: ContentFetcher::new(client),
            merger: NavigationMerger::new(config),
            repo: config.repo.clone(),
        }
    }

    /// Run the whole sync.
    ///
    /// 1. Wipe and recreate the local store
    /// 2. List the remote docs folder (stop early if empty or failed)
    /// 3. Fetch and write each file, skipping failures
    /// 4. Rebuild the owned navigation section and persist it
    #[instrument(skip_all, fields(repo = %self.repo))]
    pub async fn run(&self, progress: &dyn ProgressReporter) -> Result<SyncSummary> {
        let start = Instant::now();
        info!("starting documentation sync");

        // --- Phase 1: Local store ---
        progress.phase("Resetting local docs");
        self.store.reset()?;

        // --- Phase 2: Listing ---
        progress.phase("Listing remote docs");
        let listed = match self.lister.list().await {
            Ok(files) => files,
            Err(e) => {
                warn!(error = %e, "error fetching docs list");
                let summary = finish(
                    SyncOutcome::ListingFailed {
                        reason: e.to_string(),
                    },
                    Vec::new(),
                    NavUpdate::Unchanged,
                    start,
                );
                progress.done(&summary);
                return Ok(summary);
            }
        };

        if listed.is_empty() {
            info!("no documentation files found in remote folder");
            let summary = finish(
                SyncOutcome::NothingToSync,
                Vec::new(),
                NavUpdate::Unchanged,
                start,
            );
            progress.done(&summary);
            return Ok(summary);
        }

        info!(count = listed.len(), "found files to sync");

        // --- Phase 3: Fetch + write ---
        let total = listed.len();
        let mut files = Vec::with_capacity(total);
        let mut seen = HashSet::new();
        let mut saved = 0usize;

        for (i, file) in listed.iter().enumerate() {
            progress.phase(&format!("Fetching [{}/{total}] {}", i + 1, file.name));

            let skip = if !is_safe_filename(&file.name) {
                Some(SkipReason::UnsafeName)
            } else if !seen.insert(file.name.as_str()) {
                Some(SkipReason::Duplicate)
            } else {
                None
            };

            let outcome = match skip {
                Some(reason) => FileOutcome::Skipped { reason },
                None => match self.fetcher.fetch(file).await {
                    Ok(content) if content.is_empty() => FileOutcome::Skipped {
                        reason: SkipReason::EmptyBody,
                    },
                    Ok(content) => {
                        let path = self.store.write(&file.name, &content)?;
                        saved += 1;
                        progress.file_saved(&file.name, saved, total);
                        FileOutcome::Saved { path }
                    }
                    Err(e) => FileOutcome::Skipped {
                        reason: SkipReason::DownloadFailed(e.to_string()),
                    },
                },
            };

            if let FileOutcome::Skipped { reason } = &outcome {
                warn!(name = %file.name, %reason, "skipping file");
                progress.file_skipped(&file.name, reason);
            }

            files.push(FileResult {
                name: file.name.clone(),
                outcome,
            });
        }

        // --- Phase 4: Navigation ---
        progress.phase("Updating navigation");
        let nav = self.merger.recompute(&self.store)?;

        let summary = finish(SyncOutcome::Completed, files, nav, start);
        info!(
            saved = summary.saved(),
            skipped = summary.files.len() - summary.saved(),
            nav = ?summary.nav,
            elapsed_ms = summary.elapsed.as_millis() as u64,
            "documentation sync completed"
        );
        progress.done(&summary);
        Ok(summary)
    }
}

fn finish(
    outcome: SyncOutcome,
    files: Vec<FileResult>,
    nav: NavUpdate,
    start: Instant,
) -> SyncSummary {
    SyncSummary {
        outcome,
        files,
        nav,
        elapsed: start.elapsed(),
    }
}

/// Run one sync with components built from `config`.
pub async fn sync_docs(
    config: &SyncConfig,
    progress: &dyn ProgressReporter,
) -> Result<SyncSummary> {
    Syncer::new(config)?.run(progress).await
}
