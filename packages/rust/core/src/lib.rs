//! Sync orchestration for docsync.
//!
//! This crate ties the remote lister/fetcher, the local store, and the
//! navigation merger into one end-to-end run (see [`pipeline::sync_docs`]).

pub mod pipeline;

pub use docsync_nav::NavUpdate;
pub use pipeline::{
    FileOutcome, FileResult, ProgressReporter, SilentProgress, SkipReason, SyncOutcome,
    SyncSummary, Syncer, sync_docs,
};
