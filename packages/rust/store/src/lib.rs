//! Local destination directory for synced documents.
//!
//! The store is wiped and refilled on every run; there is no diffing against
//! what a previous run left behind.

pub mod frontmatter;

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use docsync_shared::{DocSyncError, Result, derive_title};

/// Owns the local docs directory.
#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
    extension: String,
}

impl LocalStore {
    /// Create a store rooted at `root`, holding files ending in `extension`.
    ///
    /// Nothing touches the filesystem until [`reset`](Self::reset) or
    /// [`write`](Self::write) is called.
    pub fn new(root: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            extension: extension.into(),
        }
    }

    /// The directory this store owns.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Delete the directory (if present) and recreate it with any missing parents.
    #[instrument(skip_all, fields(root = %self.root.display()))]
    pub fn reset(&self) -> Result<()> {
        if self.root.exists() {
            debug!("removing existing directory");
            std::fs::remove_dir_all(&self.root).map_err(|e| DocSyncError::io(&self.root, e))?;
        }

        std::fs::create_dir_all(&self.root).map_err(|e| DocSyncError::io(&self.root, e))?;
        Ok(())
    }

    /// Write `content` to `filename`, adding a derived `title` block if it has none.
    ///
    /// Overwrites any existing file of the same name. Returns the written path.
    pub fn write(&self, filename: &str, content: &str) -> Result<PathBuf> {
        validate_filename(filename)?;

        let title = derive_title(filename, &self.extension);
        let content = frontmatter::with_title(content, &title);

        let path = self.root.join(filename);
        std::fs::write(&path, content.as_bytes()).map_err(|e| DocSyncError::io(&path, e))?;

        info!(%filename, "saved");
        Ok(path)
    }

    /// File names of the documents currently in the store, sorted ascending.
    ///
    /// A missing directory reads as empty.
    pub fn list_docs(&self) -> Result<Vec<String>> {
        let entries = match std::fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(DocSyncError::io(&self.root, e)),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| DocSyncError::io(&self.root, e))?;
            let file_type = entry
                .file_type()
                .map_err(|e| DocSyncError::io(entry.path(), e))?;
            if !file_type.is_file() {
                continue;
            }
            // Non-UTF-8 names can't have come from a sync.
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if name.ends_with(&self.extension) {
                names.push(name);
            }
        }

        names.sort();
        Ok(names)
    }
}

/// Whether `filename` names a plain file directly inside the store.
pub fn is_safe_filename(filename: &str) -> bool {
    !(filename.is_empty()
        || filename == "."
        || filename == ".."
        || filename.contains(['/', '\\'])
        || filename.contains('\0'))
}

fn validate_filename(filename: &str) -> Result<()> {
    if !is_safe_filename(filename) {
        return Err(DocSyncError::UnsafeName {
            name: filename.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> LocalStore {
        LocalStore::new(dir.path().join("docs").join("CuMind"), ".md")
    }

    #[test]
    fn reset_creates_missing_parents() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store.reset().unwrap();
        assert!(store.root().is_dir());

        // Idempotent.
        store.reset().unwrap();
        assert!(store.root().is_dir());
    }

    #[test]
    fn reset_wipes_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.reset().unwrap();
        store.write("old.md", "stale").unwrap();
        std::fs::create_dir(store.root().join("nested")).unwrap();

        store.reset().unwrap();
        assert!(store.list_docs().unwrap().is_empty());
        assert!(!store.root().join("nested").exists());
    }

    #[test]
    fn write_adds_front_matter() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.reset().unwrap();

        let path = store.write("getting_started.md", "# Hi\n").unwrap();
        let written = std::fs::read_to_string(path).unwrap();
        assert_eq!(written, "---\ntitle: Getting Started\n---\n\n# Hi\n");
    }

    #[test]
    fn write_preserves_existing_front_matter() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.reset().unwrap();

        let src = "---\ntitle: Hand Written\n---\n\nBody\n";
        let path = store.write("notes.md", src).unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), src);
    }

    #[test]
    fn write_overwrites_same_name() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.reset().unwrap();

        store.write("a.md", "first").unwrap();
        let path = store.write("a.md", "second").unwrap();
        assert!(std::fs::read_to_string(path).unwrap().ends_with("second"));
    }

    #[test]
    fn write_rejects_path_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.reset().unwrap();

        for name in ["../escape.md", "sub/dir.md", "..", ""] {
            let err = store.write(name, "x").unwrap_err();
            assert!(matches!(err, DocSyncError::UnsafeName { .. }), "{name:?}");
        }
    }

    #[test]
    fn list_docs_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.reset().unwrap();

        store.write("zeta.md", "z").unwrap();
        store.write("alpha.md", "a").unwrap();
        store.write("Beta.md", "b").unwrap();
        std::fs::write(store.root().join("image.png"), b"png").unwrap();
        std::fs::create_dir(store.root().join("folder.md")).unwrap();

        assert_eq!(
            store.list_docs().unwrap(),
            vec!["Beta.md", "alpha.md", "zeta.md"]
        );
    }

    #[test]
    fn list_docs_on_missing_dir_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        assert!(store.list_docs().unwrap().is_empty());
    }
}
