//! Navigation merge: rebuilds the one navigation section docsync owns from
//! whatever is currently in the local store.
//!
//! The section is always replaced wholesale, never merged entry by entry, so
//! repeated runs leave exactly one copy of it in the navigation tree.
//! Document access goes through [`NavDocument`]; [`MkDocsConfig`] is the
//! YAML-backed implementation.

mod mkdocs;
mod tags;

use std::collections::HashMap;
use std::path::PathBuf;

use tracing::{info, instrument, warn};

use docsync_shared::{Result, SyncConfig, derive_title};
use docsync_store::LocalStore;

pub use mkdocs::MkDocsConfig;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One `title → path` link in a navigation section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavEntry {
    /// Display title.
    pub title: String,
    /// Path relative to the docs root, e.g. `CuMind/setup.md`.
    pub path: String,
}

/// A named, ordered group of navigation entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavSection {
    /// Section name as it appears in the navigation tree.
    pub name: String,
    /// Entries in display order.
    pub entries: Vec<NavEntry>,
}

/// What a recompute did to the navigation document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavUpdate {
    /// The section was replaced and the document persisted.
    Replaced {
        /// Number of entries in the new section.
        entries: usize,
    },
    /// The store held no documents; the navigation document was not touched.
    Unchanged,
}

/// Narrow access to a navigation document, independent of its file format.
pub trait NavDocument {
    /// The current contents of the named top-level section, if present.
    fn list_section(&self, name: &str) -> Option<NavSection>;

    /// Remove every top-level entry for `section.name` and append `section`.
    fn replace_section(&mut self, section: &NavSection) -> Result<()>;

    /// Write the document back to its backing store.
    fn persist(&self) -> Result<()>;
}

// ---------------------------------------------------------------------------
// Section building
// ---------------------------------------------------------------------------

/// Build a section from document file names, sorted ascending by file name.
///
/// Each path is `"<section>/<filename>"`; titles follow [`derive_title`].
pub fn build_section(section: &str, filenames: &[String], extension: &str) -> NavSection {
    let mut sorted: Vec<&String> = filenames.iter().collect();
    sorted.sort();

    let entries = sorted
        .into_iter()
        .map(|file| NavEntry {
            title: derive_title(file, extension),
            path: format!("{section}/{file}"),
        })
        .collect();

    NavSection {
        name: section.to_string(),
        entries,
    }
}

/// Titles shared by more than one entry (distinct files, same derived title).
pub fn duplicate_titles(section: &NavSection) -> Vec<&str> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for entry in &section.entries {
        *counts.entry(entry.title.as_str()).or_default() += 1;
    }

    let mut dups: Vec<&str> = counts
        .into_iter()
        .filter_map(|(title, n)| (n > 1).then_some(title))
        .collect();
    dups.sort_unstable();
    dups
}

// ---------------------------------------------------------------------------
// NavigationMerger
// ---------------------------------------------------------------------------

/// Recomputes the owned section from the local store.
#[derive(Debug, Clone)]
pub struct NavigationMerger {
    nav_config: PathBuf,
    section: String,
    extension: String,
}

impl NavigationMerger {
    /// Merger for the config file and section named in `config`.
    pub fn new(config: &SyncConfig) -> Self {
        Self {
            nav_config: config.nav_config.clone(),
            section: config.section.clone(),
            extension: config.extension.clone(),
        }
    }

    /// Recompute the section into the YAML config file and persist it.
    ///
    /// The file is not even opened when the store is empty.
    #[instrument(skip_all, fields(section = %self.section, config = %self.nav_config.display()))]
    pub fn recompute(&self, store: &LocalStore) -> Result<NavUpdate> {
        let Some(section) = self.section_from_store(store)? else {
            return Ok(NavUpdate::Unchanged);
        };

        let mut doc = MkDocsConfig::load(&self.nav_config)?;
        self.apply(&mut doc, &section)
    }

    /// Recompute the section into any [`NavDocument`] and persist it.
    pub fn recompute_into<D: NavDocument>(
        &self,
        store: &LocalStore,
        doc: &mut D,
    ) -> Result<NavUpdate> {
        match self.section_from_store(store)? {
            Some(section) => self.apply(doc, &section),
            None => Ok(NavUpdate::Unchanged),
        }
    }

    fn section_from_store(&self, store: &LocalStore) -> Result<Option<NavSection>> {
        let files = store.list_docs()?;
        if files.is_empty() {
            info!("no documentation files found to add to navigation");
            return Ok(None);
        }

        let section = build_section(&self.section, &files, &self.extension);
        let dups = duplicate_titles(&section);
        if !dups.is_empty() {
            warn!(titles = ?dups, "several files share a navigation title");
        }
        Ok(Some(section))
    }

    fn apply<D: NavDocument>(&self, doc: &mut D, section: &NavSection) -> Result<NavUpdate> {
        let previous = doc.list_section(&section.name).map(|s| s.entries.len());
        doc.replace_section(section)?;
        doc.persist()?;

        info!(
            entries = section.entries.len(),
            previous = ?previous,
            "navigation section updated"
        );
        Ok(NavUpdate::Replaced {
            entries: section.entries.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// In-memory document that records persist calls.
    #[derive(Default)]
    struct MemoryNav {
        sections: Vec<NavSection>,
        persisted: Cell<usize>,
    }

    impl NavDocument for MemoryNav {
        fn list_section(&self, name: &str) -> Option<NavSection> {
            self.sections.iter().find(|s| s.name == name).cloned()
        }

        fn replace_section(&mut self, section: &NavSection) -> Result<()> {
            self.sections.retain(|s| s.name != section.name);
            self.sections.push(section.clone());
            Ok(())
        }

        fn persist(&self) -> Result<()> {
            self.persisted.set(self.persisted.get() + 1);
            Ok(())
        }
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn section_sorted_by_filename() {
        let files = names(&["zeta.md", "api_ref.md", "Intro.md"]);
        let section = build_section("CuMind", &files, ".md");
        let paths: Vec<&str> = section.entries.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(
            paths,
            vec!["CuMind/Intro.md", "CuMind/api_ref.md", "CuMind/zeta.md"]
        );
        assert_eq!(section.entries[1].title, "Api Ref");
    }

    #[test]
    fn duplicate_titles_detected() {
        let files = names(&["my-file.md", "my_file.md", "other.md"]);
        let section = build_section("S", &files, ".md");
        assert_eq!(duplicate_titles(&section), vec!["My File"]);
        assert_eq!(section.entries.len(), 3);
    }

    #[test]
    fn empty_store_leaves_document_alone() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path().join("docs"), ".md");
        store.reset().unwrap();

        let merger = NavigationMerger::new(&SyncConfig::default());
        let mut doc = MemoryNav::default();
        let update = merger.recompute_into(&store, &mut doc).unwrap();

        assert_eq!(update, NavUpdate::Unchanged);
        assert!(doc.sections.is_empty());
        assert_eq!(doc.persisted.get(), 0);
    }

    #[test]
    fn replaces_stale_section() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path().join("docs"), ".md");
        store.reset().unwrap();
        store.write("b.md", "b").unwrap();
        store.write("a.md", "a").unwrap();

        let mut doc = MemoryNav::default();
        doc.sections.push(NavSection {
            name: "CuMind".into(),
            entries: vec![NavEntry {
                title: "Gone".into(),
                path: "CuMind/gone.md".into(),
            }],
        });

        let merger = NavigationMerger::new(&SyncConfig::default());
        let update = merger.recompute_into(&store, &mut doc).unwrap();

        assert_eq!(update, NavUpdate::Replaced { entries: 2 });
        assert_eq!(doc.persisted.get(), 1);
        let section = doc.list_section("CuMind").unwrap();
        let paths: Vec<&str> = section.entries.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["CuMind/a.md", "CuMind/b.md"]);
    }

    #[test]
    fn empty_store_does_not_require_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path().join("docs"), ".md");
        let config = SyncConfig {
            nav_config: dir.path().join("missing.yml"),
            ..SyncConfig::default()
        };

        let update = NavigationMerger::new(&config).recompute(&store).unwrap();
        assert_eq!(update, NavUpdate::Unchanged);
    }

    #[test]
    fn tagged_config_is_left_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path().join("docs"), ".md");
        store.reset().unwrap();
        store.write("intro.md", "hello").unwrap();

        let nav_path = dir.path().join("mkdocs.yml");
        let original = r#"site_name: Docs
nav:
  - Home: index.md
markdown_extensions:
  - pymdownx.emoji:
      emoji_generator: !!python/name:material.extensions.emoji.to_svg
"#;
        std::fs::write(&nav_path, original).unwrap();

        let config = SyncConfig {
            nav_config: nav_path.clone(),
            ..SyncConfig::default()
        };
        let err = NavigationMerger::new(&config).recompute(&store).unwrap_err();

        assert!(matches!(err, docsync_shared::DocSyncError::Nav { .. }));
        assert_eq!(std::fs::read_to_string(&nav_path).unwrap(), original);
    }
}
