//! YAML-backed navigation document (an mkdocs-style `mkdocs.yml`).

use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value};
use tracing::debug;

use docsync_shared::{DocSyncError, Result};

use crate::{NavDocument, NavEntry, NavSection, tags};

/// Top-level key holding the navigation list.
const NAV_KEY: &str = "nav";

/// A site config file loaded into memory, mutated, and rewritten wholesale.
///
/// Key order is preserved as encountered; output is block style.
#[derive(Debug, Clone)]
pub struct MkDocsConfig {
    path: PathBuf,
    doc: Value,
}

impl MkDocsConfig {
    /// Read and parse the config file at `path`.
    ///
    /// Fails if the file uses a tag that could not be written back.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| DocSyncError::io(path, e))?;
        Self::from_yaml(path, &content)
    }

    /// Build from YAML text; `path` is where [`persist`](NavDocument::persist) writes.
    pub fn from_yaml(path: impl Into<PathBuf>, content: &str) -> Result<Self> {
        let path = path.into();
        let doc = Self::parse(content)
            .map_err(|e| DocSyncError::parse(format!("{}: {e}", path.display())))?;

        if let Some(lost) = tags::first_lost_tag(content, &doc) {
            return Err(DocSyncError::nav(format!(
                "{}:{}: tag `{}` cannot be preserved when the file is rewritten",
                path.display(),
                lost.line,
                lost.tag
            )));
        }

        Ok(Self { path, doc })
    }

    fn parse(content: &str) -> std::result::Result<Value, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_yaml::from_str(content)
    }

    /// The whole document.
    pub fn value(&self) -> &Value {
        &self.doc
    }

    /// Serialize the document as block-style YAML.
    pub fn to_yaml_string(&self) -> Result<String> {
        serde_yaml::to_string(&self.doc).map_err(|e| DocSyncError::parse(e.to_string()))
    }

    /// The top-level `nav` list, created (empty) if absent.
    fn nav_mut(&mut self) -> Result<&mut Vec<Value>> {
        if self.doc.is_null() {
            self.doc = Value::Mapping(Mapping::new());
        }

        let Value::Mapping(root) = &mut self.doc else {
            return Err(DocSyncError::nav(
                "config document is not a mapping at the top level",
            ));
        };

        let nav = root
            .entry(Value::String(NAV_KEY.into()))
            .or_insert(Value::Sequence(Vec::new()));
        // `nav:` with nothing after it.
        if nav.is_null() {
            *nav = Value::Sequence(Vec::new());
        }

        match nav {
            Value::Sequence(items) => Ok(items),
            _ => Err(DocSyncError::nav("`nav` is present but is not a list")),
        }
    }

    fn nav(&self) -> Option<&Vec<Value>> {
        match self.doc.get(NAV_KEY) {
            Some(Value::Sequence(items)) => Some(items),
            _ => None,
        }
    }
}

/// Whether `item` is a single-key mapping keyed by `name`.
fn is_section(item: &Value, name: &str) -> bool {
    matches!(item, Value::Mapping(m) if m.len() == 1 && m.contains_key(name))
}

fn section_to_value(section: &NavSection) -> Value {
    let entries = section
        .entries
        .iter()
        .map(|entry| {
            let mut link = Mapping::new();
            link.insert(
                Value::String(entry.title.clone()),
                Value::String(entry.path.clone()),
            );
            Value::Mapping(link)
        })
        .collect();

    let mut wrapper = Mapping::new();
    wrapper.insert(Value::String(section.name.clone()), Value::Sequence(entries));
    Value::Mapping(wrapper)
}

/// Read `{title: path}` links; anything else (nested groups etc.) is skipped.
fn entries_from_value(value: &Value) -> Vec<NavEntry> {
    let Value::Sequence(items) = value else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| {
            let Value::Mapping(link) = item else {
                return None;
            };
            if link.len() != 1 {
                return None;
            }
            let (title, path) = link.iter().next()?;
            Some(NavEntry {
                title: title.as_str()?.to_string(),
                path: path.as_str()?.to_string(),
            })
        })
        .collect()
}

impl NavDocument for MkDocsConfig {
    fn list_section(&self, name: &str) -> Option<NavSection> {
        let item = self.nav()?.iter().find(|item| is_section(item, name))?;
        let entries = entries_from_value(item.get(name)?);
        Some(NavSection {
            name: name.to_string(),
            entries,
        })
    }

    fn replace_section(&mut self, section: &NavSection) -> Result<()> {
        let nav = self.nav_mut()?;
        let before = nav.len();
        nav.retain(|item| !is_section(item, &section.name));
        debug!(removed = before - nav.len(), "dropped existing section entries");

        nav.push(section_to_value(section));
        Ok(())
    }

    fn persist(&self) -> Result<()> {
        let yaml = self.to_yaml_string()?;
        std::fs::write(&self.path, yaml).map_err(|e| DocSyncError::io(&self.path, e))
    }
}
