//! Core domain types shared by the remote, store, and navigation crates.

// ---------------------------------------------------------------------------
// RemoteFileRef
// ---------------------------------------------------------------------------

/// A document file found in the remote docs folder.
///
/// Produced by the lister, consumed once by the fetcher, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFileRef {
    /// File name, e.g. `getting_started.md`.
    pub name: String,
    /// Direct raw-content location for the file.
    pub download_url: String,
}

// ---------------------------------------------------------------------------
// Title derivation
// ---------------------------------------------------------------------------

/// Derive a display title from a document file name.
///
/// Strips `extension` (if the name ends with it), turns `_` and `-` into
/// spaces, then title-cases: the first letter of every alphabetic run is
/// upper-cased and the remaining letters lower-cased.
///
/// ```
/// use docsync_shared::derive_title;
/// assert_eq!(derive_title("my_file-name.md", ".md"), "My File Name");
/// ```
pub fn derive_title(filename: &str, extension: &str) -> String {
    let stem = filename.strip_suffix(extension).unwrap_or(filename);

    let mut title = String::with_capacity(stem.len());
    let mut prev_alpha = false;

    for c in stem.chars() {
        let c = if c == '_' || c == '-' { ' ' } else { c };
        if c.is_alphabetic() {
            if prev_alpha {
                title.extend(c.to_lowercase());
            } else {
                title.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            title.push(c);
            prev_alpha = false;
        }
    }

    title
}
