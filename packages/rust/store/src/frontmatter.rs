//! Minimal front-matter handling: detect a leading block, or prepend one
//! carrying a `title`.

use std::borrow::Cow;

/// Line that opens and closes a front-matter block.
pub const DELIMITER: &str = "---";

/// Whether `content` already starts with a front-matter delimiter.
pub fn has_front_matter(content: &str) -> bool {
    content.starts_with(DELIMITER)
}

/// Return `content` unchanged if it has front matter, else prefixed with a `title` block.
pub fn with_title<'a>(content: &'a str, title: &str) -> Cow<'a, str> {
    if has_front_matter(content) {
        Cow::Borrowed(content)
    } else {
        let title = yaml_scalar(title);
        Cow::Owned(format!("{DELIMITER}\ntitle: {title}\n{DELIMITER}\n\n{content}"))
    }
}

/// Render `value` as a YAML scalar, quoted only when plain style would
/// change its meaning (`: `, leading `#`, `true`, `null`, ...).
fn yaml_scalar(value: &str) -> String {
    match serde_yaml::to_string(value) {
        Ok(rendered) => rendered.trim_end_matches('\n').to_string(),
        // Double-quoted YAML accepts JSON-style escapes.
        Err(_) => format!("{value:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Parse the leading block back and return its `title`.
    fn parsed_title(doc: &str) -> serde_yaml::Value {
        let body = doc
            .strip_prefix("---\n")
            .and_then(|rest| rest.split_once("\n---\n"))
            .map(|(block, _)| block)
            .expect("front matter block");
        let meta: serde_yaml::Value = serde_yaml::from_str(body).expect("valid yaml");
        meta.get("title").cloned().expect("title key")
    }

    #[test]
    fn prepends_title_block() {
        let out = with_title("# Setup\n", "Setup Guide");
        assert_eq!(out, "---\ntitle: Setup Guide\n---\n\n# Setup\n");
    }

    #[test]
    fn existing_block_is_untouched() {
        let src = "---\ntitle: Custom\nauthor: someone\n---\n\nBody\n";
        let out = with_title(src, "Ignored");
        assert!(matches!(out, Cow::Borrowed(_)));
        assert_eq!(out, src);
    }

    #[test]
    fn empty_content_still_gets_a_block() {
        assert_eq!(with_title("", "Empty"), "---\ntitle: Empty\n---\n\n");
    }

    #[test]
    fn titles_with_yaml_indicators_stay_strings() {
        for title in ["Faq: Common", "#Notes", "True", "Null", "[Draft]", "It's Here"] {
            let out = with_title("body", title);
            assert_eq!(
                parsed_title(&out),
                serde_yaml::Value::String(title.to_string()),
                "{out}"
            );
        }
    }
}
