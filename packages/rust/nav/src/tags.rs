//! Guard against rewriting YAML whose tags `serde_yaml` would drop.
//!
//! mkdocs configs often carry Python-specific tags such as
//! `!!python/name:material.extensions.emoji.to_svg`. `serde_yaml` loads those
//! as plain empty strings, so writing the document back would erase them.
//! The scan below finds every tag in the source text and checks that the
//! parsed value still carries it.

use std::collections::HashSet;

use serde_yaml::Value;

/// Secondary tags whose meaning survives as a plain value.
const CORE_TAGS: &[&str] = &[
    "str", "int", "float", "bool", "null", "seq", "map", "binary", "timestamp",
];

/// A tag in the source that the parsed document no longer carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LostTag {
    /// 1-based source line.
    pub line: usize,
    /// Tag as written, e.g. `!!python/name:foo.bar`.
    pub tag: String,
}

/// First tag in `source` that would not survive writing `parsed` back out.
///
/// Checks the re-serialized and re-parsed document, so tags dropped on load
/// and tags dropped on emit are both caught.
pub(crate) fn first_lost_tag(source: &str, parsed: &Value) -> Option<LostTag> {
    let mut kept = HashSet::new();
    let round_trip = serde_yaml::to_string(parsed)
        .ok()
        .and_then(|yaml| serde_yaml::from_str::<Value>(&yaml).ok());
    if let Some(value) = &round_trip {
        collect_tags(value, &mut kept);
    }

    source_tags(source).into_iter().find(|found| {
        let name = normalize(&found.tag);
        let core = found.tag.starts_with("!!")
            && CORE_TAGS.contains(&name.split(':').next().unwrap_or_default());
        !core && !kept.contains(&name)
    })
}

fn normalize(tag: &str) -> String {
    tag.trim_start_matches('!')
        .trim_start_matches("tag:yaml.org,2002:")
        .to_string()
}

fn collect_tags(value: &Value, out: &mut HashSet<String>) {
    match value {
        Value::Tagged(tagged) => {
            out.insert(normalize(&tagged.tag.to_string()));
            collect_tags(&tagged.value, out);
        }
        Value::Sequence(items) => items.iter().for_each(|v| collect_tags(v, out)),
        Value::Mapping(map) => {
            for (k, v) in map {
                collect_tags(k, out);
                collect_tags(v, out);
            }
        }
        _ => {}
    }
}

/// Tags that open a node: at line start, or after `:`, `-`, `?`, `[`, `{`, `,`.
///
/// Quoted scalars and comments are skipped. Text inside block scalars is not
/// told apart from nodes, which can only cause a refusal, never a loss.
fn source_tags(source: &str) -> Vec<LostTag> {
    let mut found = Vec::new();

    for (idx, line) in source.lines().enumerate() {
        let chars: Vec<char> = line.chars().collect();
        let mut quote: Option<char> = None;
        let mut last_sig: Option<char> = None;
        let mut i = 0;

        while i < chars.len() {
            let c = chars[i];

            if let Some(q) = quote {
                if q == '"' && c == '\\' {
                    i += 2;
                    continue;
                }
                if c == q {
                    quote = None;
                    last_sig = Some(c);
                }
                i += 1;
                continue;
            }

            if c.is_whitespace() {
                i += 1;
                continue;
            }

            let after_indicator =
                matches!(last_sig, None | Some(':' | '-' | '?' | '[' | '{' | ','));
            let separated = i == 0
                || chars[i - 1].is_whitespace()
                || matches!(last_sig, Some('[' | '{' | ','));
            let node_start = after_indicator && separated;

            if c == '#' && (i == 0 || chars[i - 1].is_whitespace()) {
                break;
            }
            if node_start && (c == '\'' || c == '"') {
                quote = Some(c);
            } else if node_start && c == '!' {
                let tag: String = chars[i..]
                    .iter()
                    .take_while(|c| !c.is_whitespace() && !matches!(c, ',' | ']' | '}'))
                    .collect();
                i += tag.chars().count();
                found.push(LostTag { line: idx + 1, tag });
                last_sig = Some('!');
                continue;
            }

            last_sig = Some(c);
            i += 1;
        }
    }

    found
}
