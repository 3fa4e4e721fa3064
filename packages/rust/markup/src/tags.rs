//! Tag scanner for the small HTML vocabulary used in hand-authored descriptions.
//!
//! Only tag boundaries are located; text between tags is never decoded or
//! rewritten, so slicing the source by tag offsets gives back the exact
//! authored text.

use std::sync::LazyLock;

use regex::Regex;

/// A single opening or closing tag found in a description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Tag {
    /// Byte offset of `<`.
    pub start: usize,
    /// Byte offset just past `>`.
    pub end: usize,
    /// Lowercased element name.
    pub name: String,
    /// `true` for `</name>`.
    pub closing: bool,
}

impl Tag {
    pub(crate) fn is_open(&self, name: &str) -> bool {
        !self.closing && self.name == name
    }

    pub(crate) fn is_close(&self, name: &str) -> bool {
        self.closing && self.name == name
    }
}

/// Scan `text` for tags, in document order.
pub(crate) fn scan(text: &str) -> Vec<Tag> {
    static TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
        // Attribute values may be quoted and contain `>`.
        Regex::new(r#"<(/?)([A-Za-z][A-Za-z0-9]*)((?:\s(?:[^>"']|"[^"]*"|'[^']*')*)?)/?>"#)
            .expect("valid regex")
    });

    TAG_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            Some(Tag {
                start: whole.start(),
                end: whole.end(),
                name: caps[2].to_ascii_lowercase(),
                closing: !caps[1].is_empty(),
            })
        })
        .collect()
}
