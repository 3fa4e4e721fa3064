//! Description text normalization.
//!
//! Endpoint, parameter, and schema descriptions are hand-authored and may
//! contain a small HTML vocabulary: anchors and unordered lists. This crate
//! removes anchors (keeping their text) and lifts lists into a structured
//! [`Description::List`] that the site generator renders natively.

mod tags;

use std::borrow::Cow;

use tracing::debug;

use apiref_shared::{Description, MarkupError};

use crate::tags::Tag;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Normalize one description.
///
/// Anchors are stripped first; the result is then checked for list markup.
/// Text without either kind of markup comes back unchanged as
/// [`Description::Text`]. Error offsets point into `text`, not the stripped
/// intermediate.
pub fn normalize(text: &str) -> Result<Description, MarkupError> {
    let (stripped, removed) = strip_anchors(text);
    let remap = |at| authored_offset(&removed, at);
    convert_lists(&stripped).map_err(|e| e.map_offset(remap))
}

/// [`normalize`] for optional fields; `None` passes through.
pub fn normalize_opt(text: Option<&str>) -> Result<Option<Description>, MarkupError> {
    text.map(normalize).transpose()
}

/// Remove every `<a ...>` open tag (plus the spaces right after it) and every
/// `</a>` close tag, keeping the link text.
pub fn strip_anchor_tags(text: &str) -> Cow<'_, str> {
    strip_anchors(text).0
}

// ---------------------------------------------------------------------------
// Anchor stripping
// ---------------------------------------------------------------------------

/// A span cut out of the authored text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Removal {
    /// Position in the stripped output where the cut happened.
    at: usize,
    len: usize,
}

fn strip_anchors(text: &str) -> (Cow<'_, str>, Vec<Removal>) {
    let anchors: Vec<Tag> = tags::scan(text)
        .into_iter()
        .filter(|tag| tag.is_open("a") || tag.is_close("a"))
        .collect();

    if anchors.is_empty() {
        return (Cow::Borrowed(text), Vec::new());
    }

    let mut out = String::with_capacity(text.len());
    let mut removed = Vec::with_capacity(anchors.len());
    let mut cursor = 0;

    for tag in &anchors {
        out.push_str(&text[cursor..tag.start]);
        cursor = tag.end;
        if !tag.closing {
            cursor += text[cursor..].len() - text[cursor..].trim_start_matches(' ').len();
        }
        removed.push(Removal {
            at: out.len(),
            len: cursor - tag.start,
        });
    }
    out.push_str(&text[cursor..]);

    (Cow::Owned(out), removed)
}

/// Map an offset in the stripped text back to the authored text.
fn authored_offset(removed: &[Removal], offset: usize) -> usize {
    let shift: usize = removed
        .iter()
        .take_while(|cut| cut.at <= offset)
        .map(|cut| cut.len)
        .sum();
    offset + shift
}

/// Convert list markup into `{descText, listItems}`.
///
/// `descText` is the text before the first `<ul>`. Items from every list
/// block are collected in order, each as its raw inner text; markup nested
/// inside an item is kept verbatim. Text after a list block is dropped.
pub fn convert_lists(text: &str) -> Result<Description, MarkupError> {
    let all_tags = tags::scan(text);
    let Some(first) = all_tags.iter().position(|tag| tag.is_open("ul")) else {
        return Ok(Description::Text(text.to_string()));
    };

    let desc_text = text[..all_tags[first].start].to_string();
    let list_items = collect_items(text, &all_tags[first..])?;

    Ok(Description::List {
        desc_text,
        list_items,
    })
}

// ---------------------------------------------------------------------------
// List extraction
// ---------------------------------------------------------------------------

/// An `<li>` that has been opened but not yet closed.
struct OpenItem {
    tag_start: usize,
    content_start: usize,
    depth: usize,
}

fn collect_items(text: &str, tags: &[Tag]) -> Result<Vec<String>, MarkupError> {
    let mut items = Vec::new();
    let mut depth = 0usize;
    let mut block_start = 0usize;
    let mut block_items = 0usize;
    let mut block_end = tags.first().map_or(0, |tag| tag.start);
    let mut open_item: Option<OpenItem> = None;

    for tag in tags {
        match (tag.name.as_str(), tag.closing) {
            ("ul", false) => {
                if depth == 0 {
                    note_dropped_text(&text[block_end..tag.start]);
                    block_start = tag.start;
                    block_items = 0;
                }
                depth += 1;
            }
            ("ul", true) => {
                if depth == 0 {
                    continue;
                }
                if let Some(item) = &open_item {
                    if item.depth == depth {
                        return Err(MarkupError::UnclosedItem {
                            offset: item.tag_start,
                        });
                    }
                }
                depth -= 1;
                if depth == 0 {
                    if block_items == 0 {
                        return Err(MarkupError::EmptyList {
                            offset: block_start,
                        });
                    }
                    block_end = tag.end;
                }
            }
            ("li", false) if depth > 0 => {
                if let Some(item) = &open_item {
                    // `<li>` at the same depth before `</li>`
                    if item.depth == depth {
                        return Err(MarkupError::UnclosedItem {
                            offset: item.tag_start,
                        });
                    }
                } else {
                    open_item = Some(OpenItem {
                        tag_start: tag.start,
                        content_start: tag.end,
                        depth,
                    });
                }
            }
            ("li", true) => {
                if let Some(item) = open_item.take_if(|item| item.depth == depth) {
                    items.push(text[item.content_start..tag.start].to_string());
                    block_items += 1;
                }
            }
            _ => {}
        }
    }

    if let Some(item) = open_item {
        return Err(MarkupError::UnclosedItem {
            offset: item.tag_start,
        });
    }
    if depth > 0 {
        return Err(MarkupError::UnclosedList {
            offset: block_start,
        });
    }

    note_dropped_text(&text[block_end..]);
    Ok(items)
}

fn note_dropped_text(between: &str) {
    if !between.trim().is_empty() {
        debug!(text = between.trim(), "dropping text outside list block");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
