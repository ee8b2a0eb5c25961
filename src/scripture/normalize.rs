//! Turns remote markup fragments into plain reading text.

use once_cell::sync::Lazy;
use regex::Regex;

// Verse numbers keep their digits but stand apart from the text around them.
static VERSE_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<span\b[^>]*\bclass="v"[^>]*>([^<]*)</span>"#)
        .expect("verse number pattern is valid")
});

// Block boundaries separate words; inline tags sit inside them.
static BLOCK_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)</?(?:p|br|div|h[1-6]|li|ul|ol|tr|td|table|blockquote)\b[^>]*>")
        .expect("block tag pattern is valid")
});

static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"));

// `&amp;` goes last so an escaped entity such as `&amp;lt;` decodes once.
const ENTITIES: &[(&str, &str)] = &[
    ("&nbsp;", " "),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#39;", "'"),
    ("&apos;", "'"),
    ("&amp;", "&"),
];

/// Strips tags, decodes the common entities and collapses whitespace.
///
/// Inline tags are removed outright so punctuation stays on its word. Block
/// tags and verse-number spans become whitespace.
pub fn clean(raw: &str) -> String {
    let numbered = VERSE_NUMBER.replace_all(raw, " $1 ");
    let blocks = BLOCK_TAG.replace_all(&numbered, " ");
    let mut decoded = TAG.replace_all(&blocks, "").into_owned();
    for (entity, replacement) in ENTITIES {
        if decoded.contains(entity) {
            decoded = decoded.replace(entity, replacement);
        }
    }
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}
