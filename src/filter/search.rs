//! Case-insensitive free-text search.

// ===== SearchQuery =====

/// Validated search query. Never empty.
///
/// Smart constructor enforces the non-empty invariant; an empty search box
/// means "no text constraint" and is represented by `None` at the call site.
/// Whitespace is significant: a query of `" "` matches lines containing a space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    raw: String,
    folded: String,
}

impl SearchQuery {
    /// Smart constructor: returns `None` for an empty query.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.is_empty() {
            return None;
        }
        let folded = raw.to_lowercase();
        Some(Self { raw, folded })
    }

    /// The query as typed.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// True if `text` contains the query, ignoring case.
    pub fn is_match(&self, text: &str) -> bool {
        if text.is_ascii() && self.folded.is_ascii() {
            return contains_ignore_ascii_case(text.as_bytes(), self.folded.as_bytes());
        }
        text.to_lowercase().contains(self.folded.as_str())
    }
}

/// Substring test without allocating; `needle` must already be lowercase.
fn contains_ignore_ascii_case(haystack: &[u8], needle: &[u8]) -> bool {
    if needle.len() > haystack.len() {
        return false;
    }
    haystack
        .windows(needle.len())
        .any(|window| window.eq_ignore_ascii_case(needle))
}
