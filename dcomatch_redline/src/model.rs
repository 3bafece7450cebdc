use serde::{Deserialize, Serialize};

/// Classification of one run of tokens in a redline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpanTag {
    Added,
    Removed,
    Unchanged,
}

/// One classified run of text, including its whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSpan {
    pub tag: SpanTag,
    pub value: String,
}

impl DiffSpan {
    pub fn new(tag: SpanTag, value: impl Into<String>) -> Self {
        Self {
            tag,
            value: value.into(),
        }
    }
}

/// Tokenization and comparison switches for [`crate::render_diff`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedlineOptions {
    /// Treat line breaks as atomic tokens so paragraph structure is diffed.
    pub newline_is_token: bool,
    /// Compare tokens case-insensitively. Emitted text keeps its case.
    pub ignore_case: bool,
}

impl Default for RedlineOptions {
    fn default() -> Self {
        Self {
            newline_is_token: true,
            ignore_case: false,
        }
    }
}

/// Token counters for a redline.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct RedlineStats {
    pub added_words: usize,
    pub removed_words: usize,
    pub unchanged_words: usize,
}

/// Rendered comparison between an earlier and a later text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Redline {
    pub has_changes: bool,
    pub spans: Vec<DiffSpan>,
    pub markup: String,
    pub stats: RedlineStats,
}
