//! Word-level redline between two versions of an article.
//!
//! Both texts are tokenized losslessly (words, punctuation and, by default,
//! line breaks), diffed with a Myers shortest edit script over token keys,
//! and emitted as an ordered list of [`DiffSpan`]s tagged added, removed or
//! unchanged. The renderer does not care which text is older: it classifies
//! each run by the input it came from.
//!
//! Whitespace at the edge of a change group is emitted once, as unchanged.
//! Joining added and unchanged spans therefore reproduces the later token
//! stream (and the exact later text around insertions); joining removed and
//! unchanged spans reproduces the earlier token stream.
//!
//! Primary entrypoints:
//! - [`render_diff`]
//! - [`format_markup`]
//! - [`format_plain`]
//!
//! # Example
//!
//! ```rust
//! use dcomatch_redline::{RedlineOptions, SpanTag, render_diff};
//!
//! let redline = render_diff(
//!     "The undertaker must notify the authority.",
//!     "The undertaker must notify the authority and the Secretary of State.",
//!     &RedlineOptions::default(),
//! )
//! .unwrap();
//! let added = redline
//!     .spans
//!     .iter()
//!     .filter(|s| s.tag == SpanTag::Added)
//!     .collect::<Vec<_>>();
//! assert_eq!(added.len(), 1);
//! assert_eq!(added[0].value, "and the Secretary of State");
//! ```

mod engine;
mod error;
mod model;
mod render;

use dcomatch_text::tokenize;

pub use error::RedlineError;
pub use model::{DiffSpan, Redline, RedlineOptions, RedlineStats, SpanTag};
pub use render::{format_markup, format_plain, side_text};

/// Diff `earlier_text` against `later_text` and render the result.
///
/// Fails with [`RedlineError::Validation`] when either text is blank.
pub fn render_diff(
    earlier_text: &str,
    later_text: &str,
    options: &RedlineOptions,
) -> Result<Redline, RedlineError> {
    if earlier_text.trim().is_empty() {
        return Err(RedlineError::Validation {
            field: "earlier_text",
        });
    }
    if later_text.trim().is_empty() {
        return Err(RedlineError::Validation {
            field: "later_text",
        });
    }

    let (spans, stats) = diff_spans(earlier_text, later_text, options);
    let has_changes = spans.iter().any(|span| span.tag != SpanTag::Unchanged);
    let markup = format_markup(&spans);

    tracing::debug!(
        spans = spans.len(),
        added_words = stats.added_words,
        removed_words = stats.removed_words,
        "redline_rendered"
    );

    Ok(Redline {
        has_changes,
        spans,
        markup,
        stats,
    })
}

/// Compute classified spans without validation or markup.
pub fn diff_spans(
    earlier_text: &str,
    later_text: &str,
    options: &RedlineOptions,
) -> (Vec<DiffSpan>, RedlineStats) {
    let a = tokenize(earlier_text, options.newline_is_token);
    let b = tokenize(later_text, options.newline_is_token);
    let a_keys = engine::token_keys(&a, options);
    let b_keys = engine::token_keys(&b, options);
    let ops = engine::compute_ops(&a_keys, &b_keys);
    engine::build_spans(&a, &b, &ops)
}

#[cfg(test)]
mod tests;
