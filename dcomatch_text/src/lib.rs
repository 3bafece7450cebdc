//! Article model and text primitives shared by the ranking and redline crates.
//!
//! This crate provides:
//! - the article data model (`Article`, `Order`, `Category`)
//! - paragraph preprocessing and word counting (`preprocess`, `word_count`)
//! - content fingerprints for exact-duplicate checks
//! - a lossless tokenizer for word-level diffs (`tokenize`)
//!
//! Preprocessing keeps paragraph numbering verbatim: identical-paragraph
//! matching downstream relies on exact text equality, prefixes included.
//!
//! # Example
//!
//! ```rust
//! use dcomatch_text::{preprocess, word_count};
//!
//! let paragraphs = preprocess("14.—(1) The undertaker may\r\n\r\n  (a) enter land;\n");
//! assert_eq!(paragraphs, vec!["14.—(1) The undertaker may", "(a) enter land;"]);
//! assert_eq!(word_count(&paragraphs), 7);
//! ```

mod model;
mod preprocess;
mod tokenize;

pub use model::{Article, Category, Order, UnknownCategory};
pub use preprocess::{
    fold_paragraph, join_paragraphs, joined_len, paragraph_fingerprint, preprocess,
    text_fingerprint, word_count,
};
pub use tokenize::{Token, TokenKind, TokenStream, tokenize};

#[cfg(test)]
mod tests;
