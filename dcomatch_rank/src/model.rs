use std::fmt;

use serde::{Deserialize, Serialize};

use dcomatch_text::{Article, Category};

use crate::config::WordBand;

/// Result of comparing two paragraph sequences.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    /// Score in `0.0..=100.0`.
    pub similarity: f64,
    /// Paragraphs were matched out of order.
    pub reordered: bool,
}

impl Comparison {
    pub const IDENTICAL: Comparison = Comparison {
        similarity: 100.0,
        reordered: false,
    };
}

/// One ranked candidate, the best match found within its order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityMatch {
    pub similarity: f64,
    pub reordered: bool,
    pub article_id: i64,
    pub article_number: String,
    pub article_title: String,
    pub first_paragraph: String,
    pub category: Category,
    pub word_count: usize,
    pub order_id: i64,
    pub order_name: String,
    pub year: Option<i32>,
    pub url: Option<String>,
}

impl SimilarityMatch {
    pub fn from_article(article: &Article, comparison: Comparison) -> Self {
        Self {
            similarity: comparison.similarity,
            reordered: comparison.reordered,
            article_id: article.id,
            article_number: article.number.clone(),
            article_title: article.title.clone(),
            first_paragraph: article.first_paragraph().to_string(),
            category: article.category,
            word_count: article.word_count,
            order_id: article.order.id,
            order_name: article.order.name.clone(),
            year: article.order.year,
            url: article.url.clone(),
        }
    }
}

/// Why a candidate never reached the comparator or was dropped after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    SameOrder,
    OutsideWordBand,
    CategoryMismatch,
    LengthRatio,
    WordOverlap,
    BelowThreshold,
}

impl SkipReason {
    pub fn as_str(self) -> &'static str {
        match self {
            SkipReason::SameOrder => "same_order",
            SkipReason::OutsideWordBand => "outside_word_band",
            SkipReason::CategoryMismatch => "category_mismatch",
            SkipReason::LengthRatio => "length_ratio",
            SkipReason::WordOverlap => "word_overlap",
            SkipReason::BelowThreshold => "below_threshold",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of the cheap filter stage for one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterVerdict {
    /// Same content fingerprint as the source; scores 100 without comparing.
    Exact,
    /// Run the comparator. `forced` keeps the result regardless of the
    /// similarity threshold.
    Compare { forced: bool },
    Skip(SkipReason),
}

/// Per-reason skip counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkipCounts {
    pub same_order: usize,
    pub outside_word_band: usize,
    pub category_mismatch: usize,
    pub length_ratio: usize,
    pub word_overlap: usize,
    pub below_threshold: usize,
}

impl SkipCounts {
    pub(crate) fn record(&mut self, reason: SkipReason) {
        let slot = match reason {
            SkipReason::SameOrder => &mut self.same_order,
            SkipReason::OutsideWordBand => &mut self.outside_word_band,
            SkipReason::CategoryMismatch => &mut self.category_mismatch,
            SkipReason::LengthRatio => &mut self.length_ratio,
            SkipReason::WordOverlap => &mut self.word_overlap,
            SkipReason::BelowThreshold => &mut self.below_threshold,
        };
        *slot += 1;
    }

    pub fn total(&self) -> usize {
        self.same_order
            + self.outside_word_band
            + self.category_mismatch
            + self.length_ratio
            + self.word_overlap
            + self.below_threshold
    }
}

/// Counters describing one ranking pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankStats {
    pub fetched: usize,
    pub exact_matches: usize,
    pub compared: usize,
    pub forced: usize,
    pub skipped: SkipCounts,
    pub comparison_failures: usize,
    /// Candidates left unevaluated because the pass budget ran out.
    pub not_evaluated: usize,
    pub elapsed_micros: u64,
}

/// Ranked matches plus the statistics of the pass that produced them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankReport {
    pub word_count: usize,
    pub band: WordBand,
    pub matches: Vec<SimilarityMatch>,
    pub stats: RankStats,
}

/// Ranking of one article of a scanned order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleScan {
    pub article_id: i64,
    pub article_number: String,
    pub article_title: String,
    /// No article of another order matched.
    pub novel: bool,
    pub matches: Vec<SimilarityMatch>,
}
