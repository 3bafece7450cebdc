use std::collections::HashSet;

use dcomatch_text::{Article, Category, fold_paragraph, joined_len, text_fingerprint, word_count};

use crate::config::{RankOptions, WordBand};
use crate::model::{FilterVerdict, SkipReason};

/// Precomputed features of one side of a comparison.
#[derive(Debug, Clone)]
pub struct TextProfile {
    pub paragraphs: Vec<String>,
    pub word_count: usize,
    pub joined_len: usize,
    pub fingerprint: u64,
    folded: Vec<String>,
    words: HashSet<String>,
}

impl TextProfile {
    /// Build a profile from paragraphs, re-trimming and dropping blanks.
    pub fn new<S: AsRef<str>>(paragraphs: &[S]) -> Self {
        let paragraphs: Vec<String> = paragraphs
            .iter()
            .map(|p| p.as_ref().trim())
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();
        let folded = paragraphs.iter().map(|p| fold_paragraph(p)).collect();
        let words = paragraphs
            .iter()
            .flat_map(|p| p.split_whitespace())
            .map(str::to_lowercase)
            .collect();

        Self {
            word_count: word_count(&paragraphs),
            joined_len: joined_len(&paragraphs),
            fingerprint: text_fingerprint(&paragraphs),
            paragraphs,
            folded,
            words,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }

    /// Number of this profile's paragraphs that also occur in `other`,
    /// compared case-insensitively after trimming.
    pub fn identical_paragraphs(&self, other: &TextProfile) -> usize {
        let theirs: HashSet<&str> = other.folded.iter().map(String::as_str).collect();
        self.folded
            .iter()
            .filter(|p| theirs.contains(p.as_str()))
            .count()
    }

    /// `|A ∩ B| / min(|A|, |B|)` over lowercase word sets; 0 when either
    /// side has no words.
    pub fn word_overlap(&self, other: &TextProfile) -> f64 {
        let smaller = self.words.len().min(other.words.len());
        if smaller == 0 {
            return 0.0;
        }
        let (probe, set) = if self.words.len() <= other.words.len() {
            (&self.words, &other.words)
        } else {
            (&other.words, &self.words)
        };
        let shared = probe.iter().filter(|w| set.contains(*w)).count();
        shared as f64 / smaller as f64
    }

    /// Candidate length over source length, in joined characters.
    pub fn length_ratio(&self, candidate: &TextProfile) -> f64 {
        if self.joined_len == 0 {
            return 0.0;
        }
        candidate.joined_len as f64 / self.joined_len as f64
    }
}

/// Run the cheap filters for one candidate, cheapest first.
///
/// `category` is the caller's hint; `None` disables the category filter.
/// The candidate's word count is re-checked against `band` even though the
/// store already filtered on it.
pub fn evaluate_candidate(
    source: &TextProfile,
    category: Option<Category>,
    band: &WordBand,
    candidate: &Article,
    profile: &TextProfile,
    options: &RankOptions,
) -> FilterVerdict {
    if !band.contains(candidate.word_count) {
        return FilterVerdict::Skip(SkipReason::OutsideWordBand);
    }
    if category.is_some_and(|c| c != candidate.category) {
        return FilterVerdict::Skip(SkipReason::CategoryMismatch);
    }
    if profile.fingerprint == source.fingerprint && profile.paragraphs == source.paragraphs {
        return FilterVerdict::Exact;
    }
    if !options.length_ratio.contains(source.length_ratio(profile)) {
        return FilterVerdict::Skip(SkipReason::LengthRatio);
    }

    let total = source.paragraphs.len();
    if total >= options.identical_min_paragraphs && source.identical_paragraphs(profile) * 2 > total
    {
        return FilterVerdict::Compare { forced: true };
    }

    if source.word_overlap(profile) < options.min_word_overlap {
        return FilterVerdict::Skip(SkipReason::WordOverlap);
    }
    FilterVerdict::Compare { forced: false }
}
