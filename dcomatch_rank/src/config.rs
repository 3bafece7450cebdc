use serde::{Deserialize, Serialize};

use crate::error::RankError;

/// Articles shorter than this use the short-article band.
pub const SHORT_ARTICLE_WORDS: usize = 50;
/// Articles shorter than this (and not short) use the medium band.
pub const MEDIUM_ARTICLE_WORDS: usize = 200;
pub const SHORT_BAND: (f64, f64) = (0.5, 2.0);
pub const MEDIUM_BAND: (f64, f64) = (0.6, 1.6);
pub const LONG_BAND: (f64, f64) = (0.7, 1.3);

pub const LENGTH_RATIO_MIN: f64 = 0.8;
pub const LENGTH_RATIO_MAX: f64 = 1.2;
pub const MIN_WORD_OVERLAP: f64 = 0.6;
pub const MIN_SIMILARITY: f64 = 50.0;
pub const IDENTICAL_MIN_PARAGRAPHS: usize = 5;
pub const PASS_BUDGET_MS: u64 = 30_000;

pub const PAIR_FLOOR: f64 = 0.5;
pub const REORDER_MARGIN: f64 = 5.0;

/// Inclusive `[low, high]` multipliers applied to a word count.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandMultipliers {
    pub low: f64,
    pub high: f64,
}

impl From<(f64, f64)> for BandMultipliers {
    fn from((low, high): (f64, f64)) -> Self {
        Self { low, high }
    }
}

/// Word-count tolerance buckets used to pre-select candidates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WordBands {
    pub short_below: usize,
    pub medium_below: usize,
    pub short: BandMultipliers,
    pub medium: BandMultipliers,
    pub long: BandMultipliers,
}

impl Default for WordBands {
    fn default() -> Self {
        Self {
            short_below: SHORT_ARTICLE_WORDS,
            medium_below: MEDIUM_ARTICLE_WORDS,
            short: SHORT_BAND.into(),
            medium: MEDIUM_BAND.into(),
            long: LONG_BAND.into(),
        }
    }
}

impl WordBands {
    fn multipliers_for(&self, word_count: usize) -> BandMultipliers {
        if word_count < self.short_below {
            self.short
        } else if word_count < self.medium_below {
            self.medium
        } else {
            self.long
        }
    }

    /// Inclusive candidate word-count range for a source of `word_count` words.
    pub fn band_for(&self, word_count: usize) -> WordBand {
        let m = self.multipliers_for(word_count);
        let w = word_count as f64;
        WordBand {
            min: (w * m.low).floor() as usize,
            max: (w * m.high).floor() as usize,
        }
    }
}

/// Inclusive word-count range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordBand {
    pub min: usize,
    pub max: usize,
}

impl WordBand {
    /// Band for `word_count` under the default buckets.
    pub fn for_count(word_count: usize) -> Self {
        WordBands::default().band_for(word_count)
    }

    pub fn contains(&self, word_count: usize) -> bool {
        (self.min..=self.max).contains(&word_count)
    }
}

/// Inclusive ratio range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatioRange {
    pub min: f64,
    pub max: f64,
}

impl RatioRange {
    pub fn contains(&self, ratio: f64) -> bool {
        self.min <= ratio && ratio <= self.max
    }
}

impl Default for RatioRange {
    fn default() -> Self {
        Self {
            min: LENGTH_RATIO_MIN,
            max: LENGTH_RATIO_MAX,
        }
    }
}

/// Tunables for the permutation-tolerant paragraph aligner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignOptions {
    /// Minimum per-paragraph similarity (0..=1) for a fuzzy pairing.
    pub pair_floor: f64,
    /// Points by which the aligned score must beat the in-order score
    /// before a non-monotonic alignment is reported as reordered.
    pub reorder_margin: f64,
}

impl Default for AlignOptions {
    fn default() -> Self {
        Self {
            pair_floor: PAIR_FLOOR,
            reorder_margin: REORDER_MARGIN,
        }
    }
}

/// Policy knobs for one ranking pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankOptions {
    pub bands: WordBands,
    pub length_ratio: RatioRange,
    pub min_word_overlap: f64,
    /// Similarity a comparison must exceed to be kept, unless it was
    /// reached through the identical-paragraph shortcut.
    pub min_similarity: f64,
    pub identical_min_paragraphs: usize,
    /// Evaluate candidates on the rayon pool instead of sequentially.
    pub parallel: bool,
    /// Wall-clock ceiling for a pass; remaining candidates are skipped.
    pub pass_budget_ms: Option<u64>,
    pub align: AlignOptions,
}

impl Default for RankOptions {
    fn default() -> Self {
        Self {
            bands: WordBands::default(),
            length_ratio: RatioRange::default(),
            min_word_overlap: MIN_WORD_OVERLAP,
            min_similarity: MIN_SIMILARITY,
            identical_min_paragraphs: IDENTICAL_MIN_PARAGRAPHS,
            parallel: false,
            pass_budget_ms: Some(PASS_BUDGET_MS),
            align: AlignOptions::default(),
        }
    }
}

impl RankOptions {
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_pass_budget_ms(mut self, budget: Option<u64>) -> Self {
        self.pass_budget_ms = budget;
        self
    }

    pub fn with_min_similarity(mut self, min_similarity: f64) -> Self {
        self.min_similarity = min_similarity;
        self
    }

    pub fn with_align(mut self, align: AlignOptions) -> Self {
        self.align = align;
        self
    }

    /// Reject inverted ranges and out-of-domain thresholds.
    pub fn validate(&self) -> Result<(), RankError> {
        let invalid = |msg: String| Err(RankError::InvalidConfig(msg));

        for (name, m) in [
            ("bands.short", self.bands.short),
            ("bands.medium", self.bands.medium),
            ("bands.long", self.bands.long),
        ] {
            if !(m.low >= 0.0 && m.low <= m.high) {
                return invalid(format!("{name}: low {} exceeds high {}", m.low, m.high));
            }
        }
        if self.bands.short_below > self.bands.medium_below {
            return invalid(format!(
                "bands.short_below {} exceeds bands.medium_below {}",
                self.bands.short_below, self.bands.medium_below
            ));
        }
        if !(self.length_ratio.min > 0.0 && self.length_ratio.min <= self.length_ratio.max) {
            return invalid(format!(
                "length_ratio [{}, {}] is not a valid range",
                self.length_ratio.min, self.length_ratio.max
            ));
        }
        if !(0.0..=1.0).contains(&self.min_word_overlap) {
            return invalid(format!(
                "min_word_overlap {} must be within [0, 1]",
                self.min_word_overlap
            ));
        }
        if !(0.0..=100.0).contains(&self.min_similarity) {
            return invalid(format!(
                "min_similarity {} must be within [0, 100]",
                self.min_similarity
            ));
        }
        if !(0.0..=1.0).contains(&self.align.pair_floor) {
            return invalid(format!(
                "align.pair_floor {} must be within [0, 1]",
                self.align.pair_floor
            ));
        }
        if !(self.align.reorder_margin >= 0.0) {
            return invalid(format!(
                "align.reorder_margin {} must be non-negative",
                self.align.reorder_margin
            ));
        }
        Ok(())
    }
}
