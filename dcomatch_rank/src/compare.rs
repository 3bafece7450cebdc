use std::collections::{HashMap, VecDeque};

use dcomatch_text::{fold_paragraph, paragraph_fingerprint};
use strsim::normalized_levenshtein;

use crate::config::AlignOptions;
use crate::error::ComparisonError;
use crate::model::Comparison;

/// Scores the similarity of two paragraph sequences.
pub trait Comparator: Send + Sync {
    fn compare(&self, source: &[String], target: &[String]) -> Result<Comparison, ComparisonError>;
}

impl<C: Comparator + ?Sized> Comparator for Box<C> {
    fn compare(&self, source: &[String], target: &[String]) -> Result<Comparison, ComparisonError> {
        (**self).compare(source, target)
    }
}

impl<C: Comparator + ?Sized> Comparator for &C {
    fn compare(&self, source: &[String], target: &[String]) -> Result<Comparison, ComparisonError> {
        (**self).compare(source, target)
    }
}

/// In-process comparator: character edit distance plus a
/// permutation-tolerant paragraph alignment.
#[derive(Debug, Clone, Default)]
pub struct EditDistanceComparator {
    options: AlignOptions,
}

impl EditDistanceComparator {
    pub fn new(options: AlignOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &AlignOptions {
        &self.options
    }
}

impl Comparator for EditDistanceComparator {
    fn compare(&self, source: &[String], target: &[String]) -> Result<Comparison, ComparisonError> {
        if source.is_empty() && target.is_empty() {
            return Err(ComparisonError::EmptyInput);
        }
        Ok(align(source, target, &self.options))
    }
}

/// Normalized Levenshtein similarity of the lowercased joined texts, ×100.
pub fn in_order_similarity<S: AsRef<str>>(source: &[S], target: &[S]) -> f64 {
    let a = fold_joined(source);
    let b = fold_joined(target);
    to_percent(normalized_levenshtein(&a, &b))
}

/// Compare two sequences, reporting a reorder when paragraphs match out of
/// order and the aligned score justifies it.
pub fn align<S: AsRef<str>>(source: &[S], target: &[S], options: &AlignOptions) -> Comparison {
    let in_order = in_order_similarity(source, target);
    if source.is_empty() || target.is_empty() {
        return Comparison {
            similarity: in_order,
            reordered: false,
        };
    }

    let src: Vec<String> = source.iter().map(|p| fold_paragraph(p.as_ref())).collect();
    let tgt: Vec<String> = target.iter().map(|p| fold_paragraph(p.as_ref())).collect();
    let pairs = pair_paragraphs(&src, &tgt, options.pair_floor);

    if is_monotonic(&pairs) {
        return Comparison {
            similarity: in_order,
            reordered: false,
        };
    }

    let permuted = permutation_score(&src, &tgt, &pairs);
    if same_multiset(&src, &tgt) || permuted > in_order + options.reorder_margin {
        Comparison {
            similarity: permuted,
            reordered: true,
        }
    } else {
        Comparison {
            similarity: in_order,
            reordered: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Pair {
    pub(crate) source: usize,
    pub(crate) target: usize,
    pub(crate) score: f64,
}

/// Match paragraphs exactly by fingerprint, then greedily by descending
/// similarity among the leftovers. Pairs are returned in source order.
pub(crate) fn pair_paragraphs(src: &[String], tgt: &[String], floor: f64) -> Vec<Pair> {
    let mut by_fingerprint: HashMap<u64, VecDeque<usize>> = HashMap::new();
    for (j, p) in tgt.iter().enumerate() {
        by_fingerprint
            .entry(paragraph_fingerprint(p))
            .or_default()
            .push_back(j);
    }

    let mut pairs = Vec::new();
    let mut src_used = vec![false; src.len()];
    let mut tgt_used = vec![false; tgt.len()];
    for (i, p) in src.iter().enumerate() {
        let hit = by_fingerprint
            .get_mut(&paragraph_fingerprint(p))
            .and_then(|queue| queue.pop_front())
            .filter(|&j| tgt[j] == *p);
        if let Some(j) = hit {
            src_used[i] = true;
            tgt_used[j] = true;
            pairs.push(Pair {
                source: i,
                target: j,
                score: 1.0,
            });
        }
    }

    let src_lens: Vec<usize> = src.iter().map(|p| p.chars().count()).collect();
    let tgt_lens: Vec<usize> = tgt.iter().map(|p| p.chars().count()).collect();
    let mut fuzzy = Vec::new();
    for i in (0..src.len()).filter(|&i| !src_used[i]) {
        for j in (0..tgt.len()).filter(|&j| !tgt_used[j]) {
            // Edit similarity never exceeds the length ratio.
            let (short, long) = (src_lens[i].min(tgt_lens[j]), src_lens[i].max(tgt_lens[j]));
            if long > 0 && (short as f64 / long as f64) < floor {
                continue;
            }
            let score = normalized_levenshtein(&src[i], &tgt[j]);
            if score >= floor {
                fuzzy.push(Pair {
                    source: i,
                    target: j,
                    score,
                });
            }
        }
    }
    fuzzy.sort_by(|x, y| {
        y.score
            .total_cmp(&x.score)
            .then(x.source.cmp(&y.source))
            .then(x.target.cmp(&y.target))
    });
    for pair in fuzzy {
        if src_used[pair.source] || tgt_used[pair.target] {
            continue;
        }
        src_used[pair.source] = true;
        tgt_used[pair.target] = true;
        pairs.push(pair);
    }

    pairs.sort_by_key(|pair| pair.source);
    pairs
}

fn is_monotonic(pairs: &[Pair]) -> bool {
    pairs.windows(2).all(|w| w[0].target < w[1].target)
}

/// Length-weighted share of both sides covered by matched pairs, ×100.
fn permutation_score(src: &[String], tgt: &[String], pairs: &[Pair]) -> f64 {
    let total: usize = src
        .iter()
        .chain(tgt)
        .map(|p| p.chars().count())
        .sum();
    if total == 0 {
        return 100.0;
    }
    let covered: f64 = pairs
        .iter()
        .map(|pair| {
            let weight = src[pair.source].chars().count() + tgt[pair.target].chars().count();
            pair.score * weight as f64
        })
        .sum();
    to_percent(covered / total as f64)
}

fn same_multiset(src: &[String], tgt: &[String]) -> bool {
    if src.len() != tgt.len() {
        return false;
    }
    let mut a: Vec<&String> = src.iter().collect();
    let mut b: Vec<&String> = tgt.iter().collect();
    a.sort();
    b.sort();
    a == b
}

fn fold_joined<S: AsRef<str>>(paragraphs: &[S]) -> String {
    paragraphs
        .iter()
        .map(|p| p.as_ref().trim())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn to_percent(ratio: f64) -> f64 {
    (ratio * 100.0).clamp(0.0, 100.0)
}
