use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use rayon::prelude::*;
use tracing::{debug, info, warn};

use dcomatch_text::{Article, Category, preprocess};

use crate::compare::Comparator;
use crate::config::{RankOptions, WordBand};
use crate::error::RankError;
use crate::filter::{TextProfile, evaluate_candidate};
use crate::model::{
    ArticleScan, Comparison, FilterVerdict, RankReport, RankStats, SimilarityMatch, SkipReason,
};
use crate::store::CandidateStore;

/// Cooperative cancellation flag shared between a caller and a pass.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Debug)]
enum Outcome {
    Matched {
        article_idx: usize,
        comparison: Comparison,
        exact: bool,
        forced: bool,
    },
    Skipped(SkipReason),
    Failed,
    NotEvaluated,
    Cancelled,
}

struct Pass<'a> {
    source: &'a TextProfile,
    category: Option<Category>,
    band: WordBand,
    exclude_order: Option<i64>,
    started: Instant,
    budget: Option<Duration>,
    cancel: &'a CancelToken,
}

/// Ranks corpus articles by similarity to a source text.
#[derive(Debug, Clone)]
pub struct Ranker<S, C> {
    store: S,
    comparator: C,
    options: RankOptions,
}

impl<S: CandidateStore, C: Comparator> Ranker<S, C> {
    pub fn new(store: S, comparator: C, options: RankOptions) -> Result<Self, RankError> {
        options.validate()?;
        Ok(Self {
            store,
            comparator,
            options,
        })
    }

    pub fn options(&self) -> &RankOptions {
        &self.options
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Best match per order, most similar first.
    pub fn rank(
        &self,
        source_text: &str,
        category: Option<Category>,
    ) -> Result<Vec<SimilarityMatch>, RankError> {
        self.rank_with_report(source_text, category, &CancelToken::new())
            .map(|report| report.matches)
    }

    pub fn rank_with_report(
        &self,
        source_text: &str,
        category: Option<Category>,
        cancel: &CancelToken,
    ) -> Result<RankReport, RankError> {
        let paragraphs = preprocess(source_text);
        if paragraphs.is_empty() {
            return Err(RankError::Validation { field: "text" });
        }
        self.run(&TextProfile::new(&paragraphs), category, None, cancel)
    }

    /// Rank a loaded article against every other order, using its own
    /// category as the hint.
    pub fn rank_article(
        &self,
        article: &Article,
        cancel: &CancelToken,
    ) -> Result<RankReport, RankError> {
        let profile = TextProfile::new(&article.paragraphs);
        if profile.is_empty() {
            return Err(RankError::Validation { field: "paragraphs" });
        }
        self.run(
            &profile,
            Some(article.category),
            Some(article.order.id),
            cancel,
        )
    }

    /// Rank every article of one order and flag those with no match.
    pub fn scan_order(
        &self,
        order_id: i64,
        cancel: &CancelToken,
    ) -> Result<Vec<ArticleScan>, RankError> {
        let articles = self.store.articles_in_order(order_id)?;
        let mut scans = Vec::with_capacity(articles.len());
        for article in &articles {
            if cancel.is_cancelled() {
                return Err(RankError::Cancelled);
            }
            if article.paragraphs.is_empty() {
                debug!(article_id = article.id, "scan_skipped_empty_article");
                continue;
            }
            let report = self.rank_article(article, cancel)?;
            scans.push(ArticleScan {
                article_id: article.id,
                article_number: article.number.clone(),
                article_title: article.title.clone(),
                novel: report.matches.is_empty(),
                matches: report.matches,
            });
        }
        info!(
            order_id,
            articles = scans.len(),
            novel = scans.iter().filter(|s| s.novel).count(),
            "scan_complete"
        );
        Ok(scans)
    }

    fn run(
        &self,
        source: &TextProfile,
        category: Option<Category>,
        exclude_order: Option<i64>,
        cancel: &CancelToken,
    ) -> Result<RankReport, RankError> {
        let started = Instant::now();
        let band = self.options.bands.band_for(source.word_count);

        let mut candidates = self
            .store
            .fetch_candidates_by_word_range(band.min, band.max)
            .inspect_err(|err| warn!(error = %err, "candidate_fetch_failed"))?;
        order_candidates(&mut candidates, category, source.word_count);

        let pass = Pass {
            source,
            category,
            band,
            exclude_order,
            started,
            budget: self.options.pass_budget_ms.map(Duration::from_millis),
            cancel,
        };
        let (comparator, options) = (&self.comparator, &self.options);
        let outcomes: Vec<Outcome> = if options.parallel {
            candidates
                .par_iter()
                .enumerate()
                .map(|(idx, candidate)| evaluate(comparator, options, &pass, idx, candidate))
                .collect()
        } else {
            let mut outcomes = Vec::with_capacity(candidates.len());
            for (idx, candidate) in candidates.iter().enumerate() {
                let outcome = evaluate(comparator, options, &pass, idx, candidate);
                let stop = matches!(outcome, Outcome::Cancelled);
                outcomes.push(outcome);
                if stop {
                    break;
                }
            }
            outcomes
        };

        let mut stats = RankStats {
            fetched: candidates.len(),
            ..RankStats::default()
        };
        let mut matches = Vec::new();
        for outcome in outcomes {
            match outcome {
                Outcome::Matched {
                    article_idx,
                    comparison,
                    exact,
                    forced,
                } => {
                    if exact {
                        stats.exact_matches += 1;
                    } else {
                        stats.compared += 1;
                    }
                    if forced {
                        stats.forced += 1;
                    }
                    matches.push(SimilarityMatch::from_article(
                        &candidates[article_idx],
                        comparison,
                    ));
                }
                Outcome::Skipped(reason) => {
                    if reason == SkipReason::BelowThreshold {
                        stats.compared += 1;
                    }
                    stats.skipped.record(reason);
                }
                Outcome::Failed => {
                    stats.compared += 1;
                    stats.comparison_failures += 1;
                }
                Outcome::NotEvaluated => stats.not_evaluated += 1,
                Outcome::Cancelled => {
                    info!(fetched = stats.fetched, "rank_cancelled");
                    return Err(RankError::Cancelled);
                }
            }
        }

        if stats.not_evaluated > 0 {
            warn!(
                budget_ms = self.options.pass_budget_ms,
                not_evaluated = stats.not_evaluated,
                "pass_budget_exhausted"
            );
        }

        let matches = best_per_order(matches);
        stats.elapsed_micros = started.elapsed().as_micros() as u64;
        info!(
            word_count = source.word_count,
            band_min = band.min,
            band_max = band.max,
            fetched = stats.fetched,
            compared = stats.compared,
            exact = stats.exact_matches,
            skipped = stats.skipped.total(),
            failures = stats.comparison_failures,
            matches = matches.len(),
            elapsed_micros = stats.elapsed_micros,
            "rank_complete"
        );

        Ok(RankReport {
            word_count: source.word_count,
            band,
            matches,
            stats,
        })
    }
}

fn evaluate<C: Comparator>(
    comparator: &C,
    options: &RankOptions,
    pass: &Pass<'_>,
    idx: usize,
    candidate: &Article,
) -> Outcome {
    if pass.cancel.is_cancelled() {
        return Outcome::Cancelled;
    }
    if pass
        .budget
        .is_some_and(|budget| pass.started.elapsed() >= budget)
    {
        return Outcome::NotEvaluated;
    }
    if pass.exclude_order == Some(candidate.order.id) {
        return Outcome::Skipped(SkipReason::SameOrder);
    }

    let profile = TextProfile::new(&candidate.paragraphs);
    let verdict = evaluate_candidate(
        pass.source,
        pass.category,
        &pass.band,
        candidate,
        &profile,
        options,
    );
    let forced = match verdict {
        FilterVerdict::Skip(reason) => {
            debug!(article_id = candidate.id, reason = %reason, "candidate_skipped");
            return Outcome::Skipped(reason);
        }
        FilterVerdict::Exact => {
            return Outcome::Matched {
                article_idx: idx,
                comparison: Comparison::IDENTICAL,
                exact: true,
                forced: false,
            };
        }
        FilterVerdict::Compare { forced } => forced,
    };

    match comparator.compare(&pass.source.paragraphs, &profile.paragraphs) {
        Ok(comparison) if forced || comparison.similarity > options.min_similarity => {
            Outcome::Matched {
                article_idx: idx,
                comparison,
                exact: false,
                forced,
            }
        }
        Ok(comparison) => {
            debug!(
                article_id = candidate.id,
                similarity = comparison.similarity,
                reason = %SkipReason::BelowThreshold,
                "candidate_skipped"
            );
            Outcome::Skipped(SkipReason::BelowThreshold)
        }
        Err(err) => {
            warn!(article_id = candidate.id, error = %err, "comparison_failed");
            Outcome::Failed
        }
    }
}

/// Matching category first, then closest word count, then article id.
fn order_candidates(candidates: &mut [Article], category: Option<Category>, word_count: usize) {
    let preferred = category.unwrap_or_default();
    candidates.sort_by_key(|a| (a.category != preferred, a.word_count.abs_diff(word_count), a.id));
}

/// Keep the best match per order, drop zero scores, sort most similar
/// first with order id breaking ties.
pub fn best_per_order(matches: impl IntoIterator<Item = SimilarityMatch>) -> Vec<SimilarityMatch> {
    let mut best: BTreeMap<i64, SimilarityMatch> = BTreeMap::new();
    for candidate in matches {
        match best.get(&candidate.order_id) {
            Some(current) if candidate.similarity <= current.similarity => {}
            _ => {
                best.insert(candidate.order_id, candidate);
            }
        }
    }

    let mut ranked: Vec<SimilarityMatch> = best
        .into_values()
        .filter(|m| m.similarity > 0.0)
        .collect();
    ranked.sort_by(|a, b| {
        b.similarity
            .total_cmp(&a.similarity)
            .then(a.order_id.cmp(&b.order_id))
    });
    ranked
}
