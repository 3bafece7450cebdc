//! Similarity ranking of legal-order articles.
//!
//! A ranking pass preprocesses the source text, fetches candidates whose
//! word count falls in a band around the source, discards candidates with
//! cheap filters (category, length ratio, word overlap), scores the rest
//! with a [`Comparator`] and keeps the best match per order.
//!
//! The in-process [`EditDistanceComparator`] tolerates reordered paragraphs:
//! when paragraphs match out of order the result is flagged `reordered`
//! and scored on the alignment instead of the raw text.
//!
//! # Example
//!
//! ```rust
//! use dcomatch_rank::{EditDistanceComparator, MemoryStore, RankOptions, Ranker};
//! use dcomatch_text::{Article, Category, Order};
//!
//! let order = Order { id: 7, name: "The Example Railway Order".into(), year: Some(2021) };
//! let text = "(1) The undertaker may maintain the authorised works.\n\
//!             (2) The undertaker must not obstruct the highway.";
//! let article = Article::from_text(70, "5", "Maintenance of works", None, text, order);
//! let store = MemoryStore::new(vec![article]);
//!
//! let ranker = Ranker::new(store, EditDistanceComparator::default(), RankOptions::default())
//!     .expect("default options are valid");
//! let matches = ranker.rank(text, Some(Category::Infrastructure)).expect("rank");
//! assert_eq!(matches[0].order_id, 7);
//! assert_eq!(matches[0].similarity, 100.0);
//! ```

mod compare;
mod config;
mod error;
mod filter;
mod model;
mod ranker;
mod report;
mod store;
mod worker;

pub use compare::{Comparator, EditDistanceComparator, align, in_order_similarity};
pub use config::{AlignOptions, BandMultipliers, RankOptions, RatioRange, WordBand, WordBands};
pub use error::{ComparisonError, RankError, StoreError};
pub use filter::{TextProfile, evaluate_candidate};
pub use model::{
    ArticleScan, Comparison, FilterVerdict, RankReport, RankStats, SimilarityMatch, SkipCounts,
    SkipReason,
};
pub use ranker::{CancelToken, Ranker, best_per_order};
pub use report::{format_markdown_report, format_scan_report};
pub use store::{CandidateStore, MemoryStore};
pub use worker::{DEFAULT_WORKER_TIMEOUT, ProcessComparator};
