use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use dcomatch_text::{Article, Category, Order, preprocess, word_count};

use crate::error::StoreError;

/// Read side of the article corpus.
pub trait CandidateStore {
    /// Articles whose word count lies in `min_words..=max_words`.
    fn fetch_candidates_by_word_range(
        &self,
        min_words: usize,
        max_words: usize,
    ) -> Result<Vec<Article>, StoreError>;

    /// Every article of one order, in article id order.
    fn articles_in_order(&self, order_id: i64) -> Result<Vec<Article>, StoreError>;
}

impl<T: CandidateStore + ?Sized> CandidateStore for &T {
    fn fetch_candidates_by_word_range(
        &self,
        min_words: usize,
        max_words: usize,
    ) -> Result<Vec<Article>, StoreError> {
        (**self).fetch_candidates_by_word_range(min_words, max_words)
    }

    fn articles_in_order(&self, order_id: i64) -> Result<Vec<Article>, StoreError> {
        (**self).articles_in_order(order_id)
    }
}

/// Corpus held in memory, typically loaded from a JSON file.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    articles: Vec<Article>,
}

impl MemoryStore {
    pub fn new(mut articles: Vec<Article>) -> Self {
        articles.sort_by_key(|a| a.id);
        Self { articles }
    }

    /// Parse a corpus document.
    ///
    /// Accepts `{"orders": [...], "articles": [...]}` where each article names
    /// its order by `order_id`, or a bare array of articles with embedded
    /// `order` objects. Articles may carry `paragraphs` or raw `text`;
    /// missing word counts and categories are derived.
    pub fn from_json_str(input: &str) -> Result<Self, StoreError> {
        let document: CorpusDocument =
            serde_json::from_str(input).map_err(|err| StoreError::Corpus(err.to_string()))?;

        let (orders, records) = match document {
            CorpusDocument::Bare(records) => (Vec::new(), records),
            CorpusDocument::Wrapped { orders, articles } => (orders, articles),
        };
        let orders: BTreeMap<i64, Order> = orders.into_iter().map(|o| (o.id, o)).collect();

        let articles = records
            .into_iter()
            .map(|record| record.into_article(&orders))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(articles))
    }

    pub fn from_path(path: &Path) -> Result<Self, StoreError> {
        let input = fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&input)
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn article(&self, id: i64) -> Option<&Article> {
        self.articles
            .binary_search_by_key(&id, |a| a.id)
            .ok()
            .map(|idx| &self.articles[idx])
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }
}

impl CandidateStore for MemoryStore {
    fn fetch_candidates_by_word_range(
        &self,
        min_words: usize,
        max_words: usize,
    ) -> Result<Vec<Article>, StoreError> {
        Ok(self
            .articles
            .iter()
            .filter(|a| (min_words..=max_words).contains(&a.word_count))
            .cloned()
            .collect())
    }

    fn articles_in_order(&self, order_id: i64) -> Result<Vec<Article>, StoreError> {
        Ok(self
            .articles
            .iter()
            .filter(|a| a.order.id == order_id)
            .cloned()
            .collect())
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CorpusDocument {
    Wrapped {
        #[serde(default)]
        orders: Vec<Order>,
        articles: Vec<ArticleRecord>,
    },
    Bare(Vec<ArticleRecord>),
}

#[derive(Debug, Deserialize)]
struct ArticleRecord {
    id: i64,
    #[serde(default)]
    number: String,
    title: String,
    #[serde(default)]
    category: Option<Category>,
    #[serde(default)]
    word_count: Option<usize>,
    #[serde(default)]
    paragraphs: Option<Vec<String>>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    order: Option<Order>,
    #[serde(default)]
    order_id: Option<i64>,
    #[serde(default)]
    url: Option<String>,
}

impl ArticleRecord {
    fn into_article(self, orders: &BTreeMap<i64, Order>) -> Result<Article, StoreError> {
        let order = match (self.order, self.order_id) {
            (Some(order), _) => order,
            (None, Some(order_id)) => orders.get(&order_id).cloned().ok_or_else(|| {
                StoreError::Corpus(format!(
                    "article {} references unknown order {order_id}",
                    self.id
                ))
            })?,
            (None, None) => {
                return Err(StoreError::Corpus(format!(
                    "article {} has no order",
                    self.id
                )));
            }
        };

        let paragraphs = match (self.paragraphs, self.text) {
            (Some(paragraphs), _) => paragraphs
                .iter()
                .map(|p| p.trim())
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect(),
            (None, Some(text)) => preprocess(&text),
            (None, None) => {
                return Err(StoreError::Corpus(format!(
                    "article {} has neither paragraphs nor text",
                    self.id
                )));
            }
        };

        Ok(Article {
            id: self.id,
            number: self.number,
            category: self
                .category
                .unwrap_or_else(|| Category::from_title(&self.title)),
            title: self.title,
            word_count: self.word_count.unwrap_or_else(|| word_count(&paragraphs)),
            paragraphs,
            order,
            url: self.url,
        })
    }
}
