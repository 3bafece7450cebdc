use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, de};

use crate::preprocess::{preprocess, word_count};

/// Fixed classification attached to every article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize)]
pub enum Category {
    Administrative,
    Infrastructure,
    Rights,
    Environmental,
    Interpretation,
    Operation,
    #[default]
    Other,
}

/// Title keywords per category, checked in declaration order.
const TITLE_PATTERNS: &[(Category, &[&str])] = &[
    (
        Category::Administrative,
        &[
            "citation",
            "commencement",
            "certification",
            "transfer",
            "benefit",
            "consent",
            "incorporation",
            "enforcement",
            "appeals",
            "procedure",
        ],
    ),
    (
        Category::Infrastructure,
        &[
            "construction",
            "maintenance",
            "works",
            "bridge",
            "tunnel",
            "railway",
            "highway",
            "street",
            "road",
            "access",
        ],
    ),
    (
        Category::Rights,
        &[
            "compulsory acquisition",
            "rights",
            "powers",
            "authority",
            "stopping up",
            "closure",
            "suspension",
            "restrictions",
            "prohibition",
        ],
    ),
    (
        Category::Environmental,
        &[
            "trees",
            "hedgerow",
            "conservation",
            "drainage",
            "water",
            "marine",
            "survey",
            "investigation",
            "environmental",
            "protection",
        ],
    ),
    (
        Category::Interpretation,
        &["interpret", "meaning", "definition"],
    ),
    (
        Category::Operation,
        &["operation", "use", "generating", "operational"],
    ),
];

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Administrative,
        Category::Infrastructure,
        Category::Rights,
        Category::Environmental,
        Category::Interpretation,
        Category::Operation,
        Category::Other,
    ];

    /// Classify an article title by keyword.
    ///
    /// The first category with a keyword contained in the lowercased title
    /// wins; titles with no keyword fall back to [`Category::Other`].
    pub fn from_title(title: &str) -> Self {
        let lower = title.to_lowercase();
        TITLE_PATTERNS
            .iter()
            .find(|(_, patterns)| patterns.iter().any(|p| lower.contains(p)))
            .map_or(Category::Other, |(category, _)| *category)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Administrative => "Administrative",
            Category::Infrastructure => "Infrastructure",
            Category::Rights => "Rights",
            Category::Environmental => "Environmental",
            Category::Interpretation => "Interpretation",
            Category::Operation => "Operation",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a category name is not one of [`Category::ALL`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown category `{}`", self.0)
    }
}

impl std::error::Error for UnknownCategory {}

/// Category names deserialize through [`FromStr`], so stored corpora and
/// command-line flags accept the same spellings.
impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(de::Error::custom)
    }
}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// A legal instrument grouping many articles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub year: Option<i32>,
}

/// One numbered article of an order with its preprocessed paragraphs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub id: i64,
    pub number: String,
    pub title: String,
    #[serde(default)]
    pub category: Category,
    pub word_count: usize,
    pub paragraphs: Vec<String>,
    pub order: Order,
    #[serde(default)]
    pub url: Option<String>,
}

impl Article {
    /// Build an article from raw text, deriving paragraphs and word count.
    ///
    /// When `category` is `None` the title keyword classifier decides.
    pub fn from_text(
        id: i64,
        number: impl Into<String>,
        title: impl Into<String>,
        category: Option<Category>,
        raw_text: &str,
        order: Order,
    ) -> Self {
        let title = title.into();
        let paragraphs = preprocess(raw_text);
        let word_count = word_count(&paragraphs);
        Self {
            id,
            number: number.into(),
            category: category.unwrap_or_else(|| Category::from_title(&title)),
            title,
            word_count,
            paragraphs,
            order,
            url: None,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn first_paragraph(&self) -> &str {
        self.paragraphs.first().map_or("", String::as_str)
    }
}
