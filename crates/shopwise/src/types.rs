//! Core data types for the product catalog, recommendations, and user records.

use serde::{Deserialize, Serialize};

/// A single product row of the catalog.
///
/// Column names follow the catalog CSV header
/// (`Name, ReviewCount, Brand, ImageURL, Rating, Tags`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "ReviewCount", default, deserialize_with = "csv::invalid_option")]
    pub review_count: Option<f64>,
    #[serde(rename = "Brand", default)]
    pub brand: String,
    #[serde(rename = "ImageURL", default)]
    pub image_url: String,
    #[serde(rename = "Rating", default, deserialize_with = "csv::invalid_option")]
    pub rating: Option<f64>,
    #[serde(rename = "Tags", default)]
    pub tags: String,
}

impl CatalogItem {
    /// Build an item with only a name and tag text. Display attributes are left empty.
    pub fn new(name: impl Into<String>, tags: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            review_count: None,
            brand: String::new(),
            image_url: String::new(),
            rating: None,
            tags: tags.into(),
        }
    }
}

/// A ranked recommendation: the display attributes of a catalog row plus its score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendedItem {
    pub index: usize,
    pub name: String,
    pub review_count: Option<f64>,
    pub brand: String,
    pub image_url: String,
    pub rating: Option<f64>,
    pub similarity: f64,
}

impl RecommendedItem {
    pub(crate) fn from_item(index: usize, item: &CatalogItem, similarity: f64) -> Self {
        Self {
            index,
            name: item.name.clone(),
            review_count: item.review_count,
            brand: item.brand.clone(),
            image_url: item.image_url.clone(),
            rating: item.rating,
            similarity,
        }
    }
}

/// Ordered top-k recommendations. Empty when the product is unknown or the catalog is empty.
pub type RecommendationResult = Vec<RecommendedItem>;

/// A similarity match against a catalog row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimilarityMatch {
    pub index: usize,
    pub similarity: f64,
}

/// Why a recommendation query produced what it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendOutcome {
    Found,
    ItemNotFound,
    EmptyCatalog,
}

/// A signup form submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupRecord {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// A signin form submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SigninRecord {
    pub username: String,
    pub password: String,
}

/// A persisted signup row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredSignup {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub created_at: String,
}

/// Errors that can occur in the shop library.
#[derive(thiserror::Error, Debug)]
pub enum ShopError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Store error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("Catalog not found: {0}")]
    CatalogNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Convenience result type.
pub type ShopResult<T> = Result<T, ShopError>;
