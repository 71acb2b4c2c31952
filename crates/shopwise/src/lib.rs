//! Shopwise: core storefront library: product catalog, TF-IDF content recommendations, and user records.

pub mod catalog;
pub mod display;
pub mod recommend;
pub mod similarity;
pub mod stopwords;
pub mod types;
pub mod users;
pub mod vectorize;

pub use catalog::Catalog;
pub use display::{
    trending_listing, truncate, FixedImageProvider, FixedPriceProvider, ImageProvider,
    PriceProvider, RandomImageProvider, RandomPriceProvider, TrendingListing, TrendingProduct,
    TRENDING_LIMIT,
};
pub use recommend::{build_model, clamp_top_n, recommend, Recommender, DEFAULT_TOP_N};
pub use similarity::{rank_top_k, similarity_matrix, similarity_row};
pub use stopwords::StopWords;
pub use users::{MemoryUserStore, SqliteUserStore, UserStore};
pub use vectorize::{sparse_dot, SparseRow, TfidfVectorizer, Tokenizer, VectorSpace};
pub use types::*;
