//! Content-based product recommendations over catalog tag text.
//!
//! The vector space is rebuilt from the full catalog for every query made
//! through [`Recommender`]; nothing is cached between calls.

use std::sync::Arc;
use std::time::Instant;

use crate::catalog::Catalog;
use crate::similarity::{rank_top_k, similarity_row};
use crate::types::{RecommendOutcome, RecommendationResult, RecommendedItem};
use crate::vectorize::{TfidfVectorizer, VectorSpace};

/// Default number of recommendations.
pub const DEFAULT_TOP_N: usize = 10;

/// Clamp a caller-supplied count to a usable `top_n`. Negative values become 0.
pub fn clamp_top_n(top_n: i64) -> usize {
    usize::try_from(top_n.max(0)).unwrap_or(usize::MAX)
}

/// Build the TF-IDF vector space for every row of the catalog, in order.
pub fn build_model(catalog: &Catalog) -> VectorSpace {
    TfidfVectorizer::new().fit_transform(catalog.tags())
}

/// Classify a query without ranking anything.
pub fn outcome(catalog: &Catalog, item_name: &str) -> RecommendOutcome {
    if catalog.is_empty() {
        RecommendOutcome::EmptyCatalog
    } else if catalog.position(item_name).is_none() {
        RecommendOutcome::ItemNotFound
    } else {
        RecommendOutcome::Found
    }
}

/// The `top_n` catalog rows most similar to the first row named `item_name`.
///
/// Rows sharing the query's name are never returned. Unknown names, an empty
/// catalog, and `top_n == 0` all yield an empty result.
pub fn recommend(
    catalog: &Catalog,
    space: &VectorSpace,
    item_name: &str,
    top_n: usize,
) -> RecommendationResult {
    let Some(query) = catalog.position(item_name) else {
        return Vec::new();
    };
    let Some(scores) = similarity_row(space, query) else {
        tracing::warn!(
            "Vector space has {} rows but catalog has {}; rebuild the model",
            space.n_docs(),
            catalog.len()
        );
        return Vec::new();
    };

    let scores = scores.to_vec();
    rank_top_k(&scores, top_n, |j| {
        j == query || catalog.get(j).is_some_and(|item| item.name == item_name)
    })
    .into_iter()
    .filter_map(|m| {
        catalog
            .get(m.index)
            .map(|item| RecommendedItem::from_item(m.index, item, m.similarity))
    })
    .collect()
}

/// Owns a catalog snapshot and answers recommendation queries against it.
#[derive(Debug, Clone)]
pub struct Recommender {
    catalog: Arc<Catalog>,
}

impl Recommender {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Rebuild the vector space and rank the catalog against `item_name`.
    pub fn recommend(&self, item_name: &str, top_n: usize) -> RecommendationResult {
        let start = Instant::now();

        if self.catalog.position(item_name).is_none() || top_n == 0 {
            tracing::debug!(
                "No recommendations for '{item_name}' ({:?})",
                outcome(&self.catalog, item_name)
            );
            return Vec::new();
        }

        let space = build_model(&self.catalog);
        let results = recommend(&self.catalog, &space, item_name, top_n);

        tracing::debug!(
            "Recommended {} of {} products for '{item_name}' over {} terms in {:?}",
            results.len(),
            self.catalog.len(),
            space.n_terms(),
            start.elapsed()
        );
        results
    }

    pub fn outcome(&self, item_name: &str) -> RecommendOutcome {
        outcome(&self.catalog, item_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CatalogItem;

    fn catalog(rows: &[(&str, &str)]) -> Catalog {
        Catalog::new(
            rows.iter()
                .map(|(name, tags)| CatalogItem::new(*name, *tags))
                .collect(),
        )
    }

    fn names(result: &RecommendationResult) -> Vec<&str> {
        result.iter().map(|r| r.name.as_str()).collect()
    }

    fn abc() -> Catalog {
        catalog(&[
            ("A", "red shoe running"),
            ("B", "red shoe running"),
            ("C", "blue hat winter"),
        ])
    }

    #[test]
    fn test_identical_tags_rank_first() {
        let c = abc();
        let space = build_model(&c);
        let result = recommend(&c, &space, "A", 2);
        assert_eq!(names(&result), vec!["B", "C"]);
        assert!((result[0].similarity - 1.0).abs() < 1e-12);
        assert_eq!(result[1].similarity, 0.0);
    }

    #[test]
    fn test_empty_catalog() {
        let c = Catalog::default();
        let space = build_model(&c);
        assert!(recommend(&c, &space, "A", 5).is_empty());
        assert_eq!(outcome(&c, "A"), RecommendOutcome::EmptyCatalog);
    }

    #[test]
    fn test_unknown_name() {
        let c = abc();
        let space = build_model(&c);
        assert!(recommend(&c, &space, "Z", 10).is_empty());
        assert_eq!(outcome(&c, "Z"), RecommendOutcome::ItemNotFound);
        assert_eq!(outcome(&c, "A"), RecommendOutcome::Found);
    }

    #[test]
    fn test_top_n_zero() {
        let c = abc();
        let space = build_model(&c);
        assert!(recommend(&c, &space, "A", 0).is_empty());
    }

    #[test]
    fn test_query_never_in_result() {
        let c = catalog(&[
            ("A", "red shoe"),
            ("B", "blue shoe"),
            ("C", "red hat"),
            ("D", "green scarf"),
        ]);
        let space = build_model(&c);
        for item in c.iter() {
            let result = recommend(&c, &space, &item.name, 100);
            assert!(result.iter().all(|r| r.name != item.name));
            assert_eq!(result.len(), c.len() - 1);
        }
    }

    #[test]
    fn test_duplicate_names_excluded() {
        let c = catalog(&[
            ("A", "red shoe"),
            ("B", "red shoe"),
            ("A", "red shoe"),
            ("C", "blue hat"),
        ]);
        let space = build_model(&c);
        let result = recommend(&c, &space, "A", 10);
        // |C| - 1 minus the one other row also named "A"
        assert_eq!(names(&result), vec!["B", "C"]);
    }

    #[test]
    fn test_tie_break_by_index() {
        let c = catalog(&[
            ("Q", "red shoe"),
            ("X", "red hat"),
            ("Y", "red hat"),
            ("Z", "red hat"),
        ]);
        let space = build_model(&c);
        let result = recommend(&c, &space, "Q", 3);
        assert_eq!(names(&result), vec!["X", "Y", "Z"]);
        assert_eq!(result[0].similarity, result[1].similarity);
    }

    #[test]
    fn test_deterministic() {
        let c = catalog(&[
            ("A", "red shoe running sport"),
            ("B", "red shoe"),
            ("C", "running sport watch"),
            ("D", "blue hat"),
        ]);
        let r = Recommender::new(Arc::new(c));
        let first = r.recommend("A", 3);
        let second = r.recommend("A", 3);
        assert_eq!(first, second);
        let bits = |v: &RecommendationResult| {
            v.iter().map(|x| x.similarity.to_bits()).collect::<Vec<_>>()
        };
        assert_eq!(bits(&first), bits(&second));
    }

    #[test]
    fn test_display_attributes_passed_through() {
        let mut a = CatalogItem::new("A", "lipstick matte red");
        a.brand = "Glow".into();
        let mut b = CatalogItem::new("B", "lipstick gloss red");
        b.brand = "Shine".into();
        b.image_url = "http://img/b.png".into();
        b.rating = Some(4.5);
        b.review_count = Some(120.0);
        let c = Catalog::new(vec![a, b]);
        let result = Recommender::new(Arc::new(c)).recommend("A", 10);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].brand, "Shine");
        assert_eq!(result[0].image_url, "http://img/b.png");
        assert_eq!(result[0].rating, Some(4.5));
        assert_eq!(result[0].review_count, Some(120.0));
        assert_eq!(result[0].index, 1);
    }

    #[test]
    fn test_top_n_larger_than_catalog() {
        let c = abc();
        let result = Recommender::new(Arc::new(c)).recommend("C", 50);
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_clamp_top_n() {
        assert_eq!(clamp_top_n(-3), 0);
        assert_eq!(clamp_top_n(0), 0);
        assert_eq!(clamp_top_n(7), 7);
    }

    #[test]
    fn test_large_catalog_query() {
        let items: Vec<CatalogItem> = (0..3000)
            .map(|i| CatalogItem::new(format!("P{i}"), format!("tag{i}a tag{i}b tag{i}c shared")))
            .collect();
        let c = Catalog::new(items);
        let space = build_model(&c);
        assert_eq!(space.nnz(), 12000);

        let result = recommend(&c, &space, "P0", 3);
        assert_eq!(names(&result), vec!["P1", "P2", "P3"]);
        assert!(result[0].similarity > 0.0 && result[0].similarity < 1.0);
    }
}
