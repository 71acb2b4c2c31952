//! Cosine similarity over TF-IDF rows and top-k ranking.

use std::cmp::Ordering;

use ndarray::{Array1, Array2};

use crate::types::SimilarityMatch;
use crate::vectorize::{sparse_dot, VectorSpace};

/// Similarity of row `index` against every row of the space.
///
/// Rows are L2-normalized, so the dot product is the cosine similarity. Only
/// the query row is compared; no pairwise matrix is built.
pub fn similarity_row(space: &VectorSpace, index: usize) -> Option<Array1<f64>> {
    let query = space.row(index)?;
    Some(space.rows().iter().map(|row| sparse_dot(query, row)).collect())
}

/// Full `n × n` pairwise similarity matrix, derived from the sparse rows.
pub fn similarity_matrix(space: &VectorSpace) -> Array2<f64> {
    let rows = space.rows();
    let n = rows.len();
    let mut sim = Array2::zeros((n, n));
    for i in 0..n {
        for j in i..n {
            let v = sparse_dot(&rows[i], &rows[j]);
            sim[[i, j]] = v;
            sim[[j, i]] = v;
        }
    }
    sim
}

/// Rank `scores` by similarity descending, then index ascending, skipping
/// indices for which `exclude` returns true, and keep the first `top_k`.
pub fn rank_top_k<F>(scores: &[f64], top_k: usize, exclude: F) -> Vec<SimilarityMatch>
where
    F: Fn(usize) -> bool,
{
    if top_k == 0 {
        return Vec::new();
    }

    let mut matches: Vec<SimilarityMatch> = scores
        .iter()
        .enumerate()
        .filter(|(index, _)| !exclude(*index))
        .map(|(index, &similarity)| SimilarityMatch { index, similarity })
        .collect();

    matches.sort_by(compare_matches);
    matches.truncate(top_k);
    matches
}

fn compare_matches(a: &SimilarityMatch, b: &SimilarityMatch) -> Ordering {
    b.similarity
        .total_cmp(&a.similarity)
        .then_with(|| a.index.cmp(&b.index))
}
