//! TF-IDF vectorization of product tag text.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use ndarray::{Array1, ArrayView1};

use crate::stopwords::StopWords;

/// Minimum token length in characters.
const MIN_TOKEN_CHARS: usize = 2;

/// Splits lowercased text into runs of word characters (letters, digits, `_`)
/// of at least two characters, dropping stop words.
#[derive(Debug, Clone, Default)]
pub struct Tokenizer {
    stop_words: StopWords,
}

impl Tokenizer {
    pub fn new(stop_words: StopWords) -> Self {
        Self { stop_words }
    }

    pub fn tokenize(&self, text: &str) -> Vec<String> {
        text.to_lowercase()
            .split(|c: char| !is_word_char(c))
            .filter(|t| t.chars().count() >= MIN_TOKEN_CHARS)
            .filter(|t| !self.stop_words.contains(t))
            .map(str::to_string)
            .collect()
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// A sparse TF-IDF row: `(column, weight)` pairs in ascending column order.
pub type SparseRow = Vec<(usize, f64)>;

/// Vocabulary, IDF weights, and one L2-normalized TF-IDF row per document.
///
/// Rows store only their nonzero weights.
#[derive(Debug, Clone)]
pub struct VectorSpace {
    vocabulary: BTreeMap<String, usize>,
    idf: Array1<f64>,
    rows: Vec<SparseRow>,
}

impl VectorSpace {
    /// A space with no documents and no terms.
    pub fn empty() -> Self {
        Self {
            vocabulary: BTreeMap::new(),
            idf: Array1::zeros(0),
            rows: Vec::new(),
        }
    }

    /// Number of document rows.
    pub fn n_docs(&self) -> usize {
        self.rows.len()
    }

    /// Number of vocabulary terms.
    pub fn n_terms(&self) -> usize {
        self.vocabulary.len()
    }

    /// Number of stored nonzero weights across all rows.
    pub fn nnz(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    /// Term to column index; columns follow lexicographic term order.
    pub fn vocabulary(&self) -> &BTreeMap<String, usize> {
        &self.vocabulary
    }

    pub fn term_index(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }

    pub fn idf(&self) -> ArrayView1<'_, f64> {
        self.idf.view()
    }

    pub fn rows(&self) -> &[SparseRow] {
        &self.rows
    }

    /// Sparse TF-IDF row of document `index`, if present.
    pub fn row(&self, index: usize) -> Option<&[(usize, f64)]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// Weight at column `col` of row `index`; zero when absent.
    pub fn weight(&self, index: usize, col: usize) -> f64 {
        self.row(index)
            .and_then(|row| {
                row.binary_search_by_key(&col, |&(c, _)| c)
                    .ok()
                    .map(|pos| row[pos].1)
            })
            .unwrap_or(0.0)
    }

    /// Row `index` expanded to a dense vector over the vocabulary.
    pub fn dense_row(&self, index: usize) -> Option<Array1<f64>> {
        let row = self.row(index)?;
        let mut dense = Array1::zeros(self.n_terms());
        for &(col, w) in row {
            dense[col] = w;
        }
        Some(dense)
    }
}

/// Dot product of two sparse rows sorted by column.
pub fn sparse_dot(a: &[(usize, f64)], b: &[(usize, f64)]) -> f64 {
    let (mut i, mut j) = (0, 0);
    let mut dot = 0.0;
    while i < a.len() && j < b.len() {
        match a[i].0.cmp(&b[j].0) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                dot += a[i].1 * b[j].1;
                i += 1;
                j += 1;
            }
        }
    }
    dot
}

/// Builds a [`VectorSpace`] from a corpus of documents.
#[derive(Debug, Clone, Default)]
pub struct TfidfVectorizer {
    tokenizer: Tokenizer,
}

impl TfidfVectorizer {
    /// Vectorizer with the English stop word list.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stop_words(mut self, stop_words: StopWords) -> Self {
        self.tokenizer = Tokenizer::new(stop_words);
        self
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    /// Learn the vocabulary and IDF from `documents` and return their weighted rows.
    ///
    /// IDF is smoothed: `ln((1 + n) / (1 + df)) + 1`. Rows with no vocabulary
    /// terms stay zero.
    pub fn fit_transform<I, S>(&self, documents: I) -> VectorSpace
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tokenized: Vec<Vec<String>> = documents
            .into_iter()
            .map(|d| self.tokenizer.tokenize(d.as_ref()))
            .collect();

        let n_docs = tokenized.len();
        if n_docs == 0 {
            return VectorSpace::empty();
        }

        let mut vocabulary: BTreeMap<String, usize> = tokenized
            .iter()
            .flatten()
            .map(|t| (t.clone(), 0))
            .collect();
        for (col, slot) in vocabulary.values_mut().enumerate() {
            *slot = col;
        }

        let counts: Vec<BTreeMap<usize, f64>> = tokenized
            .iter()
            .map(|tokens| {
                let mut row = BTreeMap::new();
                for token in tokens {
                    if let Some(&col) = vocabulary.get(token) {
                        *row.entry(col).or_insert(0.0) += 1.0;
                    }
                }
                row
            })
            .collect();

        let mut df = vec![0usize; vocabulary.len()];
        for row in &counts {
            for &col in row.keys() {
                df[col] += 1;
            }
        }

        let n = n_docs as f64;
        let idf: Array1<f64> = df
            .iter()
            .map(|&count| ((1.0 + n) / (1.0 + count as f64)).ln() + 1.0)
            .collect();

        let rows = counts
            .into_iter()
            .map(|row| {
                let mut weighted: SparseRow =
                    row.into_iter().map(|(col, tf)| (col, tf * idf[col])).collect();
                let norm = weighted.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
                if norm > 0.0 {
                    for (_, w) in &mut weighted {
                        *w /= norm;
                    }
                }
                weighted
            })
            .collect();

        VectorSpace {
            vocabulary,
            idf,
            rows,
        }
    }
}
