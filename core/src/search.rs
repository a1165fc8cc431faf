use crate::index::{build_index_with, magnitude, Index, TermWeights};
use crate::record::Document;
use crate::stemmer::StemAlgorithm;
use crate::tokenizer::tokenize_with;
use crate::weights::FieldWeights;

/// Cosine of the angle between two sparse vectors; 0 when either is all zeros.
pub fn cosine_similarity(a: &TermWeights, b: &TermWeights) -> f64 {
    let (a_mag, b_mag) = (magnitude(a), magnitude(b));
    if a_mag == 0.0 || b_mag == 0.0 {
        return 0.0;
    }
    let dot: f64 = a
        .iter()
        .map(|(term, w)| w * b.get(term).copied().unwrap_or(0.0))
        .sum();
    dot / (a_mag * b_mag)
}

/// Raw tf x idf query vector. Terms outside the corpus vocabulary are dropped
/// and the vector is left unnormalized.
pub fn query_vector<F: Copy + Ord + std::fmt::Debug>(index: &Index<F>, query: &str) -> TermWeights {
    let mut tf = TermWeights::new();
    for token in tokenize_with(query, index.algorithm()) {
        if index.idf(&token).is_some() {
            *tf.entry(token).or_insert(0.0) += 1.0;
        }
    }
    for (term, w) in tf.iter_mut() {
        *w *= index.idf(term).unwrap_or(0.0);
    }
    tf
}

/// Similarity of every indexed record to `query`, by position. A blank query
/// scores everything 0.
pub fn scores<F: Copy + Ord + std::fmt::Debug>(index: &Index<F>, query: &str) -> Vec<f64> {
    if query.trim().is_empty() {
        return vec![0.0; index.len()];
    }
    let q = query_vector(index, query);
    index.vectors().iter().map(|v| cosine_similarity(&q, v)).collect()
}

/// Every record paired with its score, best first. Ties keep input order.
/// A blank query returns the input order unchanged.
pub fn rank<'r, R: Document>(
    records: &'r [R],
    index: &Index<R::Field>,
    query: &str,
) -> Vec<(&'r R, f64)> {
    if records.len() != index.len() {
        tracing::warn!(
            records = records.len(),
            indexed = index.len(),
            "record collection and index differ in length; unindexed records score 0"
        );
    }
    let by_position = scores(index, query);
    let mut ranked: Vec<(&R, f64)> = records
        .iter()
        .enumerate()
        .map(|(i, r)| (r, by_position.get(i).copied().unwrap_or(0.0)))
        .collect();
    if query.trim().is_empty() {
        return ranked;
    }
    // Vec::sort_by is stable.
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked
}

/// All records reordered by relevance to `query`. Nothing is dropped or copied.
pub fn search<'r, R: Document>(records: &'r [R], index: &Index<R::Field>, query: &str) -> Vec<&'r R> {
    rank(records, index, query).into_iter().map(|(r, _)| r).collect()
}

/// A record collection together with the index built from it. Replacing the
/// records rebuilds the index from scratch.
#[derive(Debug, Clone)]
pub struct Corpus<R: Document> {
    records: Vec<R>,
    index: Index<R::Field>,
}

impl<R: Document> Corpus<R> {
    pub fn new(records: Vec<R>, weights: FieldWeights<R::Field>) -> Self {
        Self::with_algorithm(records, weights, StemAlgorithm::Porter)
    }

    pub fn with_algorithm(records: Vec<R>, weights: FieldWeights<R::Field>, algorithm: StemAlgorithm) -> Self {
        let index = build_index_with(&records, &weights, algorithm);
        Self { records, index }
    }

    /// Swap in a new collection, keeping weights and stemmer.
    pub fn replace(&mut self, records: Vec<R>) {
        self.index = build_index_with(&records, self.index.field_weights(), self.index.algorithm());
        self.records = records;
    }

    pub fn search(&self, query: &str) -> Vec<&R> {
        search(&self.records, &self.index, query)
    }

    pub fn rank(&self, query: &str) -> Vec<(&R, f64)> {
        rank(&self.records, &self.index, query)
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn index(&self) -> &Index<R::Field> {
        &self.index
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
