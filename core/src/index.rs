use crate::record::Document;
use crate::stemmer::StemAlgorithm;
use crate::tokenizer::tokenize_with;
use crate::weights::FieldWeights;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Sparse term -> weight vector.
pub type TermWeights = BTreeMap<String, f64>;

/// Corpus idf table plus one unit-length weight vector per record, aligned
/// with the record slice the index was built from. Immutable once built.
#[derive(Debug, Clone, Serialize)]
#[serde(bound(serialize = "F: Serialize + Ord"))]
pub struct Index<F> {
    algorithm: StemAlgorithm,
    field_weights: FieldWeights<F>,
    idf: BTreeMap<String, f64>,
    vectors: Vec<TermWeights>,
}

impl<F: Copy + Ord + std::fmt::Debug> Index<F> {
    /// Inverse document frequency of an already-tokenized term.
    pub fn idf(&self, term: &str) -> Option<f64> {
        self.idf.get(term).copied()
    }

    pub fn idf_table(&self) -> &BTreeMap<String, f64> {
        &self.idf
    }

    pub fn vocabulary_len(&self) -> usize {
        self.idf.len()
    }

    /// Number of indexed records.
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn vector(&self, position: usize) -> Option<&TermWeights> {
        self.vectors.get(position)
    }

    pub fn vectors(&self) -> &[TermWeights] {
        &self.vectors
    }

    pub fn algorithm(&self) -> StemAlgorithm {
        self.algorithm
    }

    pub fn field_weights(&self) -> &FieldWeights<F> {
        &self.field_weights
    }
}

/// Build an index with the Porter stemmer.
pub fn build_index<R: Document>(records: &[R], weights: &FieldWeights<R::Field>) -> Index<R::Field> {
    build_index_with(records, weights, StemAlgorithm::Porter)
}

pub fn build_index_with<R: Document>(
    records: &[R],
    weights: &FieldWeights<R::Field>,
    algorithm: StemAlgorithm,
) -> Index<R::Field> {
    // Per record, per configured field: (field weight, raw term counts).
    let per_record: Vec<Vec<(f64, BTreeMap<String, u32>)>> = records
        .iter()
        .map(|record| {
            weights
                .iter()
                .map(|(field, weight)| {
                    let text = record.field(field).to_text();
                    let mut counts: BTreeMap<String, u32> = BTreeMap::new();
                    for token in tokenize_with(&text, algorithm) {
                        *counts.entry(token).or_insert(0) += 1;
                    }
                    (weight, counts)
                })
                .collect()
        })
        .collect();

    let mut df: BTreeMap<&str, u32> = BTreeMap::new();
    for fields in &per_record {
        let seen: BTreeSet<&str> = fields
            .iter()
            .flat_map(|(_, counts)| counts.keys().map(String::as_str))
            .collect();
        for term in seen {
            *df.entry(term).or_insert(0) += 1;
        }
    }

    let n = records.len() as f64;
    let idf: BTreeMap<String, f64> = df
        .into_iter()
        .map(|(term, df_t)| (term.to_string(), (n / df_t as f64).ln()))
        .collect();

    let vectors: Vec<TermWeights> = per_record
        .iter()
        .map(|fields| {
            let mut raw = TermWeights::new();
            for (weight, counts) in fields {
                for (term, tf) in counts {
                    let idf_t = idf.get(term).copied().unwrap_or(0.0);
                    *raw.entry(term.clone()).or_insert(0.0) += *tf as f64 * idf_t * weight;
                }
            }
            normalize(&raw)
        })
        .collect();

    tracing::debug!(
        records = records.len(),
        vocabulary = idf.len(),
        stemmer = algorithm.name(),
        "built search index"
    );

    Index { algorithm, field_weights: weights.clone(), idf, vectors }
}

/// Euclidean length of a sparse vector.
pub fn magnitude(v: &TermWeights) -> f64 {
    v.values().map(|w| w * w).sum::<f64>().sqrt()
}

/// Scale to unit length. A zero vector stays all zeros.
pub fn normalize(v: &TermWeights) -> TermWeights {
    let norm = magnitude(v);
    if norm == 0.0 {
        return v.keys().map(|t| (t.clone(), 0.0)).collect();
    }
    v.iter().map(|(t, w)| (t.clone(), w / norm)).collect()
}
