//! In-memory full-text search over small record collections.
//!
//! Records are tokenized per configured field, weighted by tf x idf x field
//! weight, normalized to unit length, and ranked against a query by cosine
//! similarity. Everything here is pure and synchronous; an [`Index`] is built
//! once per collection and shared read-only afterwards.

pub mod dataset;
pub mod index;
pub mod record;
pub mod search;
pub mod stemmer;
pub mod tokenizer;
pub mod weights;

pub use index::{build_index, build_index_with, magnitude, normalize, Index, TermWeights};
pub use record::{Book, BookField, Document, FieldValue};
pub use search::{cosine_similarity, query_vector, rank, scores, search, Corpus};
pub use stemmer::StemAlgorithm;
pub use weights::{DefaultWeights, FieldWeights, WeightError};
