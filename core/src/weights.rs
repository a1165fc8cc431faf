//! Field importance multipliers.
//!
//! A field that has no weight is neither indexed nor matched. Weights are fixed
//! for the lifetime of an index; changing them means building a new one.

use crate::record::BookField;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum WeightError {
    /// Zero, negative, NaN or infinite weight.
    #[error("weight for field {field} must be a positive finite number, got {weight}")]
    NonPositive { field: String, weight: f64 },
    /// Table without a single field.
    #[error("field weight table is empty")]
    Empty,
}

/// Serialized as a plain JSON object. Deserializing goes through
/// [`TryFrom`], so a table read from JSON is validated like one built in code.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(bound(deserialize = "F: Deserialize<'de> + Copy + Ord + std::fmt::Debug"))]
#[serde(try_from = "BTreeMap<F, f64>")]
pub struct FieldWeights<F> {
    weights: BTreeMap<F, f64>,
}

impl<F: Copy + Ord + std::fmt::Debug> FieldWeights<F> {
    pub fn new() -> Self {
        Self { weights: BTreeMap::new() }
    }

    /// Builder form of [`FieldWeights::insert`].
    pub fn try_with(mut self, field: F, weight: f64) -> Result<Self, WeightError> {
        self.insert(field, weight)?;
        Ok(self)
    }

    pub fn insert(&mut self, field: F, weight: f64) -> Result<(), WeightError> {
        check(field, weight)?;
        self.weights.insert(field, weight);
        Ok(())
    }

    pub fn get(&self, field: F) -> Option<f64> {
        self.weights.get(&field).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (F, f64)> + '_ {
        self.weights.iter().map(|(f, w)| (*f, *w))
    }

    pub fn fields(&self) -> impl Iterator<Item = F> + '_ {
        self.weights.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Re-check every entry; used after deserializing.
    pub fn validate(&self) -> Result<(), WeightError> {
        if self.weights.is_empty() {
            return Err(WeightError::Empty);
        }
        self.iter().try_for_each(|(f, w)| check(f, w))
    }
}

impl<F: Copy + Ord + std::fmt::Debug + DeserializeOwned> FieldWeights<F> {
    /// Parse a JSON object of `field -> weight`.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("parsing field weights")
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading field weights from {}", path.display()))?;
        Self::from_json_str(&text).with_context(|| format!("in {}", path.display()))
    }
}

impl<F: Copy + Ord + std::fmt::Debug> TryFrom<BTreeMap<F, f64>> for FieldWeights<F> {
    type Error = WeightError;

    fn try_from(weights: BTreeMap<F, f64>) -> Result<Self, WeightError> {
        let weights = Self { weights };
        weights.validate()?;
        Ok(weights)
    }
}

impl<F: Serialize + Ord> Serialize for FieldWeights<F> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.weights.serialize(serializer)
    }
}

impl<F: Copy + Ord + std::fmt::Debug> FromIterator<(F, f64)> for FieldWeights<F> {
    /// Entries that are not positive and finite are skipped with a warning.
    fn from_iter<I: IntoIterator<Item = (F, f64)>>(iter: I) -> Self {
        let weights = iter
            .into_iter()
            .filter(|&(f, w)| match check(f, w) {
                Ok(()) => true,
                Err(err) => {
                    tracing::warn!(field = ?f, weight = w, "dropping field weight: {err}");
                    false
                }
            })
            .collect();
        Self { weights }
    }
}

impl<F: Copy + Ord + std::fmt::Debug> Default for FieldWeights<F>
where
    F: DefaultWeights,
{
    fn default() -> Self {
        F::default_weights().iter().copied().collect()
    }
}

/// Key types that ship with a documented weight table.
pub trait DefaultWeights: Sized + 'static {
    fn default_weights() -> &'static [(Self, f64)];
}

impl DefaultWeights for BookField {
    fn default_weights() -> &'static [(Self, f64)] {
        &[
            (BookField::Title, 3.0),
            (BookField::AuthorName, 2.0),
            (BookField::UserShelves, 1.5),
            (BookField::Description, 1.0),
            (BookField::UserReview, 1.0),
            (BookField::Id, 0.5),
            (BookField::PublicationYear, 0.5),
            (BookField::PageCount, 0.25),
        ]
    }
}

fn check<F: std::fmt::Debug>(field: F, weight: f64) -> Result<(), WeightError> {
    if weight.is_finite() && weight > 0.0 {
        Ok(())
    } else {
        Err(WeightError::NonPositive { field: format!("{field:?}"), weight })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_book_table_covers_every_field() {
        let w = FieldWeights::<BookField>::default();
        assert_eq!(w.len(), BookField::ALL.len());
        assert_eq!(w.get(BookField::Title), Some(3.0));
        assert_eq!(w.get(BookField::PageCount), Some(0.25));
    }

    #[test]
    fn rejects_non_positive_weights() {
        let err = FieldWeights::new().try_with(BookField::Title, 0.0).unwrap_err();
        assert!(matches!(err, WeightError::NonPositive { .. }));
        assert!(FieldWeights::new().try_with(BookField::Title, f64::NAN).is_err());
        assert!(FieldWeights::new().try_with(BookField::Title, -1.0).is_err());
    }

    #[test]
    fn parses_json_table() {
        let w = FieldWeights::<BookField>::from_json_str(r#"{"title": 2, "authorName": 1.5}"#)
            .unwrap();
        assert_eq!(w.len(), 2);
        assert_eq!(w.get(BookField::AuthorName), Some(1.5));
        assert_eq!(w.get(BookField::Description), None);
    }

    #[test]
    fn json_table_is_validated() {
        assert!(FieldWeights::<BookField>::from_json_str(r#"{"title": -2}"#).is_err());
        assert!(FieldWeights::<BookField>::from_json_str(r#"{}"#).is_err());
        assert!(FieldWeights::<BookField>::from_json_str(r#"{"isbn": 1}"#).is_err());
    }

    #[test]
    fn plain_deserialize_rejects_bad_weights() {
        let negative = serde_json::from_str::<FieldWeights<BookField>>(
            r#"{"title": 1, "authorName": -5}"#,
        );
        let err = negative.unwrap_err().to_string();
        assert!(err.contains("must be a positive finite number"), "{err}");
        assert!(serde_json::from_str::<FieldWeights<BookField>>(r#"{"title": 0}"#).is_err());
        assert!(serde_json::from_str::<FieldWeights<BookField>>("{}").is_err());

        let map: BTreeMap<BookField, f64> = [(BookField::Title, -1.0)].into_iter().collect();
        assert_eq!(
            FieldWeights::try_from(map),
            Err(WeightError::NonPositive { field: "Title".into(), weight: -1.0 })
        );
    }

    #[test]
    fn serializes_as_plain_object() {
        let w = FieldWeights::new()
            .try_with(BookField::Title, 3.0)
            .unwrap()
            .try_with(BookField::AuthorName, 2.0)
            .unwrap();
        let json = serde_json::to_string(&w).unwrap();
        assert_eq!(json, r#"{"title":3.0,"authorName":2.0}"#);
        assert_eq!(serde_json::from_str::<FieldWeights<BookField>>(&json).unwrap(), w);
    }

    #[test]
    fn collecting_skips_invalid_entries() {
        let w: FieldWeights<BookField> = [
            (BookField::Title, 3.0),
            (BookField::AuthorName, -2.0),
            (BookField::Description, f64::NAN),
        ]
        .into_iter()
        .collect();
        assert_eq!(w.len(), 1);
        assert_eq!(w.get(BookField::AuthorName), None);
    }
}
