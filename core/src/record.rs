use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt::Debug;

/// A scalar read out of a record field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Number(f64),
    Missing,
}

impl<'a> FieldValue<'a> {
    /// Stringify for indexing. Missing and non-finite values become `""`.
    pub fn to_text(&self) -> Cow<'a, str> {
        match *self {
            FieldValue::Text(s) => Cow::Borrowed(s),
            FieldValue::Number(n) if !n.is_finite() => Cow::Borrowed(""),
            FieldValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                Cow::Owned(format!("{}", n as i64))
            }
            FieldValue::Number(n) => Cow::Owned(n.to_string()),
            FieldValue::Missing => Cow::Borrowed(""),
        }
    }
}

impl<'a> From<&'a str> for FieldValue<'a> {
    fn from(s: &'a str) -> Self {
        FieldValue::Text(s)
    }
}

impl<'a> From<&'a String> for FieldValue<'a> {
    fn from(s: &'a String) -> Self {
        FieldValue::Text(s.as_str())
    }
}

impl<'a, T: Into<FieldValue<'a>>> From<Option<T>> for FieldValue<'a> {
    fn from(v: Option<T>) -> Self {
        v.map_or(FieldValue::Missing, Into::into)
    }
}

macro_rules! number_field_value {
    ($($t:ty),*) => {
        $(impl From<$t> for FieldValue<'_> {
            fn from(n: $t) -> Self {
                FieldValue::Number(n as f64)
            }
        })*
    };
}

number_field_value!(u32, i32, u64, i64, f32, f64);

/// A record the index can read. Fields are addressed through a closed key type
/// so weight tables are checked at compile time.
pub trait Document {
    type Field: Copy + Ord + Debug;

    fn field(&self, field: Self::Field) -> FieldValue<'_>;
}

/// Searchable columns of a [`Book`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BookField {
    Title,
    Id,
    Description,
    PageCount,
    AuthorName,
    UserShelves,
    UserReview,
    PublicationYear,
}

impl BookField {
    pub const ALL: [BookField; 8] = [
        BookField::Title,
        BookField::Id,
        BookField::Description,
        BookField::PageCount,
        BookField::AuthorName,
        BookField::UserShelves,
        BookField::UserReview,
        BookField::PublicationYear,
    ];
}

/// One shelf entry of a reading-list export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Book {
    pub id: String,
    pub title: String,
    pub link: String,
    pub image_url: String,
    /// May contain HTML markup; tags are stripped at tokenization.
    pub description: String,
    pub page_count: Option<u32>,
    pub author_name: String,
    pub user_rating: Option<f32>,
    pub average_rating: Option<f32>,
    /// Comma-separated shelf names, e.g. `read, sci-fi`.
    pub user_shelves: String,
    pub user_review: String,
    pub publication_year: Option<i32>,
    pub date_added: Option<String>,
}

impl Document for Book {
    type Field = BookField;

    fn field(&self, field: BookField) -> FieldValue<'_> {
        match field {
            BookField::Title => (&self.title).into(),
            BookField::Id => (&self.id).into(),
            BookField::Description => (&self.description).into(),
            BookField::PageCount => self.page_count.into(),
            BookField::AuthorName => (&self.author_name).into(),
            BookField::UserShelves => (&self.user_shelves).into(),
            BookField::UserReview => (&self.user_review).into(),
            BookField::PublicationYear => self.publication_year.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_stringify_like_integers_when_integral() {
        assert_eq!(FieldValue::Number(412.0).to_text(), "412");
        assert_eq!(FieldValue::Number(-3.0).to_text(), "-3");
        assert_eq!(FieldValue::Number(4.25).to_text(), "4.25");
        assert_eq!(FieldValue::Number(f64::NAN).to_text(), "");
        assert_eq!(FieldValue::Missing.to_text(), "");
    }

    #[test]
    fn missing_book_fields_read_as_missing() {
        let book = Book { title: "Dune".into(), ..Default::default() };
        assert_eq!(book.field(BookField::Title), FieldValue::Text("Dune"));
        assert_eq!(book.field(BookField::PageCount), FieldValue::Missing);
        assert_eq!(book.field(BookField::PublicationYear).to_text(), "");
    }

    #[test]
    fn deserializes_camel_case_with_defaults() {
        let book: Book = serde_json::from_str(
            r#"{"id":"234225","title":"Dune","authorName":"Frank Herbert","pageCount":412}"#,
        )
        .unwrap();
        assert_eq!(book.author_name, "Frank Herbert");
        assert_eq!(book.page_count, Some(412));
        assert_eq!(book.field(BookField::PageCount).to_text(), "412");
        assert!(book.user_shelves.is_empty());
    }
}
