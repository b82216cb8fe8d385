use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::entity;

/// A book as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Identifier assigned by the database
    pub id: i64,
    pub author: String,
    pub title: String,
    pub publisher: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<entity::Model> for Book {
    fn from(model: entity::Model) -> Self {
        Self {
            id: model.id,
            author: model.author,
            title: model.title,
            publisher: model.publisher,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Request body for creating a book. Absent fields are stored as empty
/// strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CreateBook {
    pub author: String,
    pub title: String,
    pub publisher: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_book_fills_missing_fields_with_empty_strings() {
        let book: CreateBook = serde_json::from_str(r#"{"title":"Dune"}"#).unwrap();
        assert_eq!(
            book,
            CreateBook {
                author: String::new(),
                title: "Dune".to_string(),
                publisher: String::new(),
            }
        );
    }

    #[test]
    fn create_book_rejects_wrong_types() {
        assert!(serde_json::from_str::<CreateBook>(r#"{"author":42}"#).is_err());
    }

    #[test]
    fn book_serializes_timestamps_as_rfc3339() {
        let book = Book {
            id: 7,
            author: "Frank Herbert".to_string(),
            title: "Dune".to_string(),
            publisher: "Chilton".to_string(),
            created_at: time::macros::datetime!(2024-03-01 12:00 UTC),
            updated_at: time::macros::datetime!(2024-03-01 12:00 UTC),
        };

        let value = serde_json::to_value(&book).unwrap();
        assert_eq!(value["created_at"], "2024-03-01T12:00:00Z");
        assert_eq!(value["id"], 7);
        assert!(value.get("deleted_at").is_none());
    }
}
