//! Book model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::present;

/// Quantity given to a book created without one
pub const DEFAULT_QUANTITY: i64 = 1;

/// Book record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    /// ISBN (unique, at most 13 characters)
    pub isbn: String,
    /// Number of copies held
    pub quantity: i64,
    pub created_at: DateTime<Utc>,
}

/// Create book request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, max = 100, message = "Title must be 1-100 characters"))]
    pub title: String,
    #[validate(length(min = 1, max = 100, message = "Author must be 1-100 characters"))]
    pub author: String,
    #[validate(length(min = 1, max = 13, message = "ISBN must be 1-13 characters"))]
    pub isbn: String,
    /// Defaults to 1
    pub quantity: Option<i64>,
}

/// Update book request. Omitted fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateBook {
    #[serde(default, deserialize_with = "present")]
    #[validate(length(min = 1, max = 100, message = "Title must be 1-100 characters"))]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "present")]
    #[validate(length(min = 1, max = 100, message = "Author must be 1-100 characters"))]
    pub author: Option<String>,
    #[serde(default, deserialize_with = "present")]
    #[validate(length(min = 1, max = 13, message = "ISBN must be 1-13 characters"))]
    pub isbn: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub quantity: Option<i64>,
}

/// Book list query parameters.
///
/// `page` stays a raw string so a malformed value falls back to the first page
/// instead of rejecting the request.
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct BookQuery {
    /// Page number (1-based, default 1)
    pub page: Option<String>,
    /// Case-insensitive substring matched against title or author
    pub search: Option<String>,
}

impl BookQuery {
    /// Trimmed search term, `None` when absent or blank
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_distinguishes_absent_from_null() {
        let patch: UpdateBook = serde_json::from_str(r#"{"quantity": 4}"#).unwrap();
        assert_eq!(patch.quantity, Some(4));
        assert!(patch.title.is_none());
        assert!(patch.isbn.is_none());

        assert!(serde_json::from_str::<UpdateBook>(r#"{"title": null}"#).is_err());
    }

    #[test]
    fn create_rejects_long_isbn() {
        let book = CreateBook {
            title: "Dune".into(),
            author: "Frank Herbert".into(),
            isbn: "97804411729131".into(),
            quantity: None,
        };
        assert!(book.validate().is_err());
    }

    #[test]
    fn blank_search_is_ignored() {
        let query = BookQuery {
            page: None,
            search: Some("   ".into()),
        };
        assert_eq!(query.search_term(), None);

        let query = BookQuery {
            page: None,
            search: Some(" tolkien ".into()),
        };
        assert_eq!(query.search_term(), Some("tolkien"));
    }
}
