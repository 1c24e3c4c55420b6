//! Book model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Book record from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub available_quantity: i32,
    pub shelf_location: String,
}

/// Add book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBook {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Author is required"))]
    pub author: String,
    #[validate(length(min = 1, message = "ISBN is required"))]
    pub isbn: String,
    #[validate(range(min = 0, message = "Available quantity should not be a negative value"))]
    pub available_quantity: i32,
    #[validate(length(min = 1, message = "Shelf location is required"))]
    pub shelf_location: String,
}

/// Update book request (only supplied fields are applied)
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBook {
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
    #[validate(range(min = 0, message = "Available quantity should not be a negative value"))]
    pub available_quantity: Option<i32>,
    pub shelf_location: Option<String>,
}

impl UpdateBook {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.isbn.is_none()
            && self.available_quantity.is_none()
            && self.shelf_location.is_none()
    }
}

/// Book search query parameters
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct BookQuery {
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_quantity_fails_validation() {
        let book = CreateBook {
            title: "The Pragmatic Programmer".into(),
            author: "Hunt & Thomas".into(),
            isbn: "978-0135957059".into(),
            available_quantity: -1,
            shelf_location: "A1".into(),
        };
        assert!(book.validate().is_err());
    }

    #[test]
    fn empty_title_fails_validation() {
        let book = CreateBook {
            title: "".into(),
            author: "Hunt & Thomas".into(),
            isbn: "978-0135957059".into(),
            available_quantity: 3,
            shelf_location: "A1".into(),
        };
        assert!(book.validate().is_err());
    }

    #[test]
    fn update_with_no_fields_is_empty() {
        let update = UpdateBook {
            title: None,
            author: None,
            isbn: None,
            available_quantity: None,
            shelf_location: None,
        };
        assert!(update.is_empty());
    }

    #[test]
    fn update_quantity_is_range_checked() {
        let update = UpdateBook {
            title: None,
            author: None,
            isbn: None,
            available_quantity: Some(-3),
            shelf_location: None,
        };
        assert!(update.validate().is_err());
        assert!(!update.is_empty());
    }
}
