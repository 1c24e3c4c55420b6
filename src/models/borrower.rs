//! Borrower model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Borrower record from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Borrower {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub registered_date: DateTime<Utc>,
}

/// Register borrower request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBorrower {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Email format is invalid"))]
    pub email: String,
}

/// Update borrower request (only supplied fields are applied)
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBorrower {
    pub name: Option<String>,
    #[validate(email(message = "Email format is invalid"))]
    pub email: Option<String>,
    pub registered_date: Option<DateTime<Utc>>,
}

impl UpdateBorrower {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.registered_date.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_email_fails_validation() {
        let borrower = CreateBorrower {
            name: "Ada Lovelace".into(),
            email: "bad-email".into(),
        };
        assert!(borrower.validate().is_err());
    }

    #[test]
    fn well_formed_email_passes_validation() {
        let borrower = CreateBorrower {
            name: "Ada Lovelace".into(),
            email: "ada@example.org".into(),
        };
        assert!(borrower.validate().is_ok());
    }

    #[test]
    fn update_email_is_format_checked() {
        let update = UpdateBorrower {
            name: None,
            email: Some("not-an-address".into()),
            registered_date: None,
        };
        assert!(update.validate().is_err());
    }
}
