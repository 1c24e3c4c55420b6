//! Borrowing model and related types
//!
//! A borrowing is `Active` while `returned_date` is NULL and moves to the
//! terminal `Returned` state when the book comes back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use super::{book::Book, borrower::Borrower};

/// Loan duration: due date is this many days after checkout
pub const LOAN_PERIOD_DAYS: i64 = 14;

/// Borrowing record from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Borrowing {
    pub id: i32,
    pub book_id: i32,
    pub borrower_id: i32,
    pub checkout_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub returned_date: Option<DateTime<Utc>>,
}

/// Borrowing with embedded book and borrower detail for listings
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BorrowingDetails {
    pub id: i32,
    pub checkout_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub returned_date: Option<DateTime<Utc>>,
    pub book: Book,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub borrower: Option<Borrower>,
}

/// Checkout request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub book_id: i32,
    pub borrower_id: i32,
}

/// Return request: the borrower is addressed by id or by email
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReturnRequest {
    pub book_id: i32,
    pub borrower_id: Option<i32>,
    pub borrower_email: Option<String>,
}

/// Borrowing listing query parameters
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct BorrowingQuery {
    pub borrower_id: Option<i32>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}
