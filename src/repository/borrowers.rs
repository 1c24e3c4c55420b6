//! Borrowers repository for database operations

use chrono::Utc;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        borrower::{Borrower, CreateBorrower, UpdateBorrower},
        Page,
    },
};

#[derive(Clone)]
pub struct BorrowersRepository {
    pool: Pool<Postgres>,
}

impl BorrowersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get borrower by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Borrower> {
        sqlx::query_as::<_, Borrower>("SELECT * FROM borrowers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Borrower not found.".to_string()))
    }

    /// Get borrower by email (case-insensitive)
    pub async fn get_by_email(&self, email: &str) -> AppResult<Option<Borrower>> {
        let borrower = sqlx::query_as::<_, Borrower>(
            "SELECT * FROM borrowers WHERE LOWER(email) = LOWER($1)",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(borrower)
    }

    /// Check if an email is already registered
    pub async fn email_exists(&self, email: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        let exists: bool = if let Some(id) = exclude_id {
            sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM borrowers WHERE LOWER(email) = LOWER($1) AND id != $2)",
            )
            .bind(email)
            .bind(id)
            .fetch_one(&self.pool)
            .await?
        } else {
            sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM borrowers WHERE LOWER(email) = LOWER($1))",
            )
            .bind(email)
            .fetch_one(&self.pool)
            .await?
        };
        Ok(exists)
    }

    /// List borrowers with pagination
    pub async fn list(&self, page: Page) -> AppResult<(Vec<Borrower>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM borrowers")
            .fetch_one(&self.pool)
            .await?;

        let borrowers = sqlx::query_as::<_, Borrower>(
            "SELECT * FROM borrowers ORDER BY id LIMIT $1 OFFSET $2",
        )
        .bind(page.size)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok((borrowers, total))
    }

    /// Register a new borrower
    pub async fn create(&self, borrower: &CreateBorrower) -> AppResult<Borrower> {
        sqlx::query_as::<_, Borrower>(
            r#"
            INSERT INTO borrowers (name, email, registered_date)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(&borrower.name)
        .bind(&borrower.email)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if AppError::is_unique_violation(&e) {
                AppError::Conflict("A borrower with this email already exists.".to_string())
            } else {
                e.into()
            }
        })
    }

    /// Update a borrower, keeping unspecified fields unchanged
    pub async fn update(&self, id: i32, borrower: &UpdateBorrower) -> AppResult<Borrower> {
        sqlx::query_as::<_, Borrower>(
            r#"
            UPDATE borrowers SET
                name = COALESCE($1, name),
                email = COALESCE($2, email),
                registered_date = COALESCE($3, registered_date)
            WHERE id = $4
            RETURNING *
            "#,
        )
        .bind(&borrower.name)
        .bind(&borrower.email)
        .bind(borrower.registered_date)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if AppError::is_unique_violation(&e) {
                AppError::Conflict("A borrower with this email already exists.".to_string())
            } else {
                AppError::from(e)
            }
        })?
        .ok_or_else(|| AppError::NotFound("Borrower not found.".to_string()))
    }

    /// Delete a borrower and return the removed record
    pub async fn delete(&self, id: i32) -> AppResult<Borrower> {
        sqlx::query_as::<_, Borrower>("DELETE FROM borrowers WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                if AppError::is_foreign_key_violation(&e) {
                    AppError::Conflict(
                        "Borrower has borrowing records and cannot be deleted.".to_string(),
                    )
                } else {
                    AppError::from(e)
                }
            })?
            .ok_or_else(|| AppError::NotFound("Borrower not found.".to_string()))
    }
}
