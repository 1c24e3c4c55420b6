//! Borrowings repository for database operations
//!
//! Checkout and return run inside a single transaction with a row lock on
//! the book, so the availability and duplicate-borrowing checks cannot be
//! invalidated by a concurrent request between check and write.

use chrono::{Duration, NaiveDate, Utc};
use sqlx::{Pool, Postgres, Row};

use crate::{
    error::{AppError, AppResult},
    models::{
        book::Book,
        borrower::Borrower,
        borrowing::{Borrowing, BorrowingDetails, LOAN_PERIOD_DAYS},
        Page,
    },
};

/// SELECT list shared by the detail queries (borrowing + book + borrower)
const DETAILS_COLUMNS: &str = r#"
    b.id, b.checkout_date, b.due_date, b.returned_date,
    bk.id as book_id, bk.title, bk.author, bk.isbn,
    bk.available_quantity, bk.shelf_location,
    br.id as borrower_id, br.name, br.email, br.registered_date
"#;

#[derive(Clone)]
pub struct BorrowingsRepository {
    pool: Pool<Postgres>,
}

impl BorrowingsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Check out a book for a borrower.
    ///
    /// Returns the new borrowing and the book's updated quantity. The book
    /// row is locked for the duration of the transaction; together with the
    /// conditional decrement and the partial unique index on active
    /// borrowings, exactly one of two racing checkouts of the last copy
    /// succeeds.
    pub async fn checkout(&self, book_id: i32, borrower_id: i32) -> AppResult<(Borrowing, i32)> {
        let mut tx = self.pool.begin().await?;

        let borrower_exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM borrowers WHERE id = $1)")
                .bind(borrower_id)
                .fetch_one(&mut *tx)
                .await?;
        if !borrower_exists {
            return Err(AppError::NotFound("Borrower not found.".to_string()));
        }

        // Lock the book row; racing checkouts of the same book serialize here
        let book = sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1 FOR UPDATE")
            .bind(book_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound("Book not found.".to_string()))?;

        let already_borrowed: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM borrowings
                WHERE book_id = $1 AND borrower_id = $2 AND returned_date IS NULL
            )
            "#,
        )
        .bind(book_id)
        .bind(borrower_id)
        .fetch_one(&mut *tx)
        .await?;
        if already_borrowed {
            return Err(AppError::Validation(
                "The borrower already borrowed this book.".to_string(),
            ));
        }

        if book.available_quantity <= 0 {
            return Err(AppError::Validation(
                "Book is not available for checkout.".to_string(),
            ));
        }

        let checkout_date = Utc::now();
        let due_date = checkout_date + Duration::days(LOAN_PERIOD_DAYS);

        let borrowing = sqlx::query_as::<_, Borrowing>(
            r#"
            INSERT INTO borrowings (book_id, borrower_id, checkout_date, due_date)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(book_id)
        .bind(borrower_id)
        .bind(checkout_date)
        .bind(due_date)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            // Partial unique index on the active pair backs the check above
            if AppError::is_unique_violation(&e) {
                AppError::Validation("The borrower already borrowed this book.".to_string())
            } else {
                AppError::from(e)
            }
        })?;

        let updated_quantity: i32 = sqlx::query_scalar(
            r#"
            UPDATE books SET available_quantity = available_quantity - 1
            WHERE id = $1 AND available_quantity > 0
            RETURNING available_quantity
            "#,
        )
        .bind(book_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::Validation("Book is not available for checkout.".to_string()))?;

        tx.commit().await?;

        Ok((borrowing, updated_quantity))
    }

    /// Return a borrowed book.
    ///
    /// Marks the active borrowing as returned and restores the book's
    /// quantity. A second return of the same borrowing finds no active row
    /// and fails with NotFound.
    pub async fn return_book(&self, book_id: i32, borrower_id: i32) -> AppResult<(Borrowing, i32)> {
        let mut tx = self.pool.begin().await?;

        let book_exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE id = $1)")
                .bind(book_id)
                .fetch_one(&mut *tx)
                .await?;
        if !book_exists {
            return Err(AppError::NotFound("Book not found.".to_string()));
        }

        let borrowing = sqlx::query_as::<_, Borrowing>(
            r#"
            UPDATE borrowings SET returned_date = $1
            WHERE book_id = $2 AND borrower_id = $3 AND returned_date IS NULL
            RETURNING *
            "#,
        )
        .bind(Utc::now())
        .bind(book_id)
        .bind(borrower_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(
                "No active borrowing for this book and borrower, cannot return book.".to_string(),
            )
        })?;

        let updated_quantity: i32 = sqlx::query_scalar(
            r#"
            UPDATE books SET available_quantity = available_quantity + 1
            WHERE id = $1
            RETURNING available_quantity
            "#,
        )
        .bind(book_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok((borrowing, updated_quantity))
    }

    /// List active borrowings with embedded book and borrower detail
    pub async fn list_active(&self, page: Page) -> AppResult<(Vec<BorrowingDetails>, i64)> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM borrowings WHERE returned_date IS NULL",
        )
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query(&format!(
            r#"
            SELECT {DETAILS_COLUMNS}
            FROM borrowings b
            JOIN books bk ON b.book_id = bk.id
            JOIN borrowers br ON b.borrower_id = br.id
            WHERE b.returned_date IS NULL
            ORDER BY b.checkout_date
            LIMIT $1 OFFSET $2
            "#
        ))
        .bind(page.size)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok((rows.iter().map(|r| details_from_row(r, true)).collect(), total))
    }

    /// List active borrowings of one borrower, with embedded book detail
    pub async fn list_for_borrower(
        &self,
        borrower_id: i32,
        page: Page,
    ) -> AppResult<(Vec<BorrowingDetails>, i64)> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM borrowings WHERE borrower_id = $1 AND returned_date IS NULL",
        )
        .bind(borrower_id)
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query(&format!(
            r#"
            SELECT {DETAILS_COLUMNS}
            FROM borrowings b
            JOIN books bk ON b.book_id = bk.id
            JOIN borrowers br ON b.borrower_id = br.id
            WHERE b.borrower_id = $1 AND b.returned_date IS NULL
            ORDER BY b.checkout_date
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(borrower_id)
        .bind(page.size)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok((rows.iter().map(|r| details_from_row(r, false)).collect(), total))
    }

    /// List overdue borrowings (due date passed, not returned)
    pub async fn list_overdue(&self, page: Page) -> AppResult<(Vec<BorrowingDetails>, i64)> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM borrowings WHERE due_date < NOW() AND returned_date IS NULL",
        )
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query(&format!(
            r#"
            SELECT {DETAILS_COLUMNS}
            FROM borrowings b
            JOIN books bk ON b.book_id = bk.id
            JOIN borrowers br ON b.borrower_id = br.id
            WHERE b.due_date < NOW() AND b.returned_date IS NULL
            ORDER BY b.due_date
            LIMIT $1 OFFSET $2
            "#
        ))
        .bind(page.size)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok((rows.iter().map(|r| details_from_row(r, true)).collect(), total))
    }

    /// Borrowings checked out within [start, end] inclusive (date precision),
    /// optionally restricted to unreturned ones that were due by the end of
    /// the range. Used by the analytics exports.
    pub async fn find_in_period(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        overdue_only: bool,
    ) -> AppResult<Vec<BorrowingDetails>> {
        let overdue_filter = if overdue_only {
            "AND b.returned_date IS NULL AND b.due_date::date <= $2"
        } else {
            ""
        };

        let rows = sqlx::query(&format!(
            r#"
            SELECT {DETAILS_COLUMNS}
            FROM borrowings b
            JOIN books bk ON b.book_id = bk.id
            JOIN borrowers br ON b.borrower_id = br.id
            WHERE b.checkout_date::date >= $1 AND b.checkout_date::date <= $2 {overdue_filter}
            ORDER BY b.checkout_date
            "#
        ))
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(|r| details_from_row(r, true)).collect())
    }
}

fn details_from_row(row: &sqlx::postgres::PgRow, with_borrower: bool) -> BorrowingDetails {
    BorrowingDetails {
        id: row.get("id"),
        checkout_date: row.get("checkout_date"),
        due_date: row.get("due_date"),
        returned_date: row.get("returned_date"),
        book: Book {
            id: row.get("book_id"),
            title: row.get("title"),
            author: row.get("author"),
            isbn: row.get("isbn"),
            available_quantity: row.get("available_quantity"),
            shelf_location: row.get("shelf_location"),
        },
        borrower: with_borrower.then(|| Borrower {
            id: row.get("borrower_id"),
            name: row.get("name"),
            email: row.get("email"),
            registered_date: row.get("registered_date"),
        }),
    }
}
