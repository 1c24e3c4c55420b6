//! Borrowing workflow service

use crate::{
    error::{AppError, AppResult},
    models::{
        borrowing::{Borrowing, BorrowingDetails, CheckoutRequest, ReturnRequest},
        Page,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct BorrowingsService {
    repository: Repository,
}

impl BorrowingsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Check out a book for a borrower
    pub async fn checkout(&self, request: CheckoutRequest) -> AppResult<(Borrowing, i32)> {
        self.repository
            .borrowings
            .checkout(request.book_id, request.borrower_id)
            .await
    }

    /// Return a borrowed book. The borrower may be addressed by id or by
    /// email; exactly one of the two must be supplied.
    pub async fn return_book(&self, request: ReturnRequest) -> AppResult<(Borrowing, i32)> {
        let borrower_id = match (request.borrower_id, request.borrower_email) {
            (Some(id), _) => self.repository.borrowers.get_by_id(id).await?.id,
            (None, Some(ref email)) => self
                .repository
                .borrowers
                .get_by_email(email)
                .await?
                .ok_or_else(|| AppError::NotFound("Borrower not found.".to_string()))?
                .id,
            (None, None) => {
                return Err(AppError::Validation(
                    "borrowerId or borrowerEmail is required.".to_string(),
                ))
            }
        };

        self.repository
            .borrowings
            .return_book(request.book_id, borrower_id)
            .await
    }

    /// List all active borrowings
    pub async fn get_active_borrowings(
        &self,
        page: Page,
    ) -> AppResult<(Vec<BorrowingDetails>, i64)> {
        self.repository.borrowings.list_active(page).await
    }

    /// List the active borrowings of one borrower
    pub async fn get_user_borrowings(
        &self,
        borrower_id: i32,
        page: Page,
    ) -> AppResult<(Vec<BorrowingDetails>, i64)> {
        let (borrowings, total) = self
            .repository
            .borrowings
            .list_for_borrower(borrower_id, page)
            .await?;

        if total == 0 {
            return Err(AppError::NotFound(
                "You are currently not borrowing any book.".to_string(),
            ));
        }

        Ok((borrowings, total))
    }

    /// List overdue borrowings
    pub async fn get_overdue_books(&self, page: Page) -> AppResult<(Vec<BorrowingDetails>, i64)> {
        let (borrowings, total) = self.repository.borrowings.list_overdue(page).await?;

        if total == 0 {
            return Err(AppError::NotFound("No overdue books found.".to_string()));
        }

        Ok((borrowings, total))
    }
}
