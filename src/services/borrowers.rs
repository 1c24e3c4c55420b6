//! Borrower management service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        borrower::{Borrower, CreateBorrower, UpdateBorrower},
        Page,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct BorrowersService {
    repository: Repository,
}

impl BorrowersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Register a new borrower
    pub async fn register_borrower(&self, borrower: CreateBorrower) -> AppResult<Borrower> {
        borrower.validate()?;

        if self
            .repository
            .borrowers
            .email_exists(&borrower.email, None)
            .await?
        {
            return Err(AppError::Conflict(
                "A borrower with this email already exists.".to_string(),
            ));
        }

        self.repository.borrowers.create(&borrower).await
    }

    /// List borrowers with pagination
    pub async fn get_borrowers(&self, page: Page) -> AppResult<(Vec<Borrower>, i64)> {
        self.repository.borrowers.list(page).await
    }

    /// Update a borrower's details
    pub async fn update_borrower(&self, id: i32, borrower: UpdateBorrower) -> AppResult<Borrower> {
        if borrower.is_empty() {
            return Err(AppError::Validation(
                "No fields were provided to update.".to_string(),
            ));
        }
        borrower.validate()?;

        if let Some(ref email) = borrower.email {
            if self
                .repository
                .borrowers
                .email_exists(email, Some(id))
                .await?
            {
                return Err(AppError::Conflict(
                    "A borrower with this email already exists.".to_string(),
                ));
            }
        }

        self.repository.borrowers.update(id, &borrower).await
    }

    /// Delete a borrower
    pub async fn delete_borrower(&self, id: i32) -> AppResult<Borrower> {
        self.repository.borrowers.delete(id).await
    }
}
