//! Business logic services

pub mod books;
pub mod borrowers;
pub mod borrowings;
pub mod reports;

use crate::repository::Repository;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub books: books::BooksService,
    pub borrowers: borrowers::BorrowersService,
    pub borrowings: borrowings::BorrowingsService,
    pub reports: reports::ReportsService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository) -> Self {
        Self {
            books: books::BooksService::new(repository.clone()),
            borrowers: borrowers::BorrowersService::new(repository.clone()),
            borrowings: borrowings::BorrowingsService::new(repository.clone()),
            reports: reports::ReportsService::new(repository),
        }
    }
}
