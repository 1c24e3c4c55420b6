//! Book management service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{Book, BookQuery, CreateBook, UpdateBook},
        Page,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Add a new book to the inventory
    pub async fn add_book(&self, book: CreateBook) -> AppResult<Book> {
        book.validate()?;

        if self.repository.books.isbn_exists(&book.isbn, None).await? {
            return Err(AppError::Conflict(
                "A book with this ISBN already exists.".to_string(),
            ));
        }

        self.repository.books.create(&book).await
    }

    /// List books with pagination
    pub async fn get_books(&self, page: Page) -> AppResult<(Vec<Book>, i64)> {
        self.repository.books.list(page).await
    }

    /// Search books by title, author and/or isbn
    pub async fn search_books(&self, query: &BookQuery) -> AppResult<(Vec<Book>, i64)> {
        self.repository.books.search(query).await
    }

    /// Update a book's details
    pub async fn update_book(&self, id: i32, book: UpdateBook) -> AppResult<Book> {
        if book.is_empty() {
            return Err(AppError::Validation(
                "No fields were provided to update.".to_string(),
            ));
        }
        book.validate()?;

        if let Some(ref isbn) = book.isbn {
            if self.repository.books.isbn_exists(isbn, Some(id)).await? {
                return Err(AppError::Conflict(
                    "A book with this ISBN already exists.".to_string(),
                ));
            }
        }

        self.repository.books.update(id, &book).await
    }

    /// Delete a book from the inventory
    pub async fn delete_book(&self, id: i32) -> AppResult<Book> {
        self.repository.books.delete(id).await
    }
}
