//! Book management endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    error::AppResult,
    models::{
        book::{Book, BookQuery, CreateBook, UpdateBook},
        Page, PaginatedResponse,
    },
};

use super::AppJson;

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct PageParams {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

/// List books with pagination
#[utoipa::path(
    get,
    path = "/book/all",
    tag = "books",
    params(
        ("page" = Option<i64>, Query, description = "Page number (default: 1)"),
        ("pageSize" = Option<i64>, Query, description = "Books per page (default: 10)")
    ),
    responses(
        (status = 200, description = "Paginated list of books", body = PaginatedResponse<Book>),
        (status = 429, description = "Rate limit exceeded")
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<PaginatedResponse<Book>>> {
    let page = Page::from_query(params.page, params.page_size);
    let (books, total) = state.services.books.get_books(page).await?;

    Ok(Json(PaginatedResponse::new(books, page, total)))
}

/// Search books by title, author and/or ISBN
#[utoipa::path(
    get,
    path = "/book/search",
    tag = "books",
    params(BookQuery),
    responses(
        (status = 200, description = "Paginated search results", body = PaginatedResponse<Book>),
        (status = 429, description = "Rate limit exceeded")
    )
)]
pub async fn search_books(
    State(state): State<crate::AppState>,
    Query(query): Query<BookQuery>,
) -> AppResult<Json<PaginatedResponse<Book>>> {
    let page = Page::from_query(query.page, query.page_size);
    let (books, total) = state.services.books.search_books(&query).await?;

    Ok(Json(PaginatedResponse::new(books, page, total)))
}

/// Add a new book
#[utoipa::path(
    post,
    path = "/book/add",
    tag = "books",
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book added", body = Book),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "A book with this ISBN already exists")
    )
)]
pub async fn add_book(
    State(state): State<crate::AppState>,
    AppJson(book): AppJson<CreateBook>,
) -> AppResult<(StatusCode, Json<Book>)> {
    let created = state.services.books.add_book(book).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update an existing book
#[utoipa::path(
    patch,
    path = "/book/update/{bookId}",
    tag = "books",
    params(
        ("bookId" = i32, Path, description = "Book ID")
    ),
    request_body = UpdateBook,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 400, description = "Invalid input or no fields supplied"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    Path(book_id): Path<i32>,
    AppJson(book): AppJson<UpdateBook>,
) -> AppResult<Json<Book>> {
    let updated = state.services.books.update_book(book_id, book).await?;
    Ok(Json(updated))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/book/delete/{bookId}",
    tag = "books",
    params(
        ("bookId" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book deleted", body = Book),
        (status = 404, description = "Book not found"),
        (status = 409, description = "Book has borrowing records")
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    Path(book_id): Path<i32>,
) -> AppResult<Json<Book>> {
    let deleted = state.services.books.delete_book(book_id).await?;
    Ok(Json(deleted))
}
