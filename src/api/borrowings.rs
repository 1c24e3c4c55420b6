//! Borrowing workflow endpoints

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::{
        borrowing::{
            Borrowing, BorrowingDetails, BorrowingQuery, CheckoutRequest, ReturnRequest,
        },
        Page, PaginatedResponse,
    },
};

use super::{books::PageParams, AppJson};

/// Checkout response with the new borrowing and updated quantity
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub message: String,
    pub borrowing: Borrowing,
    pub updated_quantity: i32,
}

/// Return response with the completed borrowing and updated quantity
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReturnResponse {
    pub message: String,
    pub borrowing: Borrowing,
    pub updated_quantity: i32,
}

/// Check out a book
#[utoipa::path(
    post,
    path = "/borrowing/checkout",
    tag = "borrowings",
    request_body = CheckoutRequest,
    responses(
        (status = 201, description = "Book checked out", body = CheckoutResponse),
        (status = 400, description = "Book unavailable or already borrowed by this borrower"),
        (status = 404, description = "Book or borrower not found")
    )
)]
pub async fn checkout(
    State(state): State<crate::AppState>,
    AppJson(request): AppJson<CheckoutRequest>,
) -> AppResult<(StatusCode, Json<CheckoutResponse>)> {
    let (borrowing, updated_quantity) = state.services.borrowings.checkout(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(CheckoutResponse {
            message: "Book checked out successfully.".to_string(),
            borrowing,
            updated_quantity,
        }),
    ))
}

/// Return a borrowed book
#[utoipa::path(
    post,
    path = "/borrowing/return",
    tag = "borrowings",
    request_body = ReturnRequest,
    responses(
        (status = 200, description = "Book returned", body = ReturnResponse),
        (status = 400, description = "Neither borrowerId nor borrowerEmail supplied"),
        (status = 404, description = "Book, borrower or active borrowing not found")
    )
)]
pub async fn return_book(
    State(state): State<crate::AppState>,
    AppJson(request): AppJson<ReturnRequest>,
) -> AppResult<Json<ReturnResponse>> {
    let (borrowing, updated_quantity) = state.services.borrowings.return_book(request).await?;

    Ok(Json(ReturnResponse {
        message: "Book returned successfully.".to_string(),
        borrowing,
        updated_quantity,
    }))
}

/// List all active borrowings
#[utoipa::path(
    get,
    path = "/borrowing/active",
    tag = "borrowings",
    params(
        ("page" = Option<i64>, Query, description = "Page number (default: 1)"),
        ("pageSize" = Option<i64>, Query, description = "Borrowings per page (default: 10)")
    ),
    responses(
        (status = 200, description = "Paginated active borrowings", body = PaginatedResponse<BorrowingDetails>)
    )
)]
pub async fn list_active(
    State(state): State<crate::AppState>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<PaginatedResponse<BorrowingDetails>>> {
    let page = Page::from_query(params.page, params.page_size);
    let (borrowings, total) = state.services.borrowings.get_active_borrowings(page).await?;

    Ok(Json(PaginatedResponse::new(borrowings, page, total)))
}

/// List the active borrowings of one borrower
#[utoipa::path(
    get,
    path = "/borrowing/my",
    tag = "borrowings",
    params(BorrowingQuery),
    responses(
        (status = 200, description = "Paginated borrowings of the borrower", body = PaginatedResponse<BorrowingDetails>),
        (status = 404, description = "Borrower has no active borrowing")
    )
)]
pub async fn list_for_borrower(
    State(state): State<crate::AppState>,
    Query(query): Query<BorrowingQuery>,
) -> AppResult<Json<PaginatedResponse<BorrowingDetails>>> {
    let borrower_id = query
        .borrower_id
        .ok_or_else(|| AppError::Validation("borrowerId is required.".to_string()))?;

    let page = Page::from_query(query.page, query.page_size);
    let (borrowings, total) = state
        .services
        .borrowings
        .get_user_borrowings(borrower_id, page)
        .await?;

    Ok(Json(PaginatedResponse::new(borrowings, page, total)))
}

/// List overdue borrowings
#[utoipa::path(
    get,
    path = "/borrowing/overdue",
    tag = "borrowings",
    params(
        ("page" = Option<i64>, Query, description = "Page number (default: 1)"),
        ("pageSize" = Option<i64>, Query, description = "Borrowings per page (default: 10)")
    ),
    responses(
        (status = 200, description = "Paginated overdue borrowings", body = PaginatedResponse<BorrowingDetails>),
        (status = 404, description = "No overdue books found")
    )
)]
pub async fn list_overdue(
    State(state): State<crate::AppState>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<PaginatedResponse<BorrowingDetails>>> {
    let page = Page::from_query(params.page, params.page_size);
    let (borrowings, total) = state.services.borrowings.get_overdue_books(page).await?;

    Ok(Json(PaginatedResponse::new(borrowings, page, total)))
}
