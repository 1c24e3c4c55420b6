//! Borrower management endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        borrower::{Borrower, CreateBorrower, UpdateBorrower},
        Page, PaginatedResponse,
    },
};

use super::{books::PageParams, AppJson};

/// List borrowers with pagination
#[utoipa::path(
    get,
    path = "/borrower/all",
    tag = "borrowers",
    params(
        ("page" = Option<i64>, Query, description = "Page number (default: 1)"),
        ("pageSize" = Option<i64>, Query, description = "Borrowers per page (default: 10)")
    ),
    responses(
        (status = 200, description = "Paginated list of borrowers", body = PaginatedResponse<Borrower>)
    )
)]
pub async fn list_borrowers(
    State(state): State<crate::AppState>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<PaginatedResponse<Borrower>>> {
    let page = Page::from_query(params.page, params.page_size);
    let (borrowers, total) = state.services.borrowers.get_borrowers(page).await?;

    Ok(Json(PaginatedResponse::new(borrowers, page, total)))
}

/// Register a new borrower
#[utoipa::path(
    post,
    path = "/borrower/register",
    tag = "borrowers",
    request_body = CreateBorrower,
    responses(
        (status = 201, description = "Borrower registered", body = Borrower),
        (status = 400, description = "Missing field or invalid email"),
        (status = 409, description = "A borrower with this email already exists")
    )
)]
pub async fn register_borrower(
    State(state): State<crate::AppState>,
    AppJson(borrower): AppJson<CreateBorrower>,
) -> AppResult<(StatusCode, Json<Borrower>)> {
    let created = state.services.borrowers.register_borrower(borrower).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update an existing borrower
#[utoipa::path(
    patch,
    path = "/borrower/update/{borrowerId}",
    tag = "borrowers",
    params(
        ("borrowerId" = i32, Path, description = "Borrower ID")
    ),
    request_body = UpdateBorrower,
    responses(
        (status = 200, description = "Borrower updated", body = Borrower),
        (status = 400, description = "Invalid input or no fields supplied"),
        (status = 404, description = "Borrower not found"),
        (status = 409, description = "A borrower with this email already exists")
    )
)]
pub async fn update_borrower(
    State(state): State<crate::AppState>,
    Path(borrower_id): Path<i32>,
    AppJson(borrower): AppJson<UpdateBorrower>,
) -> AppResult<Json<Borrower>> {
    let updated = state
        .services
        .borrowers
        .update_borrower(borrower_id, borrower)
        .await?;
    Ok(Json(updated))
}

/// Delete a borrower
#[utoipa::path(
    delete,
    path = "/borrower/delete/{borrowerId}",
    tag = "borrowers",
    params(
        ("borrowerId" = i32, Path, description = "Borrower ID")
    ),
    responses(
        (status = 200, description = "Borrower deleted", body = Borrower),
        (status = 404, description = "Borrower not found"),
        (status = 409, description = "Borrower has borrowing records")
    )
)]
pub async fn delete_borrower(
    State(state): State<crate::AppState>,
    Path(borrower_id): Path<i32>,
) -> AppResult<Json<Borrower>> {
    let deleted = state.services.borrowers.delete_borrower(borrower_id).await?;
    Ok(Json(deleted))
}
