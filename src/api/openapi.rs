//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{analytics, books, borrowers, borrowings, health};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Libris API",
        version = "1.0.0",
        description = "Library Management REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    paths(
        // Health
        health::health_check,
        // Books
        books::list_books,
        books::search_books,
        books::add_book,
        books::update_book,
        books::delete_book,
        // Borrowers
        borrowers::list_borrowers,
        borrowers::register_borrower,
        borrowers::update_borrower,
        borrowers::delete_borrower,
        // Borrowings
        borrowings::checkout,
        borrowings::return_book,
        borrowings::list_active,
        borrowings::list_for_borrower,
        borrowings::list_overdue,
        // Analytics
        analytics::borrowing_report,
        analytics::borrowings_last_month,
        analytics::overdue_last_month,
    ),
    components(
        schemas(
            // Books
            crate::models::book::Book,
            crate::models::book::CreateBook,
            crate::models::book::UpdateBook,
            // Borrowers
            crate::models::borrower::Borrower,
            crate::models::borrower::CreateBorrower,
            crate::models::borrower::UpdateBorrower,
            // Borrowings
            crate::models::borrowing::Borrowing,
            crate::models::borrowing::BorrowingDetails,
            crate::models::borrowing::CheckoutRequest,
            crate::models::borrowing::ReturnRequest,
            borrowings::CheckoutResponse,
            borrowings::ReturnResponse,
            // Pagination
            crate::models::Pagination,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "books", description = "Book inventory management"),
        (name = "borrowers", description = "Borrower registry"),
        (name = "borrowings", description = "Checkout and return workflow"),
        (name = "analytics", description = "CSV report exports")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
