//! Libris Server - Library Management REST Backend

use axum::{
    routing::{delete, get, patch, post},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use libris_server::{api, config::AppConfig, repository::Repository, services::Services, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("libris_server={},tower_http=debug", config.logging.level).into()
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Libris Server v{}", env!("CARGO_PKG_VERSION"));

    // Create database connection pool
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await
        .expect("Failed to connect to database");

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("Database migrations completed");

    // Save server address before moving config
    let server_host = config.server.host.clone();
    let server_port = config.server.port;

    // Create repository and services
    let repository = Repository::new(pool);
    let services = Services::new(repository);

    // Create application state
    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(
        server_host.parse().expect("Invalid host address"),
        server_port,
    );

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    // Connect info is required by the rate limiter's peer-IP key extractor
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Create the application router with all routes
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let rate_limit = state.config.rate_limit.clone();

    // Book listing routes, rate limited when enabled
    let mut book_reads = Router::new()
        .route("/book/all", get(api::books::list_books))
        .route("/book/search", get(api::books::search_books));

    if rate_limit.enabled {
        let seconds_per_request = (60 / rate_limit.per_minute.max(1)).max(1);
        let governor_conf = Box::new(
            GovernorConfigBuilder::default()
                .per_second(seconds_per_request)
                .burst_size(rate_limit.burst)
                .finish()
                .expect("Invalid rate limit configuration"),
        );
        book_reads = book_reads.layer(GovernorLayer {
            config: Box::leak(governor_conf),
        });
    }

    let routes = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        // Books
        .merge(book_reads)
        .route("/book/add", post(api::books::add_book))
        .route("/book/update/:bookId", patch(api::books::update_book))
        .route("/book/delete/:bookId", delete(api::books::delete_book))
        // Borrowers
        .route("/borrower/all", get(api::borrowers::list_borrowers))
        .route("/borrower/register", post(api::borrowers::register_borrower))
        .route(
            "/borrower/update/:borrowerId",
            patch(api::borrowers::update_borrower),
        )
        .route(
            "/borrower/delete/:borrowerId",
            delete(api::borrowers::delete_borrower),
        )
        // Borrowings
        .route("/borrowing/active", get(api::borrowings::list_active))
        .route("/borrowing/my", get(api::borrowings::list_for_borrower))
        .route("/borrowing/overdue", get(api::borrowings::list_overdue))
        .route("/borrowing/checkout", post(api::borrowings::checkout))
        .route("/borrowing/return", post(api::borrowings::return_book))
        // Analytics
        .route(
            "/analytics/borrowing-report",
            get(api::analytics::borrowing_report),
        )
        .route(
            "/analytics/last-month-borrowing",
            get(api::analytics::borrowings_last_month),
        )
        .route(
            "/analytics/last-month-overdue",
            get(api::analytics::overdue_last_month),
        )
        .with_state(state);

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .merge(routes)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
