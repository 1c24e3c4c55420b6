//! API integration tests
//!
//! These tests run against a live server with a migrated database:
//! `cargo run`, then `cargo test -- --ignored`.

use reqwest::Client;
use serde_json::{json, Value};
use std::time::{SystemTime, UNIX_EPOCH};

const BASE_URL: &str = "http://localhost:4000";

/// Unique suffix so repeated runs do not collide on unique keys
fn unique_suffix() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before epoch")
        .as_nanos()
}

async fn create_book(client: &Client, isbn: &str, quantity: i32) -> Value {
    let response = client
        .post(format!("{}/book/add", BASE_URL))
        .json(&json!({
            "title": "Test Driven Development",
            "author": "Kent Beck",
            "isbn": isbn,
            "availableQuantity": quantity,
            "shelfLocation": "T1"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    response.json().await.expect("Failed to parse response")
}

async fn create_borrower(client: &Client, email: &str) -> Value {
    let response = client
        .post(format!("{}/borrower/register", BASE_URL))
        .json(&json!({
            "name": "Test Borrower",
            "email": email
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    response.json().await.expect("Failed to parse response")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_list_books_pagination_shape() {
    let client = Client::new();

    let response = client
        .get(format!("{}/book/all?page=1&pageSize=5", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["items"].is_array());
    assert_eq!(body["pagination"]["currentPage"], 1);
    assert_eq!(body["pagination"]["pageSize"], 5);
    assert!(body["pagination"]["totalPages"].is_number());
    assert!(body["pagination"]["totalItems"].is_number());
}

#[tokio::test]
#[ignore]
async fn test_listed_quantities_are_never_negative() {
    let client = Client::new();

    let response = client
        .get(format!("{}/book/all?pageSize=100", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    let body: Value = response.json().await.expect("Failed to parse response");
    for book in body["items"].as_array().expect("items should be an array") {
        assert!(book["availableQuantity"].as_i64().expect("quantity") >= 0);
    }
}

#[tokio::test]
#[ignore]
async fn test_add_book_with_duplicate_isbn_conflicts() {
    let client = Client::new();
    let isbn = format!("isbn-{}", unique_suffix());

    create_book(&client, &isbn, 2).await;

    let response = client
        .post(format!("{}/book/add", BASE_URL))
        .json(&json!({
            "title": "Another Title",
            "author": "Another Author",
            "isbn": isbn,
            "availableQuantity": 1,
            "shelfLocation": "T2"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 409);
}

#[tokio::test]
#[ignore]
async fn test_add_book_with_negative_quantity_is_rejected() {
    let client = Client::new();

    let response = client
        .post(format!("{}/book/add", BASE_URL))
        .json(&json!({
            "title": "Broken",
            "author": "Nobody",
            "isbn": format!("isbn-{}", unique_suffix()),
            "availableQuantity": -1,
            "shelfLocation": "T1"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_register_borrower_with_invalid_email_is_rejected() {
    let client = Client::new();

    let response = client
        .post(format!("{}/borrower/register", BASE_URL))
        .json(&json!({
            "name": "Bad Email",
            "email": "bad-email"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_update_book_without_fields_is_rejected() {
    let client = Client::new();
    let isbn = format!("isbn-{}", unique_suffix());
    let book = create_book(&client, &isbn, 1).await;

    let response = client
        .patch(format!("{}/book/update/{}", BASE_URL, book["id"]))
        .json(&json!({}))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_checkout_and_return_round_trip() {
    let client = Client::new();
    let suffix = unique_suffix();
    let book = create_book(&client, &format!("isbn-{}", suffix), 1).await;
    let borrower = create_borrower(&client, &format!("reader-{}@example.org", suffix)).await;

    // Checkout consumes the single copy
    let response = client
        .post(format!("{}/borrowing/checkout", BASE_URL))
        .json(&json!({
            "bookId": book["id"],
            "borrowerId": borrower["id"]
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["updatedQuantity"], 0);

    // A second checkout by the same borrower is a duplicate active borrowing
    let response = client
        .post(format!("{}/borrowing/checkout", BASE_URL))
        .json(&json!({
            "bookId": book["id"],
            "borrowerId": borrower["id"]
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);

    // Return restores the pre-checkout quantity
    let response = client
        .post(format!("{}/borrowing/return", BASE_URL))
        .json(&json!({
            "bookId": book["id"],
            "borrowerId": borrower["id"]
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["updatedQuantity"], 1);

    // Returning the same borrowing again finds no active record
    let response = client
        .post(format!("{}/borrowing/return", BASE_URL))
        .json(&json!({
            "bookId": book["id"],
            "borrowerId": borrower["id"]
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_return_by_borrower_email() {
    let client = Client::new();
    let suffix = unique_suffix();
    let email = format!("reader-{}@example.org", suffix);
    let book = create_book(&client, &format!("isbn-{}", suffix), 1).await;
    let borrower = create_borrower(&client, &email).await;

    let response = client
        .post(format!("{}/borrowing/checkout", BASE_URL))
        .json(&json!({
            "bookId": book["id"],
            "borrowerId": borrower["id"]
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    let response = client
        .post(format!("{}/borrowing/return", BASE_URL))
        .json(&json!({
            "bookId": book["id"],
            "borrowerEmail": email
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 200);
}

#[tokio::test]
#[ignore]
async fn test_concurrent_checkouts_of_last_copy() {
    let client = Client::new();
    let suffix = unique_suffix();
    let book = create_book(&client, &format!("isbn-{}", suffix), 1).await;
    let first = create_borrower(&client, &format!("first-{}@example.org", suffix)).await;
    let second = create_borrower(&client, &format!("second-{}@example.org", suffix)).await;

    let checkout = |borrower_id: Value| {
        let client = client.clone();
        let book_id = book["id"].clone();
        async move {
            client
                .post(format!("{}/borrowing/checkout", BASE_URL))
                .json(&json!({ "bookId": book_id, "borrowerId": borrower_id }))
                .send()
                .await
                .expect("Failed to send request")
                .status()
        }
    };

    let (a, b) = tokio::join!(checkout(first["id"].clone()), checkout(second["id"].clone()));

    // Exactly one of the two racing checkouts gets the last copy
    let successes = [a, b].iter().filter(|s| s.as_u16() == 201).count();
    assert_eq!(successes, 1);
}

#[tokio::test]
#[ignore]
async fn test_borrowing_report_requires_date_range() {
    let client = Client::new();

    let response = client
        .get(format!("{}/analytics/borrowing-report", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_borrowing_report_is_a_csv_download() {
    let client = Client::new();
    let suffix = unique_suffix();
    let book = create_book(&client, &format!("isbn-{}", suffix), 1).await;
    let borrower = create_borrower(&client, &format!("csv-{}@example.org", suffix)).await;

    let response = client
        .post(format!("{}/borrowing/checkout", BASE_URL))
        .json(&json!({ "bookId": book["id"], "borrowerId": borrower["id"] }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    let response = client
        .get(format!(
            "{}/analytics/borrowing-report?startDate=1970-01-01&endDate=2999-12-31",
            BASE_URL
        ))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 200);
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/csv"));

    let body = response.text().await.expect("Failed to read body");
    assert!(body.starts_with("Book Title,Borrower Name,Borrower Email"));
}
