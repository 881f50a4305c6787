//! End-to-end smoke tests for the full shelfd stack.
//!
//! Each test spins up the complete application (in-memory `SQLite`, real repos,
//! real services, real axum router) and exercises the HTTP layer via
//! `tower::ServiceExt::oneshot` — no TCP port is bound.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use shelf_adapter_http_axum::router;
use shelf_adapter_http_axum::state::AppState;
use shelf_adapter_storage_sqlite_sqlx::{Config, SqliteBookRepository, SqliteBorrowerRepository};
use shelf_app::services::book_service::BookService;
use shelf_app::services::borrower_service::BorrowerService;
use tower::ServiceExt;

/// Build a fully-wired router backed by an in-memory `SQLite` database.
async fn app() -> axum::Router {
    let db = Config {
        database_url: "sqlite::memory:".to_string(),
    }
    .build()
    .await
    .expect("in-memory database should initialise");

    let pool = db.pool().clone();
    let book_repo = SqliteBookRepository::new(pool.clone());
    let borrower_repo = SqliteBorrowerRepository::new(pool);

    let state = AppState::new(
        BookService::new(book_repo, borrower_repo.clone()),
        BorrowerService::new(borrower_repo),
    );

    router::build(state)
}

/// Send one request and decode the JSON response body.
async fn call(
    app: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<&str>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let resp = app.clone().oneshot(request).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn create_book(
    app: &axum::Router,
    title: &str,
    author: &str,
    isbn: &str,
) -> (StatusCode, Value) {
    let body = serde_json::json!({ "title": title, "author": author, "isbn": isbn }).to_string();
    call(app, "POST", "/api/books", Some(&body)).await
}

async fn register(app: &axum::Router, name: &str, email: &str) -> String {
    let body = serde_json::json!({ "name": name, "email": email }).to_string();
    let (status, created) = call(app, "POST", "/api/borrowers", Some(&body)).await;
    assert_eq!(status, StatusCode::CREATED);
    created["id"].as_str().unwrap().to_string()
}

async fn borrow(app: &axum::Router, book_id: &str, borrower_id: &str) -> (StatusCode, Value) {
    let body = serde_json::json!({ "borrower_id": borrower_id }).to_string();
    call(app, "PUT", &format!("/api/books/{book_id}/borrow"), Some(&body)).await
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_return_ok_when_health_check_called() {
    let resp = app()
        .await
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_create_and_fetch_book() {
    let app = app().await;

    let (status, created) =
        create_book(&app, "The Hobbit", "J.R.R. Tolkien", "0-306-40615-2").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["borrowed"], false);

    let id = created["id"].as_str().unwrap();
    let (status, fetched) = call(&app, "GET", &format!("/api/books/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["title"], "The Hobbit");
    assert_eq!(fetched["isbn"], "0-306-40615-2");
}

#[tokio::test]
async fn should_reject_book_with_invalid_isbn() {
    let app = app().await;

    let (status, body) = create_book(&app, "The Hobbit", "J.R.R. Tolkien", "9780306406158").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
    assert!(body["errors"]["isbn"].is_string());

    let (_, list) = call(&app, "GET", "/api/books", None).await;
    assert_eq!(list, serde_json::json!([]));
}

#[tokio::test]
async fn should_admit_additional_copy_with_same_metadata() {
    let app = app().await;

    let (first, _) = create_book(&app, "The Hobbit", "J.R.R. Tolkien", "9780306406157").await;
    let (second, _) = create_book(&app, "The Hobbit", "J.R.R. Tolkien", "9780306406157").await;
    assert_eq!(first, StatusCode::CREATED);
    assert_eq!(second, StatusCode::CREATED);

    let (_, list) = call(&app, "GET", "/api/books", None).await;
    assert_eq!(list.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn should_reject_reused_isbn_with_different_title() {
    let app = app().await;

    create_book(&app, "The Hobbit", "J.R.R. Tolkien", "9780306406157").await;
    let (status, body) =
        create_book(&app, "The Silmarillion", "J.R.R. Tolkien", "9780306406157").await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Conflict");
}

#[tokio::test]
async fn should_filter_books_by_title_and_author() {
    let app = app().await;

    create_book(&app, "The Hobbit", "J.R.R. Tolkien", "0306406152").await;
    create_book(&app, "Emma", "Jane Austen", "080442957X").await;

    let (_, by_title) = call(&app, "GET", "/api/books?title=hob", None).await;
    assert_eq!(by_title.as_array().unwrap().len(), 1);
    assert_eq!(by_title[0]["title"], "The Hobbit");

    let (_, by_author) = call(&app, "GET", "/api/books?author=AUSTEN", None).await;
    assert_eq!(by_author.as_array().unwrap().len(), 1);
    assert_eq!(by_author[0]["title"], "Emma");
}

// ---------------------------------------------------------------------------
// Borrowers
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_reject_duplicate_borrower_email() {
    let app = app().await;

    register(&app, "John Doe", "john@example.com").await;
    let (status, body) = call(
        &app,
        "POST",
        "/api/borrowers",
        Some(r#"{"name":"Johnny","email":"JOHN@example.com"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["status"], 409);
}

#[tokio::test]
async fn should_find_borrower_by_email() {
    let app = app().await;

    let id = register(&app, "John Doe", "john@example.com").await;
    let (status, found) = call(&app, "GET", "/api/borrowers?email=John@Example.com", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(found.as_array().unwrap().len(), 1);
    assert_eq!(found[0]["id"], id.as_str());
}

// ---------------------------------------------------------------------------
// Lending workflow
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_complete_borrow_and_return_cycle() {
    let app = app().await;

    let (_, book) = create_book(&app, "The Hobbit", "J.R.R. Tolkien", "0306406152").await;
    let book_id = book["id"].as_str().unwrap().to_string();
    let borrower_id = register(&app, "John Doe", "john@example.com").await;

    // Borrow
    let (status, lent) = borrow(&app, &book_id, &borrower_id).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(lent["borrowed"], true);
    assert_eq!(lent["borrower_id"], borrower_id.as_str());
    assert_eq!(lent["borrower_name"], "John Doe");
    assert!(lent["borrowed_at"].is_string());

    // Held books
    let (status, held) = call(
        &app,
        "GET",
        &format!("/api/borrowers/{borrower_id}/books"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(held.as_array().unwrap().len(), 1);

    // Second borrow is a conflict, whoever asks
    let other = register(&app, "Jane Doe", "jane@example.com").await;
    let (status, _) = borrow(&app, &book_id, &other).await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Return
    let (status, returned) = call(&app, "PUT", &format!("/api/books/{book_id}/return"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(returned["borrowed"], false);
    assert!(returned.get("borrower_id").is_none());

    // Returning again fails
    let (status, body) = call(&app, "PUT", &format!("/api/books/{book_id}/return"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Book is not currently borrowed");
}

#[tokio::test]
async fn should_return_not_found_when_borrower_unknown() {
    let app = app().await;

    let (_, book) = create_book(&app, "The Hobbit", "J.R.R. Tolkien", "0306406152").await;
    let book_id = book["id"].as_str().unwrap();

    let (status, body) = borrow(&app, book_id, "6f1c2a5e-9d1b-4a3e-8c55-2d1f0e8b7a90").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["message"].as_str().unwrap().starts_with("Borrower not found"));

    let (_, fetched) = call(&app, "GET", &format!("/api/books/{book_id}"), None).await;
    assert_eq!(fetched["borrowed"], false);
}

#[tokio::test]
async fn should_return_not_found_when_book_unknown() {
    let app = app().await;

    let borrower_id = register(&app, "John Doe", "john@example.com").await;
    let (status, body) = borrow(&app, "6f1c2a5e-9d1b-4a3e-8c55-2d1f0e8b7a90", &borrower_id).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["message"].as_str().unwrap().starts_with("Book not found"));
}
