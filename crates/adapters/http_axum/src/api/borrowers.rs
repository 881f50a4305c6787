//! JSON REST handlers for borrowers.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use shelf_app::ports::{BookRepository, BorrowerRepository};
use shelf_domain::borrower::Borrower;
use shelf_domain::id::BorrowerId;

use super::{BookResponse, non_blank, parse_id};
use crate::error::ApiError;
use crate::state::AppState;

/// Request body for registering a borrower.
#[derive(Deserialize)]
pub struct CreateBorrowerRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Query string accepted by the list endpoint.
#[derive(Deserialize)]
pub struct ListQuery {
    pub email: Option<String>,
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<Borrower>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the get endpoint.
pub enum GetResponse {
    Ok(Json<Borrower>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the create endpoint.
pub enum CreateResponse {
    Created(Json<Borrower>),
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// Possible responses from the held-books endpoint.
pub enum BooksResponse {
    Ok(Json<Vec<BookResponse>>),
}

impl IntoResponse for BooksResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `GET /api/borrowers[?email=..]`
///
/// With `email`, the result holds at most one borrower.
pub async fn list<BR, UR>(
    State(state): State<AppState<BR, UR>>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<ListResponse, ApiError>
where
    BR: BookRepository + Send + Sync + 'static,
    UR: BorrowerRepository + Send + Sync + 'static,
{
    let Query(query) = query?;
    let borrowers = match non_blank(query.email) {
        Some(email) => state
            .borrower_service
            .find_by_email(&email)
            .await?
            .into_iter()
            .collect(),
        None => state.borrower_service.list_borrowers().await?,
    };
    Ok(ListResponse::Ok(Json(borrowers)))
}

/// `GET /api/borrowers/{id}`
pub async fn get<BR, UR>(
    State(state): State<AppState<BR, UR>>,
    Path(id): Path<String>,
) -> Result<GetResponse, ApiError>
where
    BR: BookRepository + Send + Sync + 'static,
    UR: BorrowerRepository + Send + Sync + 'static,
{
    let borrower_id: BorrowerId = parse_id("id", &id)?;
    let borrower = state.borrower_service.get_borrower(borrower_id).await?;
    Ok(GetResponse::Ok(Json(borrower)))
}

/// `POST /api/borrowers`
pub async fn create<BR, UR>(
    State(state): State<AppState<BR, UR>>,
    body: Result<Json<CreateBorrowerRequest>, JsonRejection>,
) -> Result<CreateResponse, ApiError>
where
    BR: BookRepository + Send + Sync + 'static,
    UR: BorrowerRepository + Send + Sync + 'static,
{
    let Json(req) = body?;
    let borrower = Borrower::builder()
        .name(req.name.unwrap_or_default())
        .email(req.email.unwrap_or_default())
        .build()?;
    let created = state.borrower_service.register_borrower(borrower).await?;
    Ok(CreateResponse::Created(Json(created)))
}

/// `GET /api/borrowers/{id}/books`
pub async fn books<BR, UR>(
    State(state): State<AppState<BR, UR>>,
    Path(id): Path<String>,
) -> Result<BooksResponse, ApiError>
where
    BR: BookRepository + Send + Sync + 'static,
    UR: BorrowerRepository + Send + Sync + 'static,
{
    let borrower_id: BorrowerId = parse_id("id", &id)?;
    let books = state.book_service.books_held_by(borrower_id).await?;
    Ok(BooksResponse::Ok(Json(
        books.into_iter().map(BookResponse::from).collect(),
    )))
}
