//! JSON REST handlers for books and the lending workflow.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use shelf_app::ports::{BookFilter, BookRepository, BorrowerRepository};
use shelf_domain::book::Book;
use shelf_domain::error::{ShelfError, ValidationError};
use shelf_domain::id::{BookId, BorrowerId};

use super::{BookResponse, non_blank, parse_id};
use crate::error::ApiError;
use crate::state::AppState;

/// Request body for adding a copy to the catalog.
///
/// Missing fields are reported as validation errors rather than body
/// rejections.
#[derive(Deserialize)]
pub struct CreateBookRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
}

/// Request body for borrowing a copy.
#[derive(Deserialize)]
pub struct BorrowRequest {
    pub borrower_id: Option<String>,
}

/// Query string accepted by the list endpoint.
#[derive(Deserialize)]
pub struct ListQuery {
    pub title: Option<String>,
    pub author: Option<String>,
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<BookResponse>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the get, borrow and return endpoints.
pub enum GetResponse {
    Ok(Json<BookResponse>),
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
    Created(Json<BookResponse>),
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// `GET /api/books[?title=..&author=..]`
pub async fn list<BR, UR>(
    State(state): State<AppState<BR, UR>>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<ListResponse, ApiError>
where
    BR: BookRepository + Send + Sync + 'static,
    UR: BorrowerRepository + Send + Sync + 'static,
{
    let Query(query) = query?;
    let filter = BookFilter {
        title: non_blank(query.title),
        author: non_blank(query.author),
    };
    let books = state.book_service.list_books(&filter).await?;
    Ok(ListResponse::Ok(Json(
        books.into_iter().map(BookResponse::from).collect(),
    )))
}

/// `GET /api/books/{id}`
pub async fn get<BR, UR>(
    State(state): State<AppState<BR, UR>>,
    Path(id): Path<String>,
) -> Result<GetResponse, ApiError>
where
    BR: BookRepository + Send + Sync + 'static,
    UR: BorrowerRepository + Send + Sync + 'static,
{
    let book_id: BookId = parse_id("id", &id)?;
    let details = state.book_service.get_book(book_id).await?;
    Ok(GetResponse::Ok(Json(details.into())))
}

/// `POST /api/books`
pub async fn create<BR, UR>(
    State(state): State<AppState<BR, UR>>,
    body: Result<Json<CreateBookRequest>, JsonRejection>,
) -> Result<CreateResponse, ApiError>
where
    BR: BookRepository + Send + Sync + 'static,
    UR: BorrowerRepository + Send + Sync + 'static,
{
    let Json(req) = body?;
    let book = Book::builder()
        .title(req.title.unwrap_or_default())
        .author(req.author.unwrap_or_default())
        .isbn(req.isbn.unwrap_or_default())
        .build()?;
    let created = state.book_service.create_book(book).await?;
    Ok(CreateResponse::Created(Json(created.into())))
}

/// `PUT /api/books/{id}/borrow`
pub async fn borrow<BR, UR>(
    State(state): State<AppState<BR, UR>>,
    Path(id): Path<String>,
    body: Result<Json<BorrowRequest>, JsonRejection>,
) -> Result<GetResponse, ApiError>
where
    BR: BookRepository + Send + Sync + 'static,
    UR: BorrowerRepository + Send + Sync + 'static,
{
    let book_id: BookId = parse_id("id", &id)?;
    let Json(req) = body?;
    let raw = non_blank(req.borrower_id)
        .ok_or_else(|| ShelfError::from(ValidationError::MissingBorrowerId))?;
    let borrower_id: BorrowerId = parse_id("borrower_id", &raw)?;
    let details = state.book_service.borrow_book(book_id, borrower_id).await?;
    Ok(GetResponse::Ok(Json(details.into())))
}

/// `PUT /api/books/{id}/return`
pub async fn give_back<BR, UR>(
    State(state): State<AppState<BR, UR>>,
    Path(id): Path<String>,
) -> Result<GetResponse, ApiError>
where
    BR: BookRepository + Send + Sync + 'static,
    UR: BorrowerRepository + Send + Sync + 'static,
{
    let book_id: BookId = parse_id("id", &id)?;
    let details = state.book_service.return_book(book_id).await?;
    Ok(GetResponse::Ok(Json(details.into())))
}
