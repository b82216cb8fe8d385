//! HTTP handlers. Each one performs a single repository call and maps the
//! outcome to a status code and a generic message.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use bookshelf_http::{ApiResponse, AppError};

use super::models::{Book, CreateBook};
use super::repository::Repository;

const EMPTY_ID: &str = "id cannot be empty";

fn require_id(raw: &str) -> Result<&str, AppError> {
    let id = raw.trim();
    if id.is_empty() {
        return Err(AppError::missing_parameter(EMPTY_ID));
    }
    Ok(id)
}

/// `POST /create_books`. A body that fails to parse stops the request; nothing
/// is inserted.
pub async fn create_book(
    State(repository): State<Repository>,
    payload: Result<Json<CreateBook>, JsonRejection>,
) -> Result<ApiResponse, AppError> {
    let Json(book) =
        payload.map_err(|e| AppError::unprocessable("request failed").with_cause(e))?;

    let created = repository
        .create(book)
        .await
        .map_err(|e| AppError::bad_request("could not create a book").with_cause(e))?;

    tracing::debug!(id = created.id, "book created");
    Ok(ApiResponse::message("a book has been added"))
}

/// `DELETE /delete_book/{id}`. Deleting an unknown or already deleted id
/// succeeds.
pub async fn delete_book(
    State(repository): State<Repository>,
    Path(id): Path<String>,
) -> Result<ApiResponse, AppError> {
    let id = require_id(&id)?;

    let affected = repository
        .soft_delete(id)
        .await
        .map_err(|e| AppError::bad_request("could not delete a book").with_cause(e))?;

    if affected == 0 {
        tracing::debug!(id, "delete matched no live book");
    }
    Ok(ApiResponse::message("a book has been deleted"))
}

/// `GET /get_books/{id}`
pub async fn get_book(
    State(repository): State<Repository>,
    Path(id): Path<String>,
) -> Result<ApiResponse<Book>, AppError> {
    let id = require_id(&id)?;
    tracing::debug!(id, "fetching book");

    let book = repository
        .find(id)
        .await
        .map_err(|e| AppError::bad_request("could not get the book").with_cause(e))?;

    Ok(ApiResponse::with_data(
        "a book has been fetched",
        Book::from(book),
    ))
}

/// `GET /books`
pub async fn list_books(
    State(repository): State<Repository>,
) -> Result<ApiResponse<Vec<Book>>, AppError> {
    let books = repository
        .list()
        .await
        .map_err(|e| AppError::bad_request("could not get books").with_cause(e))?;

    Ok(ApiResponse::with_data(
        "books have been fetched",
        books.into_iter().map(Book::from).collect(),
    ))
}

/// Bound to the id-less variants of the delete and get routes.
pub async fn missing_id() -> AppError {
    AppError::missing_parameter(EMPTY_ID)
}
