use axum::{
    routing::{delete, get, post},
    Router,
};

use super::handlers;
use super::repository::Repository;
use crate::utils;

/// Builds the Books router, relative to the `/api` prefix.
pub fn router(repository: Repository) -> Router {
    let prefix = utils::log_prefix("books");
    tracing::info!(target: "bookshelf.routes", %prefix, "registering books routes");

    Router::new()
        .route("/create_books", post(handlers::create_book))
        .route("/delete_book/{id}", delete(handlers::delete_book))
        .route("/delete_book/", delete(handlers::missing_id))
        .route("/get_books/{id}", get(handlers::get_book))
        .route("/get_books/", get(handlers::missing_id))
        .route("/books", get(handlers::list_books))
        .with_state(repository)
}
