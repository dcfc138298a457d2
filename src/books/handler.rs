//! HTTP handlers for `/api/books`

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::error::ApiError;
use crate::handler::AppState;
use crate::model::Book;

pub async fn get_all_books(State(state): State<AppState>) -> Result<Json<Vec<Book>>, ApiError> {
    let books = state.books.get_all_books().await?;
    tracing::info!(count = books.len(), "got books");
    Ok(Json(books))
}

pub async fn get_book_by_id(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Response, ApiError> {
    match state.books.get_book_by_id(id).await? {
        Some(book) => Ok(Json(book).into_response()),
        None => {
            tracing::info!(id, "book not found");
            Ok(StatusCode::NOT_FOUND.into_response())
        }
    }
}

pub async fn add_book(State(state): State<AppState>, Json(payload): Json<Book>) -> Result<Json<Book>, ApiError> {
    // ids are always assigned by the store on create
    let book = state.books.save_or_update_book(payload.without_id()).await?;
    tracing::info!(id = ?book.id, "created book");
    Ok(Json(book))
}

/// Replaces the whole record. Only existence is checked first; there is no
/// field-level merge with what was stored.
pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<Book>,
) -> Result<Response, ApiError> {
    let book = payload.with_id(id);

    if state.books.get_book_by_id(id).await?.is_none() {
        tracing::info!(id, "book not found for update");
        return Ok(StatusCode::NOT_FOUND.into_response());
    }

    let updated = state.books.save_or_update_book(book).await?;
    tracing::info!(id, "updated book");
    Ok((StatusCode::OK, Json(updated)).into_response())
}

pub async fn delete_book(State(state): State<AppState>, Path(id): Path<i64>) -> Result<StatusCode, ApiError> {
    state.books.delete_book(id).await?;
    tracing::info!(id, "deleted book");
    Ok(StatusCode::OK)
}
