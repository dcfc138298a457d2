use axum::{Router, routing::get};

use super::handler;
use crate::handler::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::get_all_books).post(handler::add_book))
        .route(
            "/:id",
            get(handler::get_book_by_id)
                .put(handler::update_book)
                .delete(handler::delete_book),
        )
}
