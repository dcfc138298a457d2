use axum::{Json, response::IntoResponse};

use tracing::info;

use crate::api::APIResponse;
use crate::books::BookService;

#[derive(Clone)]
pub struct AppState {
    pub books: BookService,
}

impl AppState {
    pub fn new(books: BookService) -> Self {
        Self { books }
    }
}

pub async fn healthcheck() -> impl IntoResponse {
    info!("got healthcheck request");
    Json(APIResponse::new_from_msg("ok"))
}
