//! Retrieval route
//!
//! Lists the stored page images of a document and returns their URLs in
//! page order.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::state::AppState;
use crate::storage::sort_pages;

#[derive(Serialize)]
pub struct FlipbookResponse {
    pub pages: Vec<String>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/:doc_id", get(get_flipbook))
}

async fn get_flipbook(
    State(state): State<AppState>,
    Path(doc_id): Path<String>,
) -> Result<Json<FlipbookResponse>> {
    let mut pages = state.store().list_pages(&doc_id).await?;
    if pages.is_empty() {
        return Err(AppError::NotFound);
    }

    // Listing order is unspecified for both backends; the page sequence is
    // reconstructed from the index encoded in each storage key.
    sort_pages(&mut pages);

    tracing::debug!(doc_id = %doc_id, pages = pages.len(), "Flipbook resolved");

    Ok(Json(FlipbookResponse {
        pages: pages.into_iter().map(|p| p.url).collect(),
    }))
}
