//! Ingestion route
//!
//! Accepts a PDF via multipart upload, rasterizes every page to a PNG and
//! persists the images through the configured page store. Ingestion is
//! all-pages-or-error: a rejected conversion or failed page write fails the
//! whole request.

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Largest accepted document payload.
const MAX_UPLOAD_SIZE: usize = 100 * 1024 * 1024;

/// Multipart field names that may carry the document.
const FILE_FIELDS: [&str; 2] = ["file", "pdf"];

#[derive(Serialize)]
pub struct UploadResponse {
    pub id: String,
    pub share_url: String,
    pub pages: Vec<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(upload_document))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_SIZE))
}

async fn upload_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Lecture du formulaire impossible: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();
        if !FILE_FIELDS.contains(&name.as_str()) {
            continue;
        }

        let filename = field.file_name().unwrap_or("").to_string();
        let content_type = field.content_type().unwrap_or("").to_string();
        validate_document(&filename, &content_type)?;

        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::InvalidInput(format!("Lecture du fichier impossible: {}", e)))?
            .to_vec();

        let doc_id = Uuid::new_v4().simple().to_string();
        tracing::info!(
            doc_id = %doc_id,
            filename = %filename,
            size = data.len(),
            "Ingesting document"
        );

        let images = state
            .rasterizer()
            .rasterize(data.clone())
            .await
            .map_err(|e| AppError::Conversion(e.to_string()))?;

        let store = state.store();
        store.put_source(&doc_id, data).await?;

        // Pages are written sequentially; the returned list is built from
        // the 1-based page index, never from completion order.
        let mut pages = Vec::with_capacity(images.len());
        for (index, image) in images.into_iter().enumerate() {
            let url = store.put_page(&doc_id, (index + 1) as u32, image).await?;
            pages.push(url);
        }

        tracing::info!(doc_id = %doc_id, pages = pages.len(), "Document ingested");

        return Ok((
            StatusCode::CREATED,
            Json(UploadResponse {
                share_url: state.share_url(&doc_id),
                id: doc_id,
                pages,
            }),
        ));
    }

    Err(AppError::InvalidInput("Aucun fichier fourni".to_string()))
}

/// Weak heuristic check: accept when the filename ends in `.pdf` or the
/// declared content type is `application/pdf`. No content sniffing; a
/// payload that lies here still fails at conversion.
fn validate_document(filename: &str, content_type: &str) -> Result<()> {
    if filename.to_lowercase().ends_with(".pdf") || content_type == "application/pdf" {
        Ok(())
    } else {
        Err(AppError::InvalidInput(
            "Le fichier doit être un PDF".to_string(),
        ))
    }
}
