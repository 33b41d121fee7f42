//! Page artifact storage
//!
//! The ingestion and retrieval handlers are written against the [`PageStore`]
//! trait only. Two backends implement it: the local filesystem and
//! S3-compatible object stores (MinIO, Cloudflare R2, Backblaze B2, AWS S3).

mod local;
mod s3;
mod types;

pub use local::LocalPageStore;
pub use s3::S3PageStore;
pub use types::{page_index_from_key, sort_pages, PageObject};

use async_trait::async_trait;
use thiserror::Error;

/// Storage backend errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// A write was attempted and rejected by the backend.
    #[error("failed to write {key}: {message}")]
    Write { key: String, message: String },

    /// The backend itself could not be reached or enumerated.
    #[error("storage backend unreachable: {0}")]
    Unavailable(String),
}

/// Durable store for page artifacts, keyed by document id and page index.
///
/// Keys are namespaced by the document identifier, so concurrent ingestions
/// never collide and no locking is required.
#[async_trait]
pub trait PageStore: Send + Sync {
    /// Persist one page image, overwriting on conflict. Returns the
    /// publicly resolvable URL of the artifact.
    async fn put_page(
        &self,
        doc_id: &str,
        page_index: u32,
        data: Vec<u8>,
    ) -> Result<String, StoreError>;

    /// Persist the original submitted document next to its pages.
    async fn put_source(&self, doc_id: &str, data: Vec<u8>) -> Result<(), StoreError>;

    /// Enumerate the page artifacts of a document. Listing order is NOT
    /// guaranteed; an unknown document yields an empty listing.
    async fn list_pages(&self, doc_id: &str) -> Result<Vec<PageObject>, StoreError>;
}
