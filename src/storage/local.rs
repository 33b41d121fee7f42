//! Local filesystem page store
//!
//! Pages live under `{root}/{doc_id}/pages/{n}.png`. The server mounts the
//! root directory at `/uploads`, so the resolved URL of a page is
//! `{public_url}/uploads/{doc_id}/pages/{n}.png`.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{PageObject, PageStore, StoreError};

#[derive(Debug, Clone)]
pub struct LocalPageStore {
    root: PathBuf,
    public_url: String,
}

impl LocalPageStore {
    pub fn new(root: PathBuf, public_url: impl Into<String>) -> Self {
        let public_url = public_url.into().trim_end_matches('/').to_string();
        Self { root, public_url }
    }

    fn pages_dir(&self, doc_id: &str) -> PathBuf {
        self.root.join(doc_id).join("pages")
    }

    fn page_url(&self, doc_id: &str, file_name: &str) -> String {
        format!("{}/uploads/{}/pages/{}", self.public_url, doc_id, file_name)
    }

    async fn write(&self, path: &PathBuf, key: &str, data: Vec<u8>) -> Result<(), StoreError> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::Write {
                    key: key.to_string(),
                    message: e.to_string(),
                })?;
        }
        tokio::fs::write(path, data)
            .await
            .map_err(|e| StoreError::Write {
                key: key.to_string(),
                message: e.to_string(),
            })
    }
}

#[async_trait]
impl PageStore for LocalPageStore {
    async fn put_page(
        &self,
        doc_id: &str,
        page_index: u32,
        data: Vec<u8>,
    ) -> Result<String, StoreError> {
        let file_name = format!("{}.png", page_index);
        let key = format!("{}/pages/{}", doc_id, file_name);
        let path = self.pages_dir(doc_id).join(&file_name);
        self.write(&path, &key, data).await?;
        Ok(self.page_url(doc_id, &file_name))
    }

    async fn put_source(&self, doc_id: &str, data: Vec<u8>) -> Result<(), StoreError> {
        let key = format!("{}/original.pdf", doc_id);
        let path = self.root.join(doc_id).join("original.pdf");
        self.write(&path, &key, data).await
    }

    async fn list_pages(&self, doc_id: &str) -> Result<Vec<PageObject>, StoreError> {
        let dir = self.pages_dir(doc_id);
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::Unavailable(e.to_string())),
        };

        let mut pages = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?
        {
            let file_name = entry.file_name().to_string_lossy().to_string();
            if !file_name.ends_with(".png") {
                continue;
            }
            let metadata = entry.metadata().await.ok();
            pages.push(PageObject {
                key: format!("{}/pages/{}", doc_id, file_name),
                url: self.page_url(doc_id, &file_name),
                size: metadata.as_ref().map(|m| m.len() as i64).unwrap_or(0),
                last_modified: metadata
                    .and_then(|m| m.modified().ok())
                    .map(DateTime::<Utc>::from),
            });
        }

        Ok(pages)
    }
}
