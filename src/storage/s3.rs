//! S3-compatible page store
//!
//! Wraps the AWS SDK for S3-compatible storage access. Works against MinIO,
//! Cloudflare R2, Backblaze B2, and AWS S3. Page URLs are presigned GET
//! links with a configurable expiry.

use std::time::Duration;

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::{
    config::{Credentials, Region},
    presigning::PresigningConfig,
    primitives::ByteStream,
    Client,
};
use chrono::DateTime;

use crate::config::S3Config;

use super::{PageObject, PageStore, StoreError};

#[derive(Clone)]
pub struct S3PageStore {
    client: Client,
    bucket: String,
    url_expiry: Duration,
}

impl S3PageStore {
    /// Create a new store from configuration.
    pub async fn new(config: &S3Config) -> Result<Self, StoreError> {
        let credentials = Credentials::new(
            &config.access_key,
            &config.secret_key,
            None,
            None,
            "flipbook-server",
        );

        let region = config
            .region
            .clone()
            .unwrap_or_else(|| "us-east-1".to_string());

        let s3_config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .endpoint_url(&config.endpoint)
            .region(Region::new(region))
            .credentials_provider(credentials)
            .force_path_style(true) // Required for MinIO and other S3-compatible services
            .build();

        let client = Client::from_conf(s3_config);

        let bucket = config.bucket.clone();
        match client.head_bucket().bucket(&bucket).send().await {
            Ok(_) => {
                tracing::info!("Connected to S3 bucket: {}", bucket);
            }
            Err(e) => {
                tracing::warn!(
                    "Could not verify bucket {}: {}. Will attempt operations anyway.",
                    bucket,
                    e
                );
            }
        }

        Ok(Self {
            client,
            bucket,
            url_expiry: Duration::from_secs(config.url_expiry_secs),
        })
    }

    fn page_key(doc_id: &str, page_index: u32) -> String {
        format!("documents/{}/pages/{}.png", doc_id, page_index)
    }

    fn source_key(doc_id: &str) -> String {
        format!("documents/{}/original.pdf", doc_id)
    }

    fn pages_prefix(doc_id: &str) -> String {
        format!("documents/{}/pages/", doc_id)
    }

    async fn presigned_url(&self, key: &str) -> Result<String, StoreError> {
        let presigning = PresigningConfig::expires_in(self.url_expiry)
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let request = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(|e| StoreError::Unavailable(format!("failed to presign {}: {}", key, e)))?;

        Ok(request.uri().to_string())
    }

    async fn put_object(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StoreError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|e| StoreError::Write {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        Ok(())
    }
}

#[async_trait]
impl PageStore for S3PageStore {
    async fn put_page(
        &self,
        doc_id: &str,
        page_index: u32,
        data: Vec<u8>,
    ) -> Result<String, StoreError> {
        let key = Self::page_key(doc_id, page_index);
        self.put_object(&key, data, "image/png").await?;
        self.presigned_url(&key).await
    }

    async fn put_source(&self, doc_id: &str, data: Vec<u8>) -> Result<(), StoreError> {
        let key = Self::source_key(doc_id);
        self.put_object(&key, data, "application/pdf").await
    }

    async fn list_pages(&self, doc_id: &str) -> Result<Vec<PageObject>, StoreError> {
        let prefix = Self::pages_prefix(doc_id);
        let mut pages = Vec::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let mut request = self
                .client
                .list_objects_v2()
                .bucket(&self.bucket)
                .prefix(&prefix);

            if let Some(token) = continuation_token.take() {
                request = request.continuation_token(token);
            }

            let response = request.send().await.map_err(|e| {
                StoreError::Unavailable(format!("failed to list {}: {}", prefix, e))
            })?;

            for obj in response.contents() {
                let Some(key) = obj.key() else { continue };
                let url = self.presigned_url(key).await?;
                pages.push(PageObject {
                    key: key.to_string(),
                    url,
                    size: obj.size().unwrap_or(0),
                    last_modified: obj
                        .last_modified()
                        .and_then(|dt| DateTime::from_timestamp(dt.secs(), dt.subsec_nanos())),
                });
            }

            if !response.is_truncated().unwrap_or(false) {
                break;
            }
            continuation_token = response.next_continuation_token().map(|s| s.to_string());
        }

        Ok(pages)
    }
}
