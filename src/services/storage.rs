//! Object storage client for service images
//!
//! Uploads go to the hosted storage REST API as the calling user, so bucket
//! policies apply exactly as they would for a direct upload from the app.

use anyhow::{bail, Context, Result};
use chrono::Utc;
use futures::future::join_all;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::config::Settings;

/// One file taken from a multipart body
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Clone)]
pub struct StorageClient {
    client: Client,
    base_url: String,
    anon_key: String,
    bucket: String,
    timeout: Duration,
}

impl StorageClient {
    pub fn new(client: Client, settings: &Settings) -> Self {
        Self {
            client,
            base_url: settings.supabase_url.trim_end_matches('/').to_string(),
            anon_key: settings.supabase_anon_key.clone(),
            bucket: settings.storage_bucket.clone(),
            timeout: Duration::from_secs(settings.storage_timeout_seconds),
        }
    }

    pub fn public_url(&self, object_name: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, self.bucket, object_name
        )
    }

    /// Upload a single image and return its public URL
    #[instrument(skip(self, image, token), fields(file = %image.file_name))]
    pub async fn upload(&self, image: &ImageUpload, object_name: &str, token: &str) -> Result<String> {
        let url = format!(
            "{}/storage/v1/object/{}/{}",
            self.base_url, self.bucket, object_name
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .header("apikey", &self.anon_key)
            .header(reqwest::header::CONTENT_TYPE, &image.content_type)
            .timeout(self.timeout)
            .body(image.bytes.clone())
            .send()
            .await
            .context("Storage request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("Storage upload returned {}: {}", status, body);
        }

        debug!(object_name, "Image uploaded");
        Ok(self.public_url(object_name))
    }

    /// Upload every image concurrently. Failed uploads are logged and left
    /// out; the URLs that succeeded keep the input order.
    pub async fn upload_all(&self, images: &[ImageUpload], token: &str) -> Vec<String> {
        let stamp = Utc::now().timestamp_millis();

        let uploads = images.iter().enumerate().map(|(index, image)| {
            let name = object_name(stamp, index, &image.file_name);
            async move { (index, self.upload(image, &name, token).await) }
        });

        join_all(uploads)
            .await
            .into_iter()
            .filter_map(|(index, result)| match result {
                Ok(url) => Some(url),
                Err(e) => {
                    warn!(index, error = %e, "Image upload failed, skipping");
                    None
                }
            })
            .collect()
    }
}

/// `<millis>-<index>-<file name>` with anything outside `[A-Za-z0-9._-]`
/// replaced, so names never collide within one form and stay URL-safe.
fn object_name(stamp: i64, index: usize, file_name: &str) -> String {
    let cleaned: String = file_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = if cleaned.is_empty() {
        "image".to_string()
    } else {
        cleaned
    };
    format!("{}-{}-{}", stamp, index, cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_settings;

    #[test]
    fn test_object_name_sanitized() {
        assert_eq!(object_name(1700, 0, "mi foto.jpg"), "1700-0-mi_foto.jpg");
        assert_eq!(object_name(1700, 2, ""), "1700-2-image");
        assert_eq!(object_name(1700, 1, "../x.png"), "1700-1-.._x.png");
    }

    #[test]
    fn test_public_url() {
        let storage = StorageClient::new(Client::new(), &test_settings());
        assert_eq!(
            storage.public_url("1-0-a.jpg"),
            "http://localhost:54321/storage/v1/object/public/service-images/1-0-a.jpg"
        );
    }

    #[tokio::test]
    async fn test_failed_uploads_are_skipped() {
        let mut settings = test_settings();
        // Nothing listens on port 9, every upload fails to connect
        settings.supabase_url = "http://127.0.0.1:9".to_string();
        settings.storage_timeout_seconds = 1;
        let storage = StorageClient::new(Client::new(), &settings);

        let images = vec![ImageUpload {
            file_name: "a.jpg".to_string(),
            content_type: "image/jpeg".to_string(),
            bytes: vec![1, 2, 3],
        }];

        assert!(storage.upload_all(&images, "token").await.is_empty());
        assert!(storage.upload_all(&[], "token").await.is_empty());
    }
}
