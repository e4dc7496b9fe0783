// Profile image hosting

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::CloudinaryConfig;

/// Folder every profile image is uploaded into
pub const PROFILE_IMAGE_FOLDER: &str = "profile_images";

/// Image upload failures
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("image hosting is not configured")]
    NotConfigured,

    #[error("upload request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("image host returned {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// An uploaded image's raw bytes plus what the client told us about it
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
}

/// Image hosting collaborator: takes bytes, returns a public URL
#[async_trait]
pub trait ImageUploader: Send + Sync {
    async fn upload(&self, image: ImageUpload, folder: &str) -> Result<String, UploadError>;
}

/// Uploader used when no image host is configured
pub struct DisabledUploader;

#[async_trait]
impl ImageUploader for DisabledUploader {
    async fn upload(&self, _image: ImageUpload, _folder: &str) -> Result<String, UploadError> {
        Err(UploadError::NotConfigured)
    }
}

#[derive(Debug, Deserialize)]
struct CloudinaryUploadResponse {
    secure_url: String,
}

/// Signed uploads to the Cloudinary image API
pub struct CloudinaryUploader {
    client: reqwest::Client,
    config: CloudinaryConfig,
}

impl CloudinaryUploader {
    /// Build an uploader with a request timeout
    pub fn new(config: CloudinaryConfig, timeout: Duration) -> Result<Self, UploadError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, config })
    }

    fn upload_url(&self) -> String {
        format!(
            "https://api.cloudinary.com/v1_1/{}/image/upload",
            self.config.cloud_name
        )
    }
}

/// SHA-256 request signature over the sorted signed parameters
///
/// `params` must already be sorted by key.
pub fn sign_params(params: &[(&str, &str)], api_secret: &str) -> String {
    let to_sign = params
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(api_secret.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[async_trait]
impl ImageUploader for CloudinaryUploader {
    async fn upload(&self, image: ImageUpload, folder: &str) -> Result<String, UploadError> {
        let timestamp = Utc::now().timestamp().to_string();
        let signature = sign_params(
            &[("folder", folder), ("timestamp", &timestamp)],
            &self.config.api_secret,
        );

        let size = image.bytes.len();
        let mut file = Part::bytes(image.bytes)
            .file_name(image.file_name.unwrap_or_else(|| "profile".to_string()));
        if let Some(content_type) = image.content_type {
            file = file.mime_str(&content_type)?;
        }

        let form = Form::new()
            .part("file", file)
            .text("folder", folder.to_string())
            .text("timestamp", timestamp)
            .text("api_key", self.config.api_key.clone())
            .text("signature", signature)
            .text("signature_algorithm", "sha256");

        debug!("Uploading {} byte image to folder {}", size, folder);
        let response = self.client.post(self.upload_url()).multipart(form).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UploadError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let uploaded: CloudinaryUploadResponse = response.json().await?;
        info!("Uploaded profile image to {}", uploaded.secure_url);
        Ok(uploaded.secure_url)
    }
}

#[cfg(test)]
pub use fake::FakeUploader;
