//! Signed upload and destroy calls against Cloudinary's REST API.

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::errors::AppError;
use crate::settings::AppConfig;

const API_BASE: &str = "https://api.cloudinary.com/v1_1";
const HOST_MARKER: &str = "cloudinary.com";

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Image host is not configured")]
    NotConfigured,

    #[error("Image host request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Image host rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },
}

impl From<MediaError> for AppError {
    fn from(err: MediaError) -> Self {
        match err {
            MediaError::NotConfigured => AppError::ServiceUnavailable(err.to_string()),
            other => AppError::InternalError(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UploadedImage {
    pub url: String,
    pub public_id: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageHost: Send + Sync {
    /// Uploads a `data:image/...;base64,` URL and returns the hosted location.
    async fn upload(&self, data_url: &str) -> Result<UploadedImage, MediaError>;
    async fn destroy(&self, public_id: &str) -> Result<(), MediaError>;
    /// Public id for URLs served by this host, `None` for anything else.
    fn public_id_for(&self, url: &str) -> Option<String>;
}

#[derive(Clone)]
pub struct CloudinaryClient {
    http: reqwest::Client,
    cloud_name: String,
    api_key: String,
    api_secret: String,
    folder: String,
}

#[derive(Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: String,
}

#[derive(Deserialize)]
struct DestroyResponse {
    result: String,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

impl CloudinaryClient {
    pub fn new(config: &AppConfig) -> Self {
        CloudinaryClient {
            http: reqwest::Client::new(),
            cloud_name: config.cloudinary_cloud_name.clone(),
            api_key: config.cloudinary_api_key.clone(),
            api_secret: config.cloudinary_api_secret.clone(),
            folder: config.image_folder.clone(),
        }
    }

    fn is_configured(&self) -> bool {
        !(self.cloud_name.is_empty() || self.api_key.is_empty() || self.api_secret.is_empty())
    }

    fn endpoint(&self, action: &str) -> String {
        format!("{API_BASE}/{}/image/{action}", self.cloud_name)
    }

    async fn post_signed<T: for<'de> Deserialize<'de>>(
        &self,
        action: &str,
        mut params: Vec<(&'static str, String)>,
    ) -> Result<T, MediaError> {
        if !self.is_configured() {
            return Err(MediaError::NotConfigured);
        }

        params.push(("timestamp", Utc::now().timestamp().to_string()));
        let signature = sign(&params, &self.api_secret);
        params.push(("signature", signature));
        params.push(("signature_algorithm", "sha256".to_string()));
        params.push(("api_key", self.api_key.clone()));

        let response = self.http.post(self.endpoint(action)).form(&params).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response
                .json::<ErrorEnvelope>()
                .await
                .map(|e| e.error.message)
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(MediaError::Rejected { status: status.as_u16(), message });
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl ImageHost for CloudinaryClient {
    async fn upload(&self, data_url: &str) -> Result<UploadedImage, MediaError> {
        let uploaded: UploadResponse = self
            .post_signed(
                "upload",
                vec![("file", data_url.to_string()), ("folder", self.folder.clone())],
            )
            .await?;

        tracing::info!(public_id = %uploaded.public_id, "Image uploaded");
        Ok(UploadedImage { url: uploaded.secure_url, public_id: uploaded.public_id })
    }

    async fn destroy(&self, public_id: &str) -> Result<(), MediaError> {
        let response: DestroyResponse = self
            .post_signed("destroy", vec![("public_id", public_id.to_string())])
            .await?;

        match response.result.as_str() {
            "ok" | "not found" => Ok(()),
            other => Err(MediaError::Rejected { status: 200, message: other.to_string() }),
        }
    }

    fn public_id_for(&self, url: &str) -> Option<String> {
        public_id_from_url(url, &self.folder)
    }
}

/// `https://res.cloudinary.com/<cloud>/image/upload/v1/<folder>/<name>.<ext>` maps to
/// `<folder>/<name>`.
pub fn public_id_from_url(url: &str, folder: &str) -> Option<String> {
    if !url.contains(HOST_MARKER) {
        return None;
    }

    let last_segment = url.split('?').next()?.rsplit('/').next()?;
    let name = last_segment
        .rsplit_once('.')
        .map_or(last_segment, |(stem, _ext)| stem);

    if name.is_empty() {
        return None;
    }
    Some(format!("{folder}/{name}"))
}

/// Hex SHA-256 of the `k=v` pairs sorted by key and joined with `&`, followed by the secret.
/// The `file` parameter is not part of the signature.
fn sign(params: &[(&str, String)], api_secret: &str) -> String {
    let mut signed: Vec<&(&str, String)> = params.iter().filter(|(k, _)| *k != "file").collect();
    signed.sort_by(|a, b| a.0.cmp(b.0));

    let to_sign = signed
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::test_support::test_config;

    #[test]
    fn extracts_public_id_from_hosted_url() {
        let url = "https://res.cloudinary.com/demo/image/upload/v1712345/art-portfolio/sunset_ab12.jpg";
        assert_eq!(
            public_id_from_url(url, "art-portfolio").as_deref(),
            Some("art-portfolio/sunset_ab12")
        );
    }

    #[test]
    fn foreign_urls_have_no_public_id() {
        assert_eq!(public_id_from_url("/images/sunset.jpg", "art-portfolio"), None);
        assert_eq!(public_id_from_url("https://example.com/a.png", "art-portfolio"), None);
    }

    #[test]
    fn signature_sorts_params_and_skips_file() {
        let params = vec![
            ("timestamp", "1315060510".to_string()),
            ("file", "data:image/png;base64,AAAA".to_string()),
            ("folder", "art-portfolio".to_string()),
        ];

        let mut expected = Sha256::new();
        expected.update(b"folder=art-portfolio&timestamp=1315060510abcd");
        assert_eq!(sign(&params, "abcd"), hex::encode(expected.finalize()));
    }

    #[tokio::test]
    async fn unconfigured_client_refuses_to_call_out() {
        let mut config = test_config();
        config.cloudinary_api_secret.clear();
        let client = CloudinaryClient::new(&config);

        let result = client.destroy("art-portfolio/x").await;
        assert!(matches!(result, Err(MediaError::NotConfigured)));
    }
}
