use base64::{Engine as _, engine::general_purpose::STANDARD};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{
    constants::{ALLOWED_IMAGE_TYPES, MAX_IMAGE_BYTES},
    errors::AppError,
    infrastructure::media::cloudinary::ImageHost,
};

static DATA_URL_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^data:image/([a-zA-Z+]+);base64,").unwrap_or_else(|_| unreachable!())
});

/// Enough decoded bytes for magic-number detection.
const SNIFF_BASE64_CHARS: usize = 64;

#[derive(Debug, Deserialize)]
pub struct ImageUploadRequest {
    pub image: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageUploadResponse {
    pub image_path: String,
    pub public_id: String,
}

/// Checks a `data:image/<type>;base64,<payload>` URL before it leaves the server.
pub fn validate_image_data_url(data_url: &str) -> Result<(), AppError> {
    if data_url.trim().is_empty() {
        return Err(AppError::BadRequest("No image data provided".into()));
    }
    if !data_url.starts_with("data:image/") {
        return Err(AppError::BadRequest("Invalid image format".into()));
    }

    let captures = DATA_URL_HEADER
        .captures(data_url)
        .ok_or_else(|| AppError::BadRequest("Invalid image data format".into()))?;

    let mime = captures[1].to_lowercase();
    if !ALLOWED_IMAGE_TYPES.contains(&mime.as_str()) {
        return Err(AppError::BadRequest(format!(
            "Unsupported image type. Allowed types: {}",
            ALLOWED_IMAGE_TYPES.join(", ")
        )));
    }

    let payload = &data_url[captures[0].len()..];
    let estimated_bytes = payload.len() * 3 / 4;
    if estimated_bytes > MAX_IMAGE_BYTES {
        return Err(AppError::BadRequest("Image size exceeds 5MB limit".into()));
    }

    // Decode only a prefix, trimmed to a whole number of base64 quanta.
    let sniff_len = payload.len().min(SNIFF_BASE64_CHARS) / 4 * 4;
    let head = STANDARD
        .decode(&payload[..sniff_len])
        .map_err(|_| AppError::BadRequest("Invalid base64 image data".into()))?;
    if !infer::is_image(&head) {
        return Err(AppError::BadRequest("Uploaded data is not a recognised image".into()));
    }

    Ok(())
}

pub struct MediaHandler<H>
where
    H: ImageHost,
{
    pub image_host: H,
}

impl<H> MediaHandler<H>
where
    H: ImageHost,
{
    pub fn new(image_host: H) -> Self {
        MediaHandler { image_host }
    }

    pub async fn upload_image(&self, request: ImageUploadRequest) -> Result<ImageUploadResponse, AppError> {
        let data_url = request.image.unwrap_or_default();
        validate_image_data_url(&data_url)?;

        let uploaded = self.image_host.upload(&data_url).await?;
        Ok(ImageUploadResponse {
            image_path: uploaded.url,
            public_id: uploaded.public_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::media::cloudinary::{MockImageHost, UploadedImage};

    // 1x1 transparent PNG.
    const PNG_B64: &str =
        "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAQAAAC1HAwCAAAAC0lEQVR42mNkYAAAAAYAAjCB0C8AAAAASUVORK5CYII=";

    fn png_data_url() -> String {
        format!("data:image/png;base64,{PNG_B64}")
    }

    #[test]
    fn accepts_small_png() {
        assert!(validate_image_data_url(&png_data_url()).is_ok());
    }

    #[test]
    fn rejects_non_image_data_urls() {
        let err = validate_image_data_url("data:text/plain;base64,aGVsbG8=").unwrap_err();
        assert!(matches!(err, AppError::BadRequest(msg) if msg == "Invalid image format"));
    }

    #[test]
    fn rejects_unsupported_types() {
        let err = validate_image_data_url(&format!("data:image/tiff;base64,{PNG_B64}")).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(msg) if msg.starts_with("Unsupported image type")));
    }

    #[test]
    fn rejects_oversized_payloads() {
        let payload = "A".repeat(MAX_IMAGE_BYTES / 3 * 4 + 8);
        let err = validate_image_data_url(&format!("data:image/png;base64,{payload}")).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(msg) if msg.contains("5MB")));
    }

    #[test]
    fn rejects_payload_that_is_not_an_image() {
        // "hello world, this is plain text!!" base64 encoded.
        let err = validate_image_data_url("data:image/png;base64,aGVsbG8gd29ybGQsIHRoaXMgaXMgcGxhaW4gdGV4dCEh")
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(msg) if msg.contains("not a recognised image")));
    }

    #[tokio::test]
    async fn valid_upload_returns_hosted_url() {
        let mut host = MockImageHost::new();
        host.expect_upload().times(1).returning(|_| {
            Ok(UploadedImage {
                url: "https://res.cloudinary.com/demo/image/upload/v1/art-portfolio/a.png".into(),
                public_id: "art-portfolio/a".into(),
            })
        });

        let response = MediaHandler::new(host)
            .upload_image(ImageUploadRequest { image: Some(png_data_url()) })
            .await
            .unwrap();
        assert!(response.image_path.contains("cloudinary"));
    }

    #[tokio::test]
    async fn missing_image_never_reaches_host() {
        let mut host = MockImageHost::new();
        host.expect_upload().never();

        let err = MediaHandler::new(host)
            .upload_image(ImageUploadRequest { image: None })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(msg) if msg == "No image data provided"));
    }
}
