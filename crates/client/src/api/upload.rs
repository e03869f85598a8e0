//! Recipe image upload.

use reqwest::Method;
use reqwest::multipart::{Form, Part};
use tracing::{info, instrument};

use super::{ALLOWED_IMAGE_TYPES, ApiClient, UploadFile, UploadResponse};
use crate::error::ApiError;

impl ApiClient {
    /// Upload an image as the multipart field `file`.
    ///
    /// The request carries no JSON content type; reqwest writes the
    /// multipart header with its boundary.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::AuthRequired` without a token,
    /// `ApiError::Validation` for a type other than PNG, JPEG or GIF,
    /// `ApiError::Parse` if the response has no `image_url`, or the
    /// transport/HTTP error.
    #[instrument(skip(self, file), fields(file_name = %file.file_name, content_type = %file.content_type))]
    pub async fn upload_image(&self, file: UploadFile) -> Result<UploadResponse, ApiError> {
        self.require_token()?;
        if !file.is_allowed_image() {
            return Err(ApiError::Validation(format!(
                "Invalid file type {}; expected one of {}",
                file.content_type,
                ALLOWED_IMAGE_TYPES.join(", ")
            )));
        }

        let content_type = file.content_type.to_ascii_lowercase();
        let part = Part::bytes(file.bytes)
            .file_name(file.file_name)
            .mime_str(&content_type)
            .map_err(|e| ApiError::Validation(format!("Invalid file type: {e}")))?;
        let form = Form::new().part("file", part);

        let uploaded: UploadResponse = self
            .send(self.request(Method::POST, self.url("/upload")).multipart(form))
            .await?
            .ok_or_else(|| ApiError::Parse("upload response was empty".to_string()))?;

        info!(image_url = %uploaded.image_url, "Image uploaded");
        Ok(uploaded)
    }
}
