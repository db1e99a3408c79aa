//! Multipart image upload extractor.

use axum::{
    async_trait,
    extract::{FromRequest, Multipart, Request},
};

use crate::errors::AppError;

/// Name of the multipart part carrying the image.
pub const FILE_FIELD: &str = "file";

/// The `file` part of a multipart request.
#[derive(Debug)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[async_trait]
impl<S> FromRequest<S> for ImageUpload
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| AppError::bad_request(e.body_text()))?;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|_| AppError::bad_request("invalid multipart body"))?
        {
            if field.name() != Some(FILE_FIELD) {
                continue;
            }

            let file_name = field.file_name().unwrap_or_default().to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|_| AppError::bad_request("invalid file part"))?;

            return Ok(Self {
                file_name,
                bytes: bytes.to_vec(),
            });
        }

        Err(AppError::validation("file is required"))
    }
}
