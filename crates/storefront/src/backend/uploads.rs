//! Image upload pipeline for product media.

use futures::future::try_join_all;
use serde::Deserialize;
use tracing::instrument;

use super::types::ImageFile;
use super::{BackendClient, BackendError};

/// Response from `POST /files/product`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadResponse {
    file_name: String,
}

impl BackendClient {
    /// Upload a batch of image files.
    ///
    /// All uploads are issued concurrently and joined; the returned names
    /// are in input order regardless of completion order. Any single failure
    /// fails the whole batch with no partial result. An empty batch resolves
    /// immediately without a network call.
    ///
    /// # Errors
    ///
    /// Returns the first upload failure.
    #[instrument(skip(self, images), fields(count = images.len()))]
    pub async fn upload_images(
        &self,
        images: Vec<ImageFile>,
    ) -> Result<Vec<String>, BackendError> {
        if images.is_empty() {
            return Ok(Vec::new());
        }

        try_join_all(images.into_iter().map(|image| self.upload_image(image))).await
    }

    /// Upload a single image as a multipart request (field name `file`).
    async fn upload_image(&self, image: ImageFile) -> Result<String, BackendError> {
        let part = reqwest::multipart::Part::bytes(image.bytes)
            .file_name(image.file_name)
            .mime_str(&image.content_type)?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .inner
            .client
            .post(self.url("/files/product"))
            .multipart(form)
            .send()
            .await?;
        let uploaded: UploadResponse = Self::read_json(response).await?;

        Ok(uploaded.file_name)
    }
}
