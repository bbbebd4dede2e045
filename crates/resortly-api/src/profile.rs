// Profile photo upload (multipart)

use std::path::Path;

use reqwest::multipart::{Form, Part};
use secrecy::SecretString;
use serde::Deserialize;
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;

/// Form field the API expects the image under.
pub const PHOTO_FIELD: &str = "foto_pelanggan";

#[derive(Deserialize)]
struct PhotoData {
    foto_pelanggan: String,
}

impl ApiClient {
    /// Upload a profile photo from disk. Returns the stored photo path.
    pub async fn upload_profile_photo(
        &self,
        path: &Path,
        token: &SecretString,
    ) -> Result<String, Error> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map_or_else(|| "photo".to_owned(), |n| n.to_string_lossy().into_owned());
        debug!(%file_name, bytes = bytes.len(), "uploading profile photo");

        let part = Part::bytes(bytes)
            .file_name(file_name.clone())
            .mime_str(guess_mime(&file_name))?;
        let form = Form::new().part(PHOTO_FIELD, part);

        let data: PhotoData = self.post_multipart("profile/photo", form, Some(token)).await?;
        Ok(data.foto_pelanggan)
    }
}

fn guess_mime(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "jpg" | "jpeg" => "image/jpeg",
        _ => "application/octet-stream",
    }
}
