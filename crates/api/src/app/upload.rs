//! Multipart form parsing shared by the upload endpoints.

use axum::extract::Multipart;
use axum::extract::multipart::MultipartError;

use ethiscan_core::ImageUpload;

/// Fields of an upload form. Unknown fields are ignored.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub image: Option<ImageUpload>,
    pub pipeline: Option<String>,
}

pub async fn read_form(mut multipart: Multipart) -> Result<UploadForm, MultipartError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await? {
        match field.name() {
            Some("image") => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await?;
                // An empty file input still submits a part; treat it as absent.
                if bytes.is_empty() {
                    continue;
                }
                form.image = Some(ImageUpload {
                    bytes: bytes.to_vec(),
                    file_name,
                    content_type,
                });
            }
            Some("pipeline") => {
                form.pipeline = Some(field.text().await?);
            }
            _ => {}
        }
    }

    Ok(form)
}
