use uuid::Uuid;

use crate::domain::repository::FileStore;
use crate::error::StoreError;

pub const MAX_UPLOAD_MIB: usize = 5;
pub const MAX_UPLOAD_BYTES: usize = MAX_UPLOAD_MIB * 1024 * 1024;
/// Most files accepted in one request.
pub const MAX_FILES_PER_UPLOAD: usize = 10;

/// Public URL prefix the upload directory is served under.
pub const UPLOADS_URL_PREFIX: &str = "/uploads";

/// File extension for an accepted image content type.
fn extension_for(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "image/gif" => Some("gif"),
        _ => None,
    }
}

/// Image format from the file's leading bytes, as an extension.
fn sniff_extension(bytes: &[u8]) -> Option<&'static str> {
    match bytes {
        [0xFF, 0xD8, 0xFF, ..] => Some("jpg"),
        [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, ..] => Some("png"),
        [b'G', b'I', b'F', b'8', b'7' | b'9', b'a', ..] => Some("gif"),
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => Some("webp"),
        _ => None,
    }
}

/// One file from a multipart request.
#[derive(Debug)]
pub struct UploadedFile {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

pub struct UploadImagesUseCase<F: FileStore> {
    pub files: F,
}

impl<F: FileStore> UploadImagesUseCase<F> {
    /// Every file is checked before any is written. Returns public URLs in request order.
    pub async fn execute(&self, uploads: Vec<UploadedFile>) -> Result<Vec<String>, StoreError> {
        if uploads.is_empty() {
            return Err(StoreError::validation("no files uploaded"));
        }
        if uploads.len() > MAX_FILES_PER_UPLOAD {
            return Err(StoreError::validation(format!(
                "at most {MAX_FILES_PER_UPLOAD} files per upload"
            )));
        }

        let mut named = Vec::with_capacity(uploads.len());
        for upload in &uploads {
            let ext = extension_for(&upload.content_type)
                .ok_or_else(|| StoreError::UnsupportedFileType(upload.content_type.clone()))?;
            if upload.bytes.len() > MAX_UPLOAD_BYTES {
                return Err(StoreError::FileTooLarge {
                    limit_mib: MAX_UPLOAD_MIB,
                });
            }
            if upload.bytes.is_empty() {
                return Err(StoreError::validation("uploaded file is empty"));
            }
            // The declared type must agree with the content.
            if sniff_extension(&upload.bytes) != Some(ext) {
                return Err(StoreError::UnsupportedFileType(format!(
                    "{} (content does not match)",
                    upload.content_type
                )));
            }
            named.push((format!("{}.{ext}", Uuid::now_v7()), &upload.bytes));
        }

        let mut urls = Vec::with_capacity(named.len());
        for (name, bytes) in named {
            self.files.save(&name, bytes).await?;
            urls.push(format!("{UPLOADS_URL_PREFIX}/{name}"));
        }
        tracing::info!(count = urls.len(), "images uploaded");
        Ok(urls)
    }
}
