use axum::{
    extract::{Multipart, State, multipart::MultipartError},
    http::StatusCode,
};
use serde::Serialize;

use valora_auth_types::identity::AdminUser;
use valora_core::envelope::ApiResponse;

use crate::error::StoreError;
use crate::state::AppState;
use crate::usecase::upload::{MAX_UPLOAD_MIB, UploadImagesUseCase, UploadedFile};

#[derive(Serialize)]
pub struct UploadResponse {
    pub urls: Vec<String>,
}

fn multipart_error(err: MultipartError) -> StoreError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        StoreError::FileTooLarge {
            limit_mib: MAX_UPLOAD_MIB,
        }
    } else {
        StoreError::validation(format!("invalid multipart body: {}", err.body_text()))
    }
}

// ── POST /api/uploads ────────────────────────────────────────────────────────

/// Accepts any number of file parts; non-file fields are ignored.
pub async fn upload_images(
    _admin: AdminUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, ApiResponse<UploadResponse>), StoreError> {
    let mut files = Vec::new();
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.file_name().is_none() {
            continue;
        }
        let content_type = field.content_type().unwrap_or_default().to_owned();
        let bytes = field.bytes().await.map_err(multipart_error)?;
        files.push(UploadedFile {
            content_type,
            bytes: bytes.to_vec(),
        });
    }

    let uc = UploadImagesUseCase {
        files: state.file_store(),
    };
    let urls = uc.execute(files).await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::with_message(UploadResponse { urls }, "files uploaded"),
    ))
}
