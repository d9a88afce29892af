//! Image Upload Handler
//!
//! Multipart field `file`; PNG, JPEG and WebP are accepted and stored as JPEG.

use axum::Json;
use axum::extract::{Multipart, Path, State};
use axum::response::IntoResponse;
use http::header;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::services::StoredFile;
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode, multipart_error, ok};

/// POST /api/uploads - 上传图片
pub async fn upload(
    State(state): State<ServerState>,
    user: CurrentUser,
    multipart: Multipart,
) -> AppResult<Json<ApiResponse<StoredFile>>> {
    let stored = store_multipart(&state, multipart).await?;
    state
        .logs()
        .info(
            user.owner(),
            "image_uploaded",
            format!("Image {} uploaded ({} bytes)", stored.filename, stored.size),
            Some(stored.url.clone()),
        )
        .await;
    Ok(ok(stored))
}

/// GET /api/uploads/:filename - 读取图片 (公开)
pub async fn serve(
    State(state): State<ServerState>,
    Path(filename): Path<String>,
) -> AppResult<impl IntoResponse> {
    let content = state.uploads().read(&filename).await?;
    Ok(([(header::CONTENT_TYPE, "image/jpeg")], content))
}

/// Read the `file` field and store it through the upload service
pub(crate) async fn store_multipart(state: &ServerState, mut multipart: Multipart) -> AppResult<StoredFile> {
    let mut upload: Option<(Option<String>, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        if name == "file" || name.is_empty() {
            let original_name = field.file_name().map(str::to_string);
            let data = field.bytes().await.map_err(multipart_error)?;
            upload = Some((original_name, data.to_vec()));
            break;
        }
    }

    let (original_name, data) = upload.ok_or_else(|| {
        AppError::with_message(
            ErrorCode::NoFileProvided,
            "No 'file' field found. Field name must be 'file'",
        )
    })?;

    let service = state.uploads();
    tokio::task::spawn_blocking(move || service.store(original_name.as_deref(), &data))
        .await
        .map_err(|e| AppError::internal(format!("Upload task failed: {}", e)))?
}
