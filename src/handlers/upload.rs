// POST /api/upload handler

use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::sync::Arc;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::models::{UploadRequest, UploadResponse};
use crate::state::AppState;

/// Files are uploaded for use by assistants and file search
const UPLOAD_PURPOSE: &str = "assistants";

pub async fn upload_handler(
    user: AuthUser,
    request: UploadRequest,
    state: Arc<AppState>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let non_empty = |field: Option<String>| field.filter(|v| !v.is_empty());
    let (filename, content, project_id) = match (
        non_empty(request.filename),
        non_empty(request.content),
        non_empty(request.project_id),
    ) {
        (Some(filename), Some(content), Some(project_id)) => (filename, content, project_id),
        _ => {
            return Err(warp::reject::custom(ApiError::BadRequest(
                "Filename, content, and projectId required".to_string(),
            )))
        }
    };

    let bytes = STANDARD.decode(content.trim()).map_err(|e| {
        tracing::error!(error = %e, filename = %filename, "upload content is not valid base64");
        upload_failed()
    })?;

    tracing::info!(
        user_id = %user.id,
        project_id = %project_id,
        filename = %filename,
        size = bytes.len(),
        "upload request"
    );

    let file = state
        .provider
        .upload_file(&filename, bytes, UPLOAD_PURPOSE)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, filename = %filename, "upload failed");
            upload_failed()
        })?;

    Ok(warp::reply::json(&UploadResponse {
        success: true,
        file_id: file.id,
        filename,
    }))
}

fn upload_failed() -> warp::Rejection {
    warp::reject::custom(ApiError::Internal("Upload failed".to_string()))
}
