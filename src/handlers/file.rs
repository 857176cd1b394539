// GET /api/file/{id} handler

use std::sync::Arc;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

pub async fn get_file_handler(
    file_id: String,
    user: AuthUser,
    state: Arc<AppState>,
) -> Result<impl warp::Reply, warp::Rejection> {
    tracing::info!(user_id = %user.id, file_id = %file_id, "file lookup");

    let file = state.provider.retrieve_file(&file_id).await.map_err(|e| {
        tracing::error!(error = %e, file_id = %file_id, "file retrieval failed");
        warp::reject::custom(ApiError::Internal("Could not retrieve file".to_string()))
    })?;

    Ok(warp::reply::json(&file))
}
