use axum::{
    extract::State,
    response::{IntoResponse, Json},
    Extension,
};
use uuid::Uuid;

use super::Path;

use crate::{
    dto::{common::ApiResponse, like_dto::ToggleLikePayload},
    error::Result,
    models::user::User,
    AppState,
};

#[axum::debug_handler]
pub async fn toggle_like(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(payload): Json<ToggleLikePayload>,
) -> Result<impl IntoResponse> {
    let result = state.like_service.toggle(payload.job_id, user.id).await?;
    Ok(Json(ApiResponse::data(result)))
}

#[axum::debug_handler]
pub async fn get_likes_for_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    viewer: Option<Extension<User>>,
) -> Result<impl IntoResponse> {
    let viewer_id = viewer.map(|Extension(user)| user.id);
    let status = state.like_service.status_for_job(job_id, viewer_id).await?;
    Ok(Json(ApiResponse::data(status)))
}

#[axum::debug_handler]
pub async fn check_user_like(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(job_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let liked = state.like_service.user_has_liked(job_id, user.id).await?;
    Ok(Json(ApiResponse::data(
        serde_json::json!({ "liked": liked }),
    )))
}
