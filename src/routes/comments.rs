use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use uuid::Uuid;
use validator::Validate;

use super::Path;

use crate::{
    dto::{comment_dto::CreateCommentPayload, common::ApiResponse, job_dto::PageQuery},
    error::Result,
    models::user::User,
    AppState,
};

#[axum::debug_handler]
pub async fn create_comment(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(payload): Json<CreateCommentPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let comment = state
        .comment_service
        .create(payload.job_id, &user, &payload.content)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::data(comment))))
}

#[axum::debug_handler]
pub async fn list_comments_for_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse> {
    let page = state
        .comment_service
        .list_by_job(job_id, query.page, query.limit)
        .await?;
    Ok(Json(ApiResponse::paginated(page.items, page.pagination)))
}

#[axum::debug_handler]
pub async fn delete_comment(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.comment_service.soft_delete(id, &user).await?;
    Ok(Json(ApiResponse::<()>::message(
        "Comment deleted successfully",
    )))
}
