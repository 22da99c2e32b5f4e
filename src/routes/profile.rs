use axum::{
    extract::State,
    response::{IntoResponse, Json},
    Extension,
};
use validator::Validate;

use crate::{
    dto::{
        common::ApiResponse,
        profile_dto::{ProfileResponse, UpdateProfilePayload},
    },
    error::Result,
    models::user::User,
    AppState,
};

#[axum::debug_handler]
pub async fn get_profile(Extension(user): Extension<User>) -> Result<impl IntoResponse> {
    Ok(Json(ApiResponse::data(ProfileResponse::from(user))))
}

#[axum::debug_handler]
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(payload): Json<UpdateProfilePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let updated = state.user_service.update_profile(user.id, payload).await?;
    Ok(Json(ApiResponse::data(ProfileResponse::from(updated))))
}
