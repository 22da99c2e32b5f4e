use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use uuid::Uuid;
use validator::Validate;

use super::Path;

use crate::{
    dto::{
        category_dto::{CategoryResponse, CreateCategoryPayload, UpdateCategoryPayload},
        common::ApiResponse,
    },
    error::Result,
    AppState,
};

#[axum::debug_handler]
pub async fn list_categories(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let categories = state.category_service.list().await?;
    let data: Vec<CategoryResponse> = categories.into_iter().map(CategoryResponse::from).collect();
    Ok(Json(ApiResponse::data(data)))
}

#[axum::debug_handler]
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let category = state.category_service.get(id).await?;
    Ok(Json(ApiResponse::data(CategoryResponse::from(category))))
}

#[axum::debug_handler]
pub async fn create_category(
    State(state): State<AppState>,
    Json(payload): Json<CreateCategoryPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let category = state.category_service.create(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::data(CategoryResponse::from(category))),
    ))
}

#[axum::debug_handler]
pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCategoryPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let category = state.category_service.update(id, payload).await?;
    Ok(Json(ApiResponse::data(CategoryResponse::from(category))))
}

#[axum::debug_handler]
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.category_service.soft_delete(id).await?;
    Ok(Json(ApiResponse::<()>::message(
        "Category deleted successfully",
    )))
}
