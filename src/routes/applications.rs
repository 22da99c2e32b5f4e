use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use uuid::Uuid;

use super::Path;

use crate::{
    dto::{
        application_dto::{
            ApplicationDetailResponse, ApplicationResponse, CreateApplicationPayload,
            JobApplicantResponse, MyApplicationResponse, UpdateApplicationStatusPayload,
        },
        common::ApiResponse,
    },
    error::Result,
    models::user::User,
    AppState,
};

#[axum::debug_handler]
pub async fn create_application(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(payload): Json<CreateApplicationPayload>,
) -> Result<impl IntoResponse> {
    let application = state
        .application_service
        .apply(payload.job_id, user.id)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::data(ApplicationResponse::from(application))),
    ))
}

#[axum::debug_handler]
pub async fn my_applications(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<impl IntoResponse> {
    let applications = state.application_service.list_for_user(user.id).await?;
    let data: Vec<MyApplicationResponse> = applications
        .into_iter()
        .map(MyApplicationResponse::from)
        .collect();
    Ok(Json(ApiResponse::data(data)))
}

#[axum::debug_handler]
pub async fn list_job_applicants(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let applications = state.application_service.list_for_job(job_id).await?;
    let data: Vec<JobApplicantResponse> = applications
        .into_iter()
        .map(JobApplicantResponse::from)
        .collect();
    Ok(Json(ApiResponse::data(data)))
}

#[axum::debug_handler]
pub async fn update_application_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateApplicationStatusPayload>,
) -> Result<impl IntoResponse> {
    let detail = state
        .application_service
        .update_status(id, &payload.status)
        .await?;
    Ok(Json(ApiResponse::data(ApplicationDetailResponse::from(
        detail,
    ))))
}
