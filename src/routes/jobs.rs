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
    dto::{
        common::ApiResponse,
        job_dto::{CreateJobPayload, JobListQuery, JobResponse, PageQuery, UpdateJobPayload},
    },
    error::Result,
    models::user::User,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/jobs",
    params(
        ("search" = Option<String>, Query, description = "Search in title, description, company and tags"),
        ("category" = Option<Uuid>, Query, description = "Filter by category"),
        ("location" = Option<String>, Query, description = "Filter by location"),
        ("jobType" = Option<String>, Query, description = "Filter by job type"),
        ("experienceLevel" = Option<String>, Query, description = "Filter by experience level"),
        ("page" = Option<i64>, Query, description = "Page number"),
        ("limit" = Option<i64>, Query, description = "Items per page"),
        ("sortBy" = Option<String>, Query, description = "Sort column"),
        ("sortOrder" = Option<String>, Query, description = "asc or desc")
    ),
    responses(
        (status = 200, description = "Paginated active jobs", body = [JobResponse])
    )
)]
#[axum::debug_handler]
pub async fn list_jobs(
    State(state): State<AppState>,
    Query(query): Query<JobListQuery>,
) -> Result<impl IntoResponse> {
    let page = state.job_service.list(&query).await?;
    Ok(Json(ApiResponse::paginated(page.items, page.pagination)))
}

#[utoipa::path(
    get,
    path = "/api/jobs/urgent",
    responses(
        (status = 200, description = "Jobs whose deadline is inside the warning window", body = [JobResponse])
    )
)]
#[axum::debug_handler]
pub async fn list_urgent_jobs(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let jobs = state.job_service.list_urgent().await?;
    Ok(Json(ApiResponse::data(jobs)))
}

#[utoipa::path(
    get,
    path = "/api/jobs/{id}",
    params(
        ("id" = Uuid, Path, description = "Job ID")
    ),
    responses(
        (status = 200, description = "Job detail", body = JobResponse),
        (status = 404, description = "Job not found or removed")
    )
)]
#[axum::debug_handler]
pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    viewer: Option<Extension<User>>,
) -> Result<impl IntoResponse> {
    let viewer = viewer.map(|Extension(user)| user);
    let job = state.job_service.get_detail(id, viewer.as_ref()).await?;
    Ok(Json(ApiResponse::data(job)))
}

#[utoipa::path(
    post,
    path = "/api/jobs",
    request_body = CreateJobPayload,
    responses(
        (status = 201, description = "Job created", body = JobResponse),
        (status = 400, description = "Invalid payload")
    )
)]
#[axum::debug_handler]
pub async fn create_job(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(payload): Json<CreateJobPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let job = state.job_service.create(payload, user.id).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::data(job))))
}

#[utoipa::path(
    put,
    path = "/api/jobs/{id}",
    params(
        ("id" = Uuid, Path, description = "Job ID")
    ),
    request_body = UpdateJobPayload,
    responses(
        (status = 200, description = "Job updated", body = JobResponse),
        (status = 403, description = "Not the creator or an admin"),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn update_job(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateJobPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let job = state.job_service.update(id, payload, &user).await?;
    Ok(Json(ApiResponse::data(job)))
}

#[utoipa::path(
    delete,
    path = "/api/jobs/{id}",
    params(
        ("id" = Uuid, Path, description = "Job ID")
    ),
    responses(
        (status = 200, description = "Job deactivated"),
        (status = 403, description = "Not the creator or an admin"),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_job(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.job_service.soft_delete(id, &user).await?;
    Ok(Json(ApiResponse::<()>::message("Job deleted successfully")))
}

#[axum::debug_handler]
pub async fn list_jobs_by_category(
    State(state): State<AppState>,
    Path(category_id): Path<Uuid>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse> {
    let page = state
        .job_service
        .list_by_category(category_id, query.page, query.limit)
        .await?;
    Ok(Json(ApiResponse::paginated(page.items, page.pagination)))
}
