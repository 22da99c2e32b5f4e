pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod realtime;
pub mod routes;
pub mod services;

use axum::{
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
    Router,
};
use sqlx::PgPool;

use crate::middleware::{auth, rate_limit};
use crate::realtime::JobEventHub;
use crate::services::{
    application_service::ApplicationService, category_service::CategoryService,
    comment_service::CommentService, job_service::JobService, like_service::LikeService,
    user_service::UserService,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub events: JobEventHub,
    pub job_service: JobService,
    pub category_service: CategoryService,
    pub like_service: LikeService,
    pub comment_service: CommentService,
    pub application_service: ApplicationService,
    pub user_service: UserService,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        let config = crate::config::get_config();
        let events = JobEventHub::new();

        let job_service = JobService::new(pool.clone());
        let category_service = CategoryService::new(pool.clone());
        let like_service = LikeService::new(pool.clone());
        let comment_service = CommentService::new(pool.clone(), events.clone());
        let application_service = ApplicationService::new(pool.clone());
        let user_service = UserService::new(pool.clone(), config.admin_external_ids.clone());

        Self {
            pool,
            events,
            job_service,
            category_service,
            like_service,
            comment_service,
            application_service,
            user_service,
        }
    }
}

/// Full route table. Split into a public surface (anonymous allowed, user
/// attached when a valid token is present), an authenticated surface and
/// an admin surface, each behind its own rate limiter.
pub fn build_router(state: AppState) -> Router {
    let config = crate::config::get_config();

    let public_api = Router::new()
        .route("/api/jobs", get(routes::jobs::list_jobs))
        .route("/api/jobs/urgent", get(routes::jobs::list_urgent_jobs))
        .route("/api/jobs/:id", get(routes::jobs::get_job))
        .route(
            "/api/jobs/category/:category_id",
            get(routes::jobs::list_jobs_by_category),
        )
        .route("/api/categories", get(routes::categories::list_categories))
        .route(
            "/api/categories/:id",
            get(routes::categories::get_category),
        )
        .route(
            "/api/likes/job/:job_id",
            get(routes::likes::get_likes_for_job),
        )
        .route(
            "/api/comments/job/:job_id",
            get(routes::comments::list_comments_for_job),
        )
        .route_layer(from_fn_with_state(state.clone(), auth::optional_auth))
        .route_layer(from_fn_with_state(
            rate_limit::RateLimiter::new(config.public_rps),
            rate_limit::rps_middleware,
        ));

    let authed_api = Router::new()
        .route("/api/jobs/:id", put(routes::jobs::update_job))
        .route("/api/jobs/:id", delete(routes::jobs::delete_job))
        .route("/api/likes/toggle", post(routes::likes::toggle_like))
        .route(
            "/api/likes/job/:job_id/check",
            get(routes::likes::check_user_like),
        )
        .route("/api/comments", post(routes::comments::create_comment))
        .route("/api/comments/:id", delete(routes::comments::delete_comment))
        .route(
            "/api/applications",
            post(routes::applications::create_application),
        )
        .route(
            "/api/applications/my-applications",
            get(routes::applications::my_applications),
        )
        .route(
            "/api/profile",
            get(routes::profile::get_profile).put(routes::profile::update_profile),
        )
        .route_layer(from_fn_with_state(state.clone(), auth::require_auth))
        .route_layer(from_fn_with_state(
            rate_limit::RateLimiter::new(config.api_rps),
            rate_limit::rps_middleware,
        ));

    let admin_api = Router::new()
        .route("/api/jobs", post(routes::jobs::create_job))
        .route("/api/categories", post(routes::categories::create_category))
        .route(
            "/api/categories/:id",
            put(routes::categories::update_category).delete(routes::categories::delete_category),
        )
        .route(
            "/api/applications/job/:job_id",
            get(routes::applications::list_job_applicants),
        )
        .route(
            "/api/applications/:id/status",
            put(routes::applications::update_application_status),
        )
        .route_layer(from_fn_with_state(state.clone(), auth::require_admin))
        .route_layer(from_fn_with_state(
            rate_limit::RateLimiter::new(config.api_rps),
            rate_limit::rps_middleware,
        ));

    Router::new()
        .route("/api/health", get(routes::health::health))
        .route("/ws", get(realtime::ws::ws_handler))
        .merge(public_api)
        .merge(authed_api)
        .merge(admin_api)
        .with_state(state)
}
