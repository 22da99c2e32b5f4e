use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const APPLICATION_STATUSES: &[&str] = &["pending", "shortlisted", "rejected"];

/// At most one row per (job, user); enforced by `applications_job_user_unique`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Application {
    pub id: Uuid,
    pub job_id: Uuid,
    pub user_id: Uuid,
    pub status: String,
    pub applied_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An application joined with the job summary shown to the applicant.
#[derive(Debug, Clone, FromRow)]
pub struct ApplicationWithJob {
    #[sqlx(flatten)]
    pub application: Application,
    pub job_title: String,
    pub job_company: String,
    pub job_location: String,
    pub job_deadline: DateTime<Utc>,
}

/// An application joined with the applicant shown to admins.
#[derive(Debug, Clone, FromRow)]
pub struct ApplicationWithUser {
    #[sqlx(flatten)]
    pub application: Application,
    pub user_name: String,
    pub user_email: Option<String>,
}

/// An application joined with both sides, returned from status updates.
#[derive(Debug, Clone, FromRow)]
pub struct ApplicationDetail {
    #[sqlx(flatten)]
    pub application: Application,
    pub user_name: String,
    pub user_email: Option<String>,
    pub job_title: String,
    pub job_company: String,
}
