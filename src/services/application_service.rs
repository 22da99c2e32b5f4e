use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{is_unique_violation, Error, Result};
use crate::models::application::{
    Application, ApplicationDetail, ApplicationWithJob, ApplicationWithUser,
    APPLICATION_STATUSES,
};

#[derive(Clone)]
pub struct ApplicationService {
    pool: PgPool,
}

#[derive(Debug, FromRow)]
struct JobGate {
    deadline: DateTime<Utc>,
    is_active: bool,
}

impl ApplicationService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Preconditions run in order: active job, open deadline, no existing
    /// application. The duplicate pre-check is best-effort only; the
    /// unique index on (job_id, user_id) is the backstop when two applies
    /// race, and its violation maps to the same error.
    pub async fn apply(&self, job_id: Uuid, applicant_id: Uuid) -> Result<Application> {
        let gate = sqlx::query_as::<_, JobGate>(
            "SELECT deadline, is_active FROM jobs WHERE id = $1",
        )
        .bind(job_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Job not found".to_string()))?;

        if !gate.is_active {
            return Err(Error::NotFound("Job not found".to_string()));
        }
        if gate.deadline < Utc::now() {
            return Err(Error::BadRequest(
                "Application deadline has passed".to_string(),
            ));
        }

        let already_applied = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM applications WHERE job_id = $1 AND user_id = $2)",
        )
        .bind(job_id)
        .bind(applicant_id)
        .fetch_one(&self.pool)
        .await?;
        if already_applied {
            return Err(Error::Duplicate(
                "You have already applied for this job".to_string(),
            ));
        }

        let application = sqlx::query_as::<_, Application>(
            "INSERT INTO applications (job_id, user_id) VALUES ($1, $2) RETURNING *",
        )
        .bind(job_id)
        .bind(applicant_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                Error::Duplicate("You have already applied for this job".to_string())
            } else {
                e.into()
            }
        })?;

        // single-document atomic increment; never read-then-write
        sqlx::query("UPDATE jobs SET application_count = application_count + 1 WHERE id = $1")
            .bind(job_id)
            .execute(&self.pool)
            .await?;

        Ok(application)
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<ApplicationWithJob>> {
        let rows = sqlx::query_as::<_, ApplicationWithJob>(
            "SELECT a.*, j.title AS job_title, j.company AS job_company, \
             j.location AS job_location, j.deadline AS job_deadline \
             FROM applications a JOIN jobs j ON j.id = a.job_id \
             WHERE a.user_id = $1 ORDER BY a.applied_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn list_for_job(&self, job_id: Uuid) -> Result<Vec<ApplicationWithUser>> {
        let rows = sqlx::query_as::<_, ApplicationWithUser>(
            "SELECT a.*, u.name AS user_name, u.email AS user_email \
             FROM applications a JOIN users u ON u.id = a.user_id \
             WHERE a.job_id = $1 ORDER BY a.applied_at DESC",
        )
        .bind(job_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn update_status(&self, id: Uuid, status: &str) -> Result<ApplicationDetail> {
        if !APPLICATION_STATUSES.contains(&status) {
            return Err(Error::BadRequest(format!(
                "Invalid application status: {}",
                status
            )));
        }

        let updated = sqlx::query("UPDATE applications SET status = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(&self.pool)
            .await?;
        if updated.rows_affected() == 0 {
            return Err(Error::NotFound("Application not found".to_string()));
        }

        let detail = sqlx::query_as::<_, ApplicationDetail>(
            "SELECT a.*, u.name AS user_name, u.email AS user_email, \
             j.title AS job_title, j.company AS job_company \
             FROM applications a \
             JOIN users u ON u.id = a.user_id \
             JOIN jobs j ON j.id = a.job_id \
             WHERE a.id = $1",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(detail)
    }
}
