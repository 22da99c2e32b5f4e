use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;

/// Derived per-job counts. Likes/comments/applications are counted live
/// against their own tables rather than read from cached fields, so the
/// numbers are always consistent with the records themselves.
#[derive(Debug, Clone, Copy, Default)]
pub struct JobCounts {
    pub likes: i64,
    pub comments: i64,
    pub applications: i64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ViewerFlags {
    pub has_liked: bool,
    pub has_applied: bool,
}

#[derive(Clone)]
pub struct InteractionService {
    pool: PgPool,
}

impl InteractionService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn counts_for(&self, job_id: Uuid) -> Result<JobCounts> {
        let likes = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM likes WHERE job_id = $1")
            .bind(job_id)
            .fetch_one(&self.pool)
            .await?;
        let comments = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM comments WHERE job_id = $1 AND is_active = TRUE",
        )
        .bind(job_id)
        .fetch_one(&self.pool)
        .await?;
        let applications =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM applications WHERE job_id = $1")
                .bind(job_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(JobCounts {
            likes,
            comments,
            applications,
        })
    }

    /// Bulk path for list enrichment: one grouped query per table instead
    /// of three queries per job.
    pub async fn counts_for_many(&self, job_ids: &[Uuid]) -> Result<HashMap<Uuid, JobCounts>> {
        let mut map: HashMap<Uuid, JobCounts> = HashMap::new();
        if job_ids.is_empty() {
            return Ok(map);
        }

        let likes = sqlx::query_as::<_, (Uuid, i64)>(
            "SELECT job_id, COUNT(*) FROM likes WHERE job_id = ANY($1) GROUP BY job_id",
        )
        .bind(job_ids)
        .fetch_all(&self.pool)
        .await?;
        for (job_id, count) in likes {
            map.entry(job_id).or_default().likes = count;
        }

        let comments = sqlx::query_as::<_, (Uuid, i64)>(
            "SELECT job_id, COUNT(*) FROM comments \
             WHERE job_id = ANY($1) AND is_active = TRUE GROUP BY job_id",
        )
        .bind(job_ids)
        .fetch_all(&self.pool)
        .await?;
        for (job_id, count) in comments {
            map.entry(job_id).or_default().comments = count;
        }

        let applications = sqlx::query_as::<_, (Uuid, i64)>(
            "SELECT job_id, COUNT(*) FROM applications WHERE job_id = ANY($1) GROUP BY job_id",
        )
        .bind(job_ids)
        .fetch_all(&self.pool)
        .await?;
        for (job_id, count) in applications {
            map.entry(job_id).or_default().applications = count;
        }

        Ok(map)
    }

    pub async fn viewer_flags(&self, job_id: Uuid, user_id: Uuid) -> Result<ViewerFlags> {
        let has_liked = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM likes WHERE job_id = $1 AND user_id = $2)",
        )
        .bind(job_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        let has_applied = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM applications WHERE job_id = $1 AND user_id = $2)",
        )
        .bind(job_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(ViewerFlags {
            has_liked,
            has_applied,
        })
    }

    /// View-counter bump for the detail page; fire-and-forget relative to
    /// the response, so failures are logged and swallowed.
    pub fn record_view(&self, job_id: Uuid) {
        let pool = self.pool.clone();
        tokio::spawn(async move {
            let result = sqlx::query("UPDATE jobs SET views = views + 1 WHERE id = $1")
                .bind(job_id)
                .execute(&pool)
                .await;
            if let Err(e) = result {
                tracing::warn!(job_id = %job_id, error = ?e, "failed to record job view");
            }
        });
    }
}
