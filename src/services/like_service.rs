use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::like_dto::{LikeStatusResponse, ToggleLikeResponse};
use crate::error::{Error, Result};

#[derive(Clone)]
pub struct LikeService {
    pool: PgPool,
}

impl LikeService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create-or-delete the (viewer, job) like. The reported count is
    /// recomputed from the likes table after the mutation, so it stays
    /// consistent under concurrent toggles; the unique index absorbs the
    /// race where two toggle-on requests both miss the delete.
    pub async fn toggle(&self, job_id: Uuid, viewer_id: Uuid) -> Result<ToggleLikeResponse> {
        self.ensure_job_active(job_id).await?;

        let deleted =
            sqlx::query("DELETE FROM likes WHERE user_id = $1 AND job_id = $2")
                .bind(viewer_id)
                .bind(job_id)
                .execute(&self.pool)
                .await?
                .rows_affected();

        let liked = if deleted == 0 {
            sqlx::query(
                "INSERT INTO likes (user_id, job_id) VALUES ($1, $2) \
                 ON CONFLICT (user_id, job_id) DO NOTHING",
            )
            .bind(viewer_id)
            .bind(job_id)
            .execute(&self.pool)
            .await?;
            true
        } else {
            false
        };

        let likes_count = self.count_for_job(job_id).await?;
        Ok(ToggleLikeResponse { liked, likes_count })
    }

    pub async fn status_for_job(
        &self,
        job_id: Uuid,
        viewer_id: Option<Uuid>,
    ) -> Result<LikeStatusResponse> {
        let likes_count = self.count_for_job(job_id).await?;
        let user_has_liked = match viewer_id {
            Some(user_id) => self.user_has_liked(job_id, user_id).await?,
            None => false,
        };
        Ok(LikeStatusResponse {
            likes_count,
            user_has_liked,
        })
    }

    pub async fn user_has_liked(&self, job_id: Uuid, user_id: Uuid) -> Result<bool> {
        let liked = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM likes WHERE job_id = $1 AND user_id = $2)",
        )
        .bind(job_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(liked)
    }

    async fn count_for_job(&self, job_id: Uuid) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM likes WHERE job_id = $1")
            .bind(job_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn ensure_job_active(&self, job_id: Uuid) -> Result<()> {
        let active = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM jobs WHERE id = $1 AND is_active = TRUE)",
        )
        .bind(job_id)
        .fetch_one(&self.pool)
        .await?;
        if !active {
            return Err(Error::NotFound("Job not found".to_string()));
        }
        Ok(())
    }
}
