use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::comment_dto::CommentResponse;
use crate::dto::common::Pagination;
use crate::error::{Error, Result};
use crate::models::comment::{Comment, CommentWithAuthor};
use crate::models::user::User;
use crate::realtime::{JobEvent, JobEventHub};

#[derive(Clone)]
pub struct CommentService {
    pool: PgPool,
    events: JobEventHub,
}

pub struct CommentPage {
    pub items: Vec<CommentResponse>,
    pub pagination: Pagination,
}

impl CommentService {
    pub fn new(pool: PgPool, events: JobEventHub) -> Self {
        Self { pool, events }
    }

    pub async fn create(
        &self,
        job_id: Uuid,
        author: &User,
        content: &str,
    ) -> Result<CommentResponse> {
        let job_active = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM jobs WHERE id = $1 AND is_active = TRUE)",
        )
        .bind(job_id)
        .fetch_one(&self.pool)
        .await?;
        if !job_active {
            return Err(Error::NotFound("Job not found".to_string()));
        }

        let comment = sqlx::query_as::<_, Comment>(
            "INSERT INTO comments (content, job_id, user_id) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(content)
        .bind(job_id)
        .bind(author.id)
        .fetch_one(&self.pool)
        .await?;

        let response = CommentResponse::from_created(comment, author);

        // The write is the source of truth; the event is best-effort.
        self.events
            .publish(JobEvent::CommentAdded {
                comment: response.clone(),
                job_id,
            })
            .await;

        Ok(response)
    }

    pub async fn list_by_job(
        &self,
        job_id: Uuid,
        page: Option<i64>,
        limit: Option<i64>,
    ) -> Result<CommentPage> {
        let page = page.unwrap_or(1).max(1);
        let limit = limit.unwrap_or(10).clamp(1, 100);
        let offset = (page - 1) * limit;

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM comments WHERE job_id = $1 AND is_active = TRUE",
        )
        .bind(job_id)
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query_as::<_, CommentWithAuthor>(
            "SELECT co.*, u.name AS author_name, u.profile_image AS author_profile_image \
             FROM comments co JOIN users u ON u.id = co.user_id \
             WHERE co.job_id = $1 AND co.is_active = TRUE \
             ORDER BY co.created_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(job_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(CommentPage {
            items: rows.into_iter().map(CommentResponse::from_row).collect(),
            pagination: Pagination::new(page, limit, total),
        })
    }

    pub async fn soft_delete(&self, comment_id: Uuid, requester: &User) -> Result<()> {
        let comment = sqlx::query_as::<_, Comment>("SELECT * FROM comments WHERE id = $1")
            .bind(comment_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Comment not found".to_string()))?;

        if comment.user_id != requester.id && !requester.is_admin() {
            return Err(Error::Forbidden(
                "Not authorized to delete this comment".to_string(),
            ));
        }

        sqlx::query("UPDATE comments SET is_active = FALSE, updated_at = NOW() WHERE id = $1")
            .bind(comment_id)
            .execute(&self.pool)
            .await?;

        self.events
            .publish(JobEvent::CommentRemoved {
                comment_id,
                job_id: comment.job_id,
            })
            .await;

        Ok(())
    }
}
