use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::comment::CommentWithAuthor;
use crate::models::user::User;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentPayload {
    #[validate(length(min = 1, max = 500))]
    pub content: String,
    pub job_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentAuthor {
    pub id: Uuid,
    pub name: String,
    pub profile_image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: Uuid,
    pub content: String,
    pub job_id: Uuid,
    pub user: CommentAuthor,
    pub liked_by: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl CommentResponse {
    pub fn from_row(row: CommentWithAuthor) -> Self {
        let comment = row.comment;
        Self {
            id: comment.id,
            content: comment.content,
            job_id: comment.job_id,
            user: CommentAuthor {
                id: comment.user_id,
                name: row.author_name,
                profile_image: row.author_profile_image,
            },
            liked_by: comment.liked_by,
            created_at: comment.created_at,
        }
    }

    pub fn from_created(comment: crate::models::comment::Comment, author: &User) -> Self {
        Self {
            id: comment.id,
            content: comment.content,
            job_id: comment.job_id,
            user: CommentAuthor {
                id: author.id,
                name: author.name.clone(),
                profile_image: author.profile_image.clone(),
            },
            liked_by: comment.liked_by,
            created_at: comment.created_at,
        }
    }
}
