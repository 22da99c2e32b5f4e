use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::job::{is_deadline_approaching, JobWithRefs};
use crate::services::interaction_service::JobCounts;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobPayload {
    #[validate(length(min = 1, max = 100))]
    pub title: String,
    #[validate(length(min = 50))]
    pub description: String,
    #[validate(length(min = 1))]
    pub company: String,
    #[validate(length(min = 1))]
    pub location: String,
    pub job_type: String,
    pub experience_level: String,
    pub deadline: DateTime<Utc>,
    pub category: Uuid,
    #[validate(url)]
    pub application_link: Option<String>,
    #[validate(email)]
    pub hr_email: Option<String>,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateJobPayload {
    #[validate(length(min = 1, max = 100))]
    pub title: Option<String>,
    #[validate(length(min = 50))]
    pub description: Option<String>,
    #[validate(length(min = 1))]
    pub company: Option<String>,
    #[validate(length(min = 1))]
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub experience_level: Option<String>,
    pub deadline: Option<DateTime<Utc>>,
    pub category: Option<Uuid>,
    #[validate(url)]
    pub application_link: Option<String>,
    #[validate(email)]
    pub hr_email: Option<String>,
    pub requirements: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct JobListQuery {
    pub search: Option<String>,
    pub category: Option<Uuid>,
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub experience_level: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRef {
    pub id: Uuid,
    pub name: String,
    pub color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserRef {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub company: String,
    pub location: String,
    pub job_type: String,
    pub experience_level: String,
    pub deadline: DateTime<Utc>,
    pub category: CategoryRef,
    pub created_by: UserRef,
    pub application_link: Option<String>,
    pub hr_email: Option<String>,
    pub requirements: Vec<String>,
    pub tags: Vec<String>,
    pub is_active: bool,
    pub views: i32,
    pub is_deadline_approaching: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub likes_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applications_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_has_liked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_has_applied: Option<bool>,
}

impl JobResponse {
    pub fn from_refs(row: JobWithRefs, now: DateTime<Utc>) -> Self {
        let job = row.job;
        Self {
            id: job.id,
            title: job.title,
            description: job.description,
            company: job.company,
            location: job.location,
            job_type: job.job_type,
            experience_level: job.experience_level,
            is_deadline_approaching: is_deadline_approaching(job.deadline, now),
            deadline: job.deadline,
            category: CategoryRef {
                id: job.category_id,
                name: row.category_name,
                color: row.category_color,
            },
            created_by: UserRef {
                id: job.created_by,
                name: row.created_by_name,
            },
            application_link: job.application_link,
            hr_email: job.hr_email,
            requirements: job.requirements,
            tags: job.tags,
            is_active: job.is_active,
            views: job.views,
            created_at: job.created_at,
            updated_at: job.updated_at,
            likes_count: None,
            comments_count: None,
            applications_count: None,
            user_has_liked: None,
            user_has_applied: None,
        }
    }

    pub fn with_counts(mut self, counts: &JobCounts) -> Self {
        self.likes_count = Some(counts.likes);
        self.comments_count = Some(counts.comments);
        self.applications_count = Some(counts.applications);
        self
    }

    /// The category listing reports likes/comments only.
    pub fn with_engagement_counts(mut self, counts: &JobCounts) -> Self {
        self.likes_count = Some(counts.likes);
        self.comments_count = Some(counts.comments);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_query_accepts_camel_case_keys() {
        let query: JobListQuery = serde_json::from_value(serde_json::json!({
            "search": "rust",
            "jobType": "remote",
            "experienceLevel": "senior",
            "sortBy": "deadline",
            "sortOrder": "asc"
        }))
        .unwrap();
        assert_eq!(query.job_type.as_deref(), Some("remote"));
        assert_eq!(query.experience_level.as_deref(), Some("senior"));
        assert_eq!(query.sort_by.as_deref(), Some("deadline"));
    }

    #[test]
    fn create_payload_rejects_short_description() {
        let payload = CreateJobPayload {
            title: "Backend Engineer".into(),
            description: "too short".into(),
            company: "Acme".into(),
            location: "Remote".into(),
            job_type: "remote".into(),
            experience_level: "senior".into(),
            deadline: Utc::now(),
            category: Uuid::new_v4(),
            application_link: None,
            hr_email: Some("hr@acme.example".into()),
            requirements: vec![],
            tags: vec![],
        };
        assert!(payload.validate().is_err());
    }
}
