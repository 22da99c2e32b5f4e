use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::application::{
    Application, ApplicationDetail, ApplicationWithJob, ApplicationWithUser,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateApplicationPayload {
    pub job_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateApplicationStatusPayload {
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationResponse {
    pub id: Uuid,
    pub job_id: Uuid,
    pub user_id: Uuid,
    pub status: String,
    pub applied_at: DateTime<Utc>,
}

impl From<Application> for ApplicationResponse {
    fn from(value: Application) -> Self {
        Self {
            id: value.id,
            job_id: value.job_id,
            user_id: value.user_id,
            status: value.status,
            applied_at: value.applied_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedJobRef {
    pub id: Uuid,
    pub title: String,
    pub company: String,
    pub location: String,
    pub deadline: DateTime<Utc>,
}

/// An entry of the caller's own application list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MyApplicationResponse {
    pub id: Uuid,
    pub status: String,
    pub applied_at: DateTime<Utc>,
    pub job: AppliedJobRef,
}

impl From<ApplicationWithJob> for MyApplicationResponse {
    fn from(value: ApplicationWithJob) -> Self {
        let application = value.application;
        Self {
            id: application.id,
            status: application.status,
            applied_at: application.applied_at,
            job: AppliedJobRef {
                id: application.job_id,
                title: value.job_title,
                company: value.job_company,
                location: value.job_location,
                deadline: value.job_deadline,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantRef {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
}

/// An entry of the admin-facing applicant list for a job.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobApplicantResponse {
    pub id: Uuid,
    pub status: String,
    pub applied_at: DateTime<Utc>,
    pub user: ApplicantRef,
}

impl From<ApplicationWithUser> for JobApplicantResponse {
    fn from(value: ApplicationWithUser) -> Self {
        let application = value.application;
        Self {
            id: application.id,
            status: application.status,
            applied_at: application.applied_at,
            user: ApplicantRef {
                id: application.user_id,
                name: value.user_name,
                email: value.user_email,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedJobSummary {
    pub id: Uuid,
    pub title: String,
    pub company: String,
}

/// Status-update response with job and applicant attached for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationDetailResponse {
    pub id: Uuid,
    pub status: String,
    pub applied_at: DateTime<Utc>,
    pub user: ApplicantRef,
    pub job: AppliedJobSummary,
}

impl From<ApplicationDetail> for ApplicationDetailResponse {
    fn from(value: ApplicationDetail) -> Self {
        let application = value.application;
        Self {
            id: application.id,
            status: application.status,
            applied_at: application.applied_at,
            user: ApplicantRef {
                id: application.user_id,
                name: value.user_name,
                email: value.user_email,
            },
            job: AppliedJobSummary {
                id: application.job_id,
                title: value.job_title,
                company: value.job_company,
            },
        }
    }
}
