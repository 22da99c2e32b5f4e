use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const JOB_TYPES: &[&str] = &[
    "full-time",
    "part-time",
    "contract",
    "internship",
    "remote",
    "any",
];

pub const EXPERIENCE_LEVELS: &[&str] =
    &["entry", "mid", "senior", "executive", "internship", "any"];

/// Window before the deadline in which a job is flagged as urgent.
pub const DEADLINE_WARNING_DAYS: i64 = 2;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Job {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub company: String,
    pub location: String,
    pub job_type: String,
    pub experience_level: String,
    pub deadline: DateTime<Utc>,
    pub category_id: Uuid,
    pub created_by: Uuid,
    pub application_link: Option<String>,
    pub hr_email: Option<String>,
    pub requirements: Vec<String>,
    pub tags: Vec<String>,
    pub is_active: bool,
    pub views: i32,
    pub application_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A job row joined with its category and creator display fields.
#[derive(Debug, Clone, FromRow)]
pub struct JobWithRefs {
    #[sqlx(flatten)]
    pub job: Job,
    pub category_name: String,
    pub category_color: String,
    pub created_by_name: String,
}

/// True iff `now < deadline <= now + DEADLINE_WARNING_DAYS`.
pub fn is_deadline_approaching(deadline: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    deadline > now && deadline <= now + Duration::days(DEADLINE_WARNING_DAYS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deadline_inside_warning_window_is_approaching() {
        let now = Utc::now();
        assert!(is_deadline_approaching(now + Duration::hours(1), now));
        assert!(is_deadline_approaching(now + Duration::days(2), now));
    }

    #[test]
    fn deadline_outside_window_is_not_approaching() {
        let now = Utc::now();
        assert!(!is_deadline_approaching(
            now + Duration::days(2) + Duration::seconds(1),
            now
        ));
        assert!(!is_deadline_approaching(now + Duration::days(5), now));
    }

    #[test]
    fn passed_deadline_is_not_approaching() {
        let now = Utc::now();
        assert!(!is_deadline_approaching(now - Duration::hours(1), now));
        assert!(!is_deadline_approaching(now, now));
    }
}
