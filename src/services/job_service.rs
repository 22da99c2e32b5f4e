use chrono::{Duration, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::dto::common::Pagination;
use crate::dto::job_dto::{CreateJobPayload, JobListQuery, JobResponse, UpdateJobPayload};
use crate::error::{Error, Result};
use crate::models::job::{
    Job, JobWithRefs, DEADLINE_WARNING_DAYS, EXPERIENCE_LEVELS, JOB_TYPES,
};
use crate::models::user::User;
use crate::services::interaction_service::InteractionService;

const SELECT_WITH_REFS: &str = "SELECT j.*, c.name AS category_name, c.color AS category_color, \
     u.name AS created_by_name \
     FROM jobs j \
     JOIN categories c ON c.id = j.category_id \
     JOIN users u ON u.id = j.created_by";

const DEFAULT_PAGE_SIZE: i64 = 10;
const MAX_PAGE_SIZE: i64 = 100;

#[derive(Clone)]
pub struct JobService {
    pool: PgPool,
    interactions: InteractionService,
}

pub struct JobPage {
    pub items: Vec<JobResponse>,
    pub pagination: Pagination,
}

impl JobService {
    pub fn new(pool: PgPool) -> Self {
        let interactions = InteractionService::new(pool.clone());
        Self { pool, interactions }
    }

    pub async fn create(&self, payload: CreateJobPayload, creator_id: Uuid) -> Result<JobResponse> {
        validate_enums(&payload.job_type, &payload.experience_level)?;
        if !has_contact_method(
            payload.application_link.as_deref(),
            payload.hr_email.as_deref(),
        ) {
            return Err(Error::BadRequest(
                "Either application link or HR email must be provided".to_string(),
            ));
        }
        if payload.deadline <= Utc::now() {
            return Err(Error::BadRequest(
                "Deadline must be in the future".to_string(),
            ));
        }

        let category_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM categories WHERE id = $1 AND is_active = TRUE)",
        )
        .bind(payload.category)
        .fetch_one(&self.pool)
        .await?;
        if !category_exists {
            return Err(Error::BadRequest("Category not found".to_string()));
        }

        let job_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO jobs (
                title, description, company, location, job_type, experience_level,
                deadline, category_id, created_by, application_link, hr_email,
                requirements, tags
            ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12,$13)
            RETURNING id
            "#,
        )
        .bind(&payload.title)
        .bind(&payload.description)
        .bind(&payload.company)
        .bind(&payload.location)
        .bind(&payload.job_type)
        .bind(&payload.experience_level)
        .bind(payload.deadline)
        .bind(payload.category)
        .bind(creator_id)
        .bind(&payload.application_link)
        .bind(&payload.hr_email)
        .bind(&payload.requirements)
        .bind(&payload.tags)
        .fetch_one(&self.pool)
        .await?;

        self.refresh_category_job_count(payload.category).await?;

        let row = self.get_with_refs(job_id).await?;
        Ok(JobResponse::from_refs(row, Utc::now()))
    }

    pub async fn update(
        &self,
        id: Uuid,
        payload: UpdateJobPayload,
        actor: &User,
    ) -> Result<JobResponse> {
        let job = self.get_raw(id).await?;
        if job.created_by != actor.id && !actor.is_admin() {
            return Err(Error::Forbidden(
                "Not authorized to update this job".to_string(),
            ));
        }

        if let Some(job_type) = &payload.job_type {
            if !JOB_TYPES.contains(&job_type.as_str()) {
                return Err(Error::BadRequest(format!("Invalid job type: {}", job_type)));
            }
        }
        if let Some(level) = &payload.experience_level {
            if !EXPERIENCE_LEVELS.contains(&level.as_str()) {
                return Err(Error::BadRequest(format!(
                    "Invalid experience level: {}",
                    level
                )));
            }
        }
        if let Some(deadline) = payload.deadline {
            if deadline <= Utc::now() {
                return Err(Error::BadRequest(
                    "Deadline must be in the future".to_string(),
                ));
            }
        }

        let effective_link = payload
            .application_link
            .as_deref()
            .or(job.application_link.as_deref());
        let effective_email = payload.hr_email.as_deref().or(job.hr_email.as_deref());
        if !has_contact_method(effective_link, effective_email) {
            return Err(Error::BadRequest(
                "Either application link or HR email must be provided".to_string(),
            ));
        }

        if let Some(category) = payload.category {
            let exists = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS (SELECT 1 FROM categories WHERE id = $1 AND is_active = TRUE)",
            )
            .bind(category)
            .fetch_one(&self.pool)
            .await?;
            if !exists {
                return Err(Error::BadRequest("Category not found".to_string()));
            }
        }

        sqlx::query(
            r#"
            UPDATE jobs
            SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                company = COALESCE($4, company),
                location = COALESCE($5, location),
                job_type = COALESCE($6, job_type),
                experience_level = COALESCE($7, experience_level),
                deadline = COALESCE($8, deadline),
                category_id = COALESCE($9, category_id),
                application_link = COALESCE($10, application_link),
                hr_email = COALESCE($11, hr_email),
                requirements = COALESCE($12, requirements),
                tags = COALESCE($13, tags),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&payload.title)
        .bind(&payload.description)
        .bind(&payload.company)
        .bind(&payload.location)
        .bind(&payload.job_type)
        .bind(&payload.experience_level)
        .bind(payload.deadline)
        .bind(payload.category)
        .bind(&payload.application_link)
        .bind(&payload.hr_email)
        .bind(&payload.requirements)
        .bind(&payload.tags)
        .execute(&self.pool)
        .await?;

        if let Some(category) = payload.category {
            if category != job.category_id {
                self.refresh_category_job_count(job.category_id).await?;
                self.refresh_category_job_count(category).await?;
            }
        }

        let row = self.get_with_refs(id).await?;
        Ok(JobResponse::from_refs(row, Utc::now()))
    }

    pub async fn soft_delete(&self, id: Uuid, actor: &User) -> Result<()> {
        let job = self.get_raw(id).await?;
        if job.created_by != actor.id && !actor.is_admin() {
            return Err(Error::Forbidden(
                "Not authorized to delete this job".to_string(),
            ));
        }
        // Deleting twice must not decrement the category count again.
        if !job.is_active {
            return Err(Error::NotFound("Job not found".to_string()));
        }

        sqlx::query("UPDATE jobs SET is_active = FALSE, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        sqlx::query(
            "UPDATE categories SET job_count = GREATEST(job_count - 1, 0) WHERE id = $1",
        )
        .bind(job.category_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Filtered, sorted, paginated listing over active jobs, enriched with
    /// live counts through the bulk aggregation path.
    pub async fn list(&self, query: &JobListQuery) -> Result<JobPage> {
        let (page, limit) = page_window(query.page, query.limit);
        let offset = (page - 1) * limit;

        let mut count_builder = QueryBuilder::new("SELECT COUNT(*) FROM jobs j");
        push_filters(&mut count_builder, query);
        let total: i64 = count_builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut builder = QueryBuilder::new(SELECT_WITH_REFS);
        push_filters(&mut builder, query);
        builder.push(" ORDER BY j.");
        builder.push(sort_column(query.sort_by.as_deref()));
        builder.push(" ");
        builder.push(sort_direction(query.sort_order.as_deref()));
        builder.push(" LIMIT ");
        builder.push_bind(limit);
        builder.push(" OFFSET ");
        builder.push_bind(offset);

        let rows = builder
            .build_query_as::<JobWithRefs>()
            .fetch_all(&self.pool)
            .await?;

        let items = self
            .enrich(rows, |response, counts| response.with_counts(counts))
            .await?;

        Ok(JobPage {
            items,
            pagination: Pagination::new(page, limit, total),
        })
    }

    /// Category-scoped listing; reports likes/comments counts only.
    pub async fn list_by_category(
        &self,
        category_id: Uuid,
        page: Option<i64>,
        limit: Option<i64>,
    ) -> Result<JobPage> {
        let (page, limit) = page_window(page, limit);
        let offset = (page - 1) * limit;

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM jobs j WHERE j.category_id = $1 AND j.is_active = TRUE",
        )
        .bind(category_id)
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query_as::<_, JobWithRefs>(&format!(
            "{} WHERE j.category_id = $1 AND j.is_active = TRUE \
             ORDER BY j.created_at DESC LIMIT $2 OFFSET $3",
            SELECT_WITH_REFS
        ))
        .bind(category_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let items = self
            .enrich(rows, |response, counts| {
                response.with_engagement_counts(counts)
            })
            .await?;

        Ok(JobPage {
            items,
            pagination: Pagination::new(page, limit, total),
        })
    }

    /// Active jobs whose deadline falls inside the warning window, soonest
    /// first.
    pub async fn list_urgent(&self) -> Result<Vec<JobResponse>> {
        let now = Utc::now();
        let cutoff = now + Duration::days(DEADLINE_WARNING_DAYS);
        let rows = sqlx::query_as::<_, JobWithRefs>(&format!(
            "{} WHERE j.is_active = TRUE AND j.deadline > $1 AND j.deadline <= $2 \
             ORDER BY j.deadline ASC",
            SELECT_WITH_REFS
        ))
        .bind(now)
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| JobResponse::from_refs(row, now))
            .collect())
    }

    /// Single-job detail for a (possibly anonymous) viewer. Looks up the
    /// job regardless of its active flag so that a removed job can be
    /// reported distinctly, then bumps the view counter fire-and-forget.
    pub async fn get_detail(&self, id: Uuid, viewer: Option<&User>) -> Result<JobResponse> {
        let row = self.get_with_refs(id).await?;
        if !row.job.is_active {
            return Err(Error::NotFound("Job has been removed".to_string()));
        }

        self.interactions.record_view(id);

        let counts = self.interactions.counts_for(id).await?;
        let mut response = JobResponse::from_refs(row, Utc::now()).with_counts(&counts);

        if let Some(user) = viewer {
            let flags = self.interactions.viewer_flags(id, user.id).await?;
            response.user_has_liked = Some(flags.has_liked);
            response.user_has_applied = Some(flags.has_applied);
        }

        Ok(response)
    }

    pub async fn get_raw(&self, id: Uuid) -> Result<Job> {
        sqlx::query_as::<_, Job>("SELECT * FROM jobs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Job not found".to_string()))
    }

    async fn get_with_refs(&self, id: Uuid) -> Result<JobWithRefs> {
        sqlx::query_as::<_, JobWithRefs>(&format!("{} WHERE j.id = $1", SELECT_WITH_REFS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Job not found".to_string()))
    }

    async fn enrich<F>(&self, rows: Vec<JobWithRefs>, apply: F) -> Result<Vec<JobResponse>>
    where
        F: Fn(JobResponse, &crate::services::interaction_service::JobCounts) -> JobResponse,
    {
        let now = Utc::now();
        let ids: Vec<Uuid> = rows.iter().map(|row| row.job.id).collect();
        let counts = self.interactions.counts_for_many(&ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let job_counts = counts.get(&row.job.id).copied().unwrap_or_default();
                let response = JobResponse::from_refs(row, now);
                apply(response, &job_counts)
            })
            .collect())
    }

    async fn refresh_category_job_count(&self, category_id: Uuid) -> Result<()> {
        sqlx::query(
            "UPDATE categories SET job_count = \
             (SELECT COUNT(*) FROM jobs WHERE category_id = $1 AND is_active = TRUE) \
             WHERE id = $1",
        )
        .bind(category_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

fn page_window(page: Option<i64>, limit: Option<i64>) -> (i64, i64) {
    let page = page.unwrap_or(1).max(1);
    let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    (page, limit)
}

fn has_contact_method(application_link: Option<&str>, hr_email: Option<&str>) -> bool {
    let has_link = application_link.map_or(false, |v| !v.trim().is_empty());
    let has_email = hr_email.map_or(false, |v| !v.trim().is_empty());
    has_link || has_email
}

fn validate_enums(job_type: &str, experience_level: &str) -> Result<()> {
    if !JOB_TYPES.contains(&job_type) {
        return Err(Error::BadRequest(format!("Invalid job type: {}", job_type)));
    }
    if !EXPERIENCE_LEVELS.contains(&experience_level) {
        return Err(Error::BadRequest(format!(
            "Invalid experience level: {}",
            experience_level
        )));
    }
    Ok(())
}

/// Column allowlist for caller-supplied sort fields; anything unknown
/// falls back to creation time.
fn sort_column(sort_by: Option<&str>) -> &'static str {
    match sort_by {
        Some("deadline") => "deadline",
        Some("views") => "views",
        Some("title") => "title",
        Some("company") => "company",
        _ => "created_at",
    }
}

fn sort_direction(sort_order: Option<&str>) -> &'static str {
    match sort_order {
        Some(order) if order.eq_ignore_ascii_case("asc") => "ASC",
        _ => "DESC",
    }
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, query: &JobListQuery) {
    builder.push(" WHERE j.is_active = TRUE");

    if let Some(search) = query.search.as_deref().filter(|s| !s.trim().is_empty()) {
        let pattern = format!("%{}%", search.trim());
        builder.push(" AND (j.title ILIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" OR j.description ILIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" OR j.company ILIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" OR EXISTS (SELECT 1 FROM unnest(j.tags) AS tag WHERE tag ILIKE ");
        builder.push_bind(pattern);
        builder.push("))");
    }

    if let Some(category) = query.category {
        builder.push(" AND j.category_id = ");
        builder.push_bind(category);
    }
    if let Some(location) = query.location.as_deref().filter(|s| !s.trim().is_empty()) {
        builder.push(" AND j.location ILIKE ");
        builder.push_bind(format!("%{}%", location.trim()));
    }
    if let Some(job_type) = query.job_type.as_deref().filter(|s| !s.is_empty()) {
        builder.push(" AND j.job_type = ");
        builder.push_bind(job_type.to_string());
    }
    if let Some(level) = query
        .experience_level
        .as_deref()
        .filter(|s| !s.is_empty())
    {
        builder.push(" AND j.experience_level = ");
        builder.push_bind(level.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_window_defaults_and_clamps() {
        assert_eq!(page_window(None, None), (1, 10));
        assert_eq!(page_window(Some(0), Some(0)), (1, 1));
        assert_eq!(page_window(Some(-3), Some(500)), (1, 100));
        assert_eq!(page_window(Some(4), Some(25)), (4, 25));
    }

    #[test]
    fn contact_method_requires_a_non_blank_value() {
        assert!(!has_contact_method(None, None));
        assert!(!has_contact_method(Some(""), Some("   ")));
        assert!(has_contact_method(Some("https://acme.example/apply"), None));
        assert!(has_contact_method(None, Some("hr@acme.example")));
    }

    #[test]
    fn enum_validation_uses_allowlists() {
        assert!(validate_enums("remote", "senior").is_ok());
        assert!(validate_enums("freelance", "senior").is_err());
        assert!(validate_enums("remote", "principal").is_err());
    }

    #[test]
    fn sort_field_falls_back_to_created_at() {
        assert_eq!(sort_column(None), "created_at");
        assert_eq!(sort_column(Some("createdAt")), "created_at");
        assert_eq!(sort_column(Some("deadline")), "deadline");
        assert_eq!(sort_column(Some("salary; DROP TABLE jobs")), "created_at");
        assert_eq!(sort_direction(Some("asc")), "ASC");
        assert_eq!(sort_direction(Some("ASC")), "ASC");
        assert_eq!(sort_direction(Some("desc")), "DESC");
        assert_eq!(sort_direction(None), "DESC");
    }

    #[test]
    fn filters_cover_search_and_equality_fields() {
        let query = JobListQuery {
            search: Some("rust".into()),
            category: Some(Uuid::new_v4()),
            location: Some("berlin".into()),
            job_type: Some("remote".into()),
            experience_level: Some("senior".into()),
            ..Default::default()
        };
        let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM jobs j");
        push_filters(&mut builder, &query);
        let sql = builder.sql();
        assert!(sql.contains("j.is_active = TRUE"));
        assert!(sql.contains("j.title ILIKE"));
        assert!(sql.contains("j.description ILIKE"));
        assert!(sql.contains("j.company ILIKE"));
        assert!(sql.contains("unnest(j.tags)"));
        assert!(sql.contains("j.category_id ="));
        assert!(sql.contains("j.location ILIKE"));
        assert!(sql.contains("j.job_type ="));
        assert!(sql.contains("j.experience_level ="));
    }

    #[test]
    fn blank_filters_are_ignored() {
        let query = JobListQuery {
            search: Some("   ".into()),
            location: Some("".into()),
            ..Default::default()
        };
        let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM jobs j");
        push_filters(&mut builder, &query);
        assert_eq!(builder.sql(), "SELECT COUNT(*) FROM jobs j WHERE j.is_active = TRUE");
    }
}
