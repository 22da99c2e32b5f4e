use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::profile_dto::UpdateProfilePayload;
use crate::error::{is_unique_violation, Error, Result};
use crate::middleware::auth::Claims;
use crate::models::user::{User, ROLE_ADMIN, ROLE_USER};

#[derive(Clone)]
pub struct UserService {
    pool: PgPool,
    admin_external_ids: Vec<String>,
}

impl UserService {
    pub fn new(pool: PgPool, admin_external_ids: Vec<String>) -> Self {
        Self {
            pool,
            admin_external_ids,
        }
    }

    /// Looks up the user backing a verified token, creating the row on
    /// first sight. Two concurrent first requests can both attempt the
    /// insert; the unique index on external_id resolves the race and the
    /// loser re-selects.
    pub async fn resolve(&self, claims: &Claims) -> Result<User> {
        if let Some(user) = self.find_by_external_id(&claims.sub).await? {
            return Ok(user);
        }

        let name = claims
            .name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or("New User");
        let role = if self.admin_external_ids.iter().any(|id| id == &claims.sub) {
            ROLE_ADMIN
        } else {
            ROLE_USER
        };

        let inserted = sqlx::query_as::<_, User>(
            "INSERT INTO users (external_id, name, email, role) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(&claims.sub)
        .bind(name)
        .bind(&claims.email)
        .bind(role)
        .fetch_one(&self.pool)
        .await;

        match inserted {
            Ok(user) => Ok(user),
            Err(e) if is_unique_violation(&e) => self
                .find_by_external_id(&claims.sub)
                .await?
                .ok_or_else(|| Error::NotFound("User not found".to_string())),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn get(&self, id: Uuid) -> Result<User> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("User not found".to_string()))?;
        Ok(user)
    }

    pub async fn update_profile(&self, id: Uuid, payload: UpdateProfilePayload) -> Result<User> {
        let preferences = payload.preferences.unwrap_or_default();

        let user = sqlx::query_as::<_, User>(
            "UPDATE users SET \
             name = COALESCE($2, name), \
             email = COALESCE($3, email), \
             profile_image = COALESCE($4, profile_image), \
             preferred_categories = COALESCE($5, preferred_categories), \
             preferred_job_types = COALESCE($6, preferred_job_types), \
             preferred_locations = COALESCE($7, preferred_locations), \
             updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&payload.name)
        .bind(&payload.email)
        .bind(&payload.profile_image)
        .bind(&preferences.categories)
        .bind(&preferences.job_types)
        .bind(&preferences.locations)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("User not found".to_string()))?;

        Ok(user)
    }

    async fn find_by_external_id(&self, external_id: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE external_id = $1")
            .bind(external_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }
}
