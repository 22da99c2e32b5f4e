use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::category_dto::{CreateCategoryPayload, UpdateCategoryPayload};
use crate::error::{is_unique_violation, Error, Result};
use crate::models::category::Category;

#[derive(Clone)]
pub struct CategoryService {
    pool: PgPool,
}

impl CategoryService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, payload: CreateCategoryPayload) -> Result<Category> {
        let category = sqlx::query_as::<_, Category>(
            "INSERT INTO categories (name, description, icon, color) \
             VALUES ($1, $2, $3, COALESCE($4, '#10B981')) RETURNING *",
        )
        .bind(&payload.name)
        .bind(&payload.description)
        .bind(&payload.icon)
        .bind(&payload.color)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                Error::Duplicate("Category already exists".to_string())
            } else {
                e.into()
            }
        })?;

        Ok(category)
    }

    pub async fn list(&self) -> Result<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT * FROM categories WHERE is_active = TRUE ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(categories)
    }

    pub async fn get(&self, id: Uuid) -> Result<Category> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT * FROM categories WHERE id = $1 AND is_active = TRUE",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Category not found".to_string()))?;
        Ok(category)
    }

    pub async fn update(&self, id: Uuid, payload: UpdateCategoryPayload) -> Result<Category> {
        let category = sqlx::query_as::<_, Category>(
            "UPDATE categories SET \
             name = COALESCE($2, name), \
             description = COALESCE($3, description), \
             icon = COALESCE($4, icon), \
             color = COALESCE($5, color), \
             updated_at = NOW() \
             WHERE id = $1 AND is_active = TRUE RETURNING *",
        )
        .bind(id)
        .bind(&payload.name)
        .bind(&payload.description)
        .bind(&payload.icon)
        .bind(&payload.color)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                Error::Duplicate("Category already exists".to_string())
            } else {
                Error::from(e)
            }
        })?
        .ok_or_else(|| Error::NotFound("Category not found".to_string()))?;

        Ok(category)
    }

    pub async fn soft_delete(&self, id: Uuid) -> Result<()> {
        let updated = sqlx::query(
            "UPDATE categories SET is_active = FALSE, updated_at = NOW() \
             WHERE id = $1 AND is_active = TRUE",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(Error::NotFound("Category not found".to_string()));
        }
        Ok(())
    }
}
