use crate::error::CoreError;
use crate::models::{Category, CategoryData, OwnerId, Task};
use crate::repository::SqliteRepository;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Sqlite, Transaction};
use tracing::{info, warn};
use uuid::Uuid;

#[async_trait]
impl super::CategoryRepository for SqliteRepository {
    async fn create_category(&self, owner: &OwnerId, data: CategoryData) -> Result<Category, CoreError> {
        let name = data.validate()?;

        let category: Category = sqlx::query_as(
            r#"INSERT INTO categories (id, owner, name, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(owner)
        .bind(name)
        .bind(Utc::now())
        .fetch_one(self.pool())
        .await?;

        info!(owner = %owner, category_id = %category.id, "created category");
        Ok(category)
    }

    async fn update_category(&self, owner: &OwnerId, id: Uuid, data: CategoryData) -> Result<Category, CoreError> {
        let name = data.validate()?;

        sqlx::query_as("UPDATE categories SET name = $1 WHERE id = $2 AND owner = $3 RETURNING *")
            .bind(name)
            .bind(id)
            .bind(owner)
            .fetch_optional(self.pool())
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("Category {} not found", id)))
    }

    async fn delete_category(&self, owner: &OwnerId, id: Uuid) -> Result<(), CoreError> {
        let mut tx = self.pool().begin().await?;

        let category: Category = sqlx::query_as("SELECT * FROM categories WHERE id = $1 AND owner = $2")
            .bind(id)
            .bind(owner)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("Category {} not found", id)))?;

        // Any task blocks the delete, whoever owns it.
        let task_count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tasks WHERE category_id = $1")
            .bind(category.id)
            .fetch_one(&mut *tx)
            .await?;

        if task_count.0 > 0 {
            warn!(owner = %owner, category_id = %id, tasks = task_count.0, "category delete blocked");
            return Err(CoreError::CategoryInUse(format!(
                "'{}' has {} associated task(s). Please remove tasks first.",
                category.name, task_count.0
            )));
        }

        sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(category.id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        info!(owner = %owner, category_id = %id, "deleted category");
        Ok(())
    }

    async fn find_category(&self, owner: &OwnerId, id: Uuid) -> Result<Category, CoreError> {
        sqlx::query_as("SELECT * FROM categories WHERE id = $1 AND (owner = $2 OR owner IS NULL)")
            .bind(id)
            .bind(owner)
            .fetch_optional(self.pool())
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("Category {} not found", id)))
    }

    async fn list_categories(&self, owner: &OwnerId) -> Result<Vec<Category>, CoreError> {
        let categories = sqlx::query_as(
            "SELECT * FROM categories WHERE owner = $1 OR owner IS NULL ORDER BY name COLLATE NOCASE, id",
        )
        .bind(owner)
        .fetch_all(self.pool())
        .await?;
        Ok(categories)
    }

    async fn find_tasks_by_category(&self, owner: &OwnerId, category_id: Uuid) -> Result<Vec<Task>, CoreError> {
        // The category may belong to anyone; only the owner's tasks are listed.
        let category: Category = sqlx::query_as("SELECT * FROM categories WHERE id = $1")
            .bind(category_id)
            .fetch_optional(self.pool())
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("Category {} not found", category_id)))?;

        let tasks = sqlx::query_as(
            "SELECT * FROM tasks WHERE category_id = $1 AND owner = $2 ORDER BY created_at DESC, id DESC",
        )
        .bind(category.id)
        .bind(owner)
        .fetch_all(self.pool())
        .await?;
        Ok(tasks)
    }
}

impl SqliteRepository {
    /// A task may only reference a category the owner can see: their own or
    /// a legacy one without owner.
    pub(crate) async fn check_category_in_transaction<'a>(
        tx: &mut Transaction<'a, Sqlite>,
        owner: &OwnerId,
        category_id: Option<Uuid>,
    ) -> Result<(), CoreError> {
        let Some(category_id) = category_id else {
            return Ok(());
        };

        let visible: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM categories WHERE id = $1 AND (owner = $2 OR owner IS NULL)")
                .bind(category_id)
                .bind(owner)
                .fetch_optional(&mut **tx)
                .await?;

        match visible {
            Some(_) => Ok(()),
            None => Err(CoreError::Validation(format!("Unknown category: {}", category_id))),
        }
    }
}
