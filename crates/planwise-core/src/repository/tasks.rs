use crate::calendar::{self, CalendarEvent};
use crate::error::CoreError;
use crate::models::{OwnerId, Task, TaskData, TaskSummary, TaskTemplate};
use crate::query::TaskQuery;
use crate::recurrence::RecurrenceExpander;
use crate::repository::query_builder::SqlQueryBuilder;
use crate::repository::SqliteRepository;
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use sqlx::{QueryBuilder, Sqlite, Transaction};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Rows per multi-row INSERT; 14 columns each keeps a statement under
/// SQLite's historical limit of 999 bound parameters.
const INSERT_CHUNK_SIZE: usize = 64;

#[async_trait]
impl super::TaskRepository for SqliteRepository {
    async fn create_task(&self, owner: &OwnerId, data: TaskData) -> Result<Vec<Task>, CoreError> {
        let template = data.validate()?;

        let mut tx = self.pool().begin().await?;
        let created = Self::create_in_transaction(&mut tx, owner, template).await?;
        tx.commit().await?;

        Ok(created)
    }

    async fn add_subtask(&self, owner: &OwnerId, parent_id: Uuid, data: TaskData) -> Result<Vec<Task>, CoreError> {
        let mut tx = self.pool().begin().await?;

        let parent = Self::find_owned_task_in_transaction(&mut tx, owner, parent_id).await?;
        let mut template = data.validate()?;
        template.parent_id = Some(parent.id);

        let created = Self::create_in_transaction(&mut tx, owner, template).await?;
        tx.commit().await?;

        debug!(owner = %owner, parent_id = %parent.id, count = created.len(), "added subtask");
        Ok(created)
    }

    async fn update_task(&self, owner: &OwnerId, id: Uuid, data: TaskData) -> Result<Vec<Task>, CoreError> {
        let mut tx = self.pool().begin().await?;

        let current = Self::find_owned_task_in_transaction(&mut tx, owner, id).await?;
        let mut template = data.validate()?;
        // An edit never moves a task in the hierarchy.
        template.parent_id = current.parent_id;
        Self::check_category_in_transaction(&mut tx, owner, template.category_id).await?;

        let updated = if template.is_recurring {
            Self::replace_series(&mut tx, owner, &current, template).await?
        } else {
            if template.is_completed && !current.is_completed {
                Self::ensure_subtasks_complete(&mut tx, &current, "complete").await?;
            }
            vec![Self::update_task_fields(&mut tx, owner, id, &template).await?]
        };

        tx.commit().await?;
        Ok(updated)
    }

    async fn toggle_complete(&self, owner: &OwnerId, id: Uuid) -> Result<Task, CoreError> {
        let mut tx = self.pool().begin().await?;

        let task = Self::find_owned_task_in_transaction(&mut tx, owner, id).await?;
        if !task.is_completed {
            Self::ensure_subtasks_complete(&mut tx, &task, "complete").await?;
        }

        let toggled: Task = sqlx::query_as(
            r#"UPDATE tasks
            SET is_completed = $1, updated_at = $2
            WHERE id = $3
            RETURNING *
            "#,
        )
        .bind(!task.is_completed)
        .bind(Utc::now())
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(owner = %owner, task_id = %id, completed = toggled.is_completed, "toggled task completion");
        Ok(toggled)
    }

    async fn delete_task(&self, owner: &OwnerId, id: Uuid) -> Result<u64, CoreError> {
        let mut tx = self.pool().begin().await?;

        let task = Self::find_owned_task_in_transaction(&mut tx, owner, id).await?;
        Self::ensure_subtasks_complete(&mut tx, &task, "delete").await?;
        let deleted = Self::delete_subtree(&mut tx, task.id).await?;

        tx.commit().await?;

        info!(owner = %owner, task_id = %id, deleted, "deleted task");
        Ok(deleted)
    }

    async fn find_task(&self, owner: &OwnerId, id: Uuid) -> Result<Task, CoreError> {
        sqlx::query_as("SELECT * FROM tasks WHERE id = $1 AND owner = $2")
            .bind(id)
            .bind(owner)
            .fetch_optional(self.pool())
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("Task {} not found", id)))
    }

    async fn find_tasks_by_id_prefix(&self, owner: &OwnerId, prefix: &str) -> Result<Vec<Task>, CoreError> {
        // Ids are stored as blobs, so prefix matching happens on the hyphenated form here.
        let prefix = prefix.trim().to_lowercase();
        let tasks: Vec<Task> = sqlx::query_as("SELECT * FROM tasks WHERE owner = $1 ORDER BY created_at DESC")
            .bind(owner)
            .fetch_all(self.pool())
            .await?;

        Ok(tasks
            .into_iter()
            .filter(|task| task.id.to_string().starts_with(&prefix))
            .collect())
    }

    async fn list_tasks(&self, owner: &OwnerId, query: &TaskQuery) -> Result<Vec<Task>, CoreError> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT t.* FROM tasks t");
        SqlQueryBuilder::build_task_where_clause(owner, query, &mut qb);
        qb.push(" ORDER BY t.created_at DESC, t.id DESC");

        let tasks = qb.build_query_as().fetch_all(self.pool()).await?;
        Ok(tasks)
    }

    async fn find_subtasks(&self, owner: &OwnerId, parent_id: Uuid) -> Result<Vec<Task>, CoreError> {
        let parent = self.find_task(owner, parent_id).await?;

        let subtasks = sqlx::query_as(
            "SELECT * FROM tasks WHERE parent_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(parent.id)
        .fetch_all(self.pool())
        .await?;
        Ok(subtasks)
    }

    async fn find_series(&self, owner: &OwnerId, series_id: Uuid) -> Result<Vec<Task>, CoreError> {
        let tasks = sqlx::query_as(
            "SELECT * FROM tasks WHERE owner = $1 AND series_id = $2 ORDER BY due_date, id",
        )
        .bind(owner)
        .bind(series_id)
        .fetch_all(self.pool())
        .await?;
        Ok(tasks)
    }

    async fn task_summary(&self, owner: &OwnerId, query: &TaskQuery, today: NaiveDate) -> Result<TaskSummary, CoreError> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
            r#"SELECT
                COUNT(*) AS total,
                COALESCE(SUM(CASE WHEN t.is_completed THEN 1 ELSE 0 END), 0) AS completed,
                COALESCE(SUM(CASE WHEN t.is_completed THEN 0 ELSE 1 END), 0) AS pending,
                COALESCE(SUM(CASE WHEN NOT t.is_completed AND t.due_date IS NOT NULL AND t.due_date < "#,
        );
        qb.push_bind(today);
        qb.push(" THEN 1 ELSE 0 END), 0) AS overdue FROM tasks t");
        SqlQueryBuilder::build_task_where_clause(owner, query, &mut qb);

        let summary = qb.build_query_as().fetch_one(self.pool()).await?;
        Ok(summary)
    }

    async fn calendar_events(&self, owner: &OwnerId, tz: Tz, today: NaiveDate) -> Result<Vec<CalendarEvent>, CoreError> {
        let tasks: Vec<Task> = sqlx::query_as(
            "SELECT * FROM tasks WHERE owner = $1 AND due_date IS NOT NULL ORDER BY due_date, id",
        )
        .bind(owner)
        .fetch_all(self.pool())
        .await?;

        Ok(calendar::build_events(&tasks, tz, today))
    }
}

impl SqliteRepository {
    /// Persists a validated template within an existing transaction.
    ///
    /// # Behavior
    /// - Recurring: a fresh series id is generated and only the expanded
    ///   instances are written; the template itself is never stored
    /// - Otherwise: a single row owned by `owner`
    pub(crate) async fn create_in_transaction<'a>(
        tx: &mut Transaction<'a, Sqlite>,
        owner: &OwnerId,
        template: TaskTemplate,
    ) -> Result<Vec<Task>, CoreError> {
        Self::check_category_in_transaction(tx, owner, template.category_id).await?;

        let tasks: Vec<Task> = if template.is_recurring {
            let expander = RecurrenceExpander::new(template, owner.clone());
            let instances: Vec<Task> = expander.expand()?.collect();
            info!(
                owner = %owner,
                series_id = %expander.series_id(),
                count = instances.len(),
                "expanded recurring task"
            );
            instances
        } else {
            vec![Task::from_template(&template, owner, template.due_date, Uuid::new_v4())]
        };

        Self::insert_tasks(tx, &tasks).await?;
        Ok(tasks)
    }

    /// Deletes every task of `current`'s series and regenerates it from the
    /// edited template under the same series id.
    async fn replace_series<'a>(
        tx: &mut Transaction<'a, Sqlite>,
        owner: &OwnerId,
        current: &Task,
        template: TaskTemplate,
    ) -> Result<Vec<Task>, CoreError> {
        let blocking: Vec<Task> = sqlx::query_as(
            r#"SELECT c.* FROM tasks c
            INNER JOIN tasks p ON c.parent_id = p.id
            WHERE p.owner = $1 AND p.series_id = $2
            AND c.series_id != p.series_id AND c.is_completed = FALSE
            ORDER BY c.created_at"#,
        )
        .bind(owner)
        .bind(current.series_id)
        .fetch_all(&mut **tx)
        .await?;

        if !blocking.is_empty() {
            warn!(owner = %owner, series_id = %current.series_id, "series edit blocked by incomplete subtasks");
            return Err(CoreError::BlockedByIncompleteChildren(format!(
                "cannot regenerate series of '{}' while {} has incomplete subtasks ({})",
                current.title,
                if blocking.len() == 1 { "an instance" } else { "instances" },
                Self::titles(&blocking)
            )));
        }

        let old_ids: Vec<Uuid> = sqlx::query_scalar("SELECT id FROM tasks WHERE owner = $1 AND series_id = $2")
            .bind(owner)
            .bind(current.series_id)
            .fetch_all(&mut **tx)
            .await?;

        let mut removed = 0;
        for old_id in old_ids {
            removed += Self::delete_subtree(tx, old_id).await?;
        }

        let expander = RecurrenceExpander::with_series_id(template, owner.clone(), current.series_id);
        let instances: Vec<Task> = expander.expand()?.collect();
        Self::insert_tasks(tx, &instances).await?;

        info!(
            owner = %owner,
            series_id = %current.series_id,
            removed,
            created = instances.len(),
            "regenerated recurring series"
        );
        Ok(instances)
    }

    /// Replaces the editable fields of one task within an existing transaction
    async fn update_task_fields<'a>(
        tx: &mut Transaction<'a, Sqlite>,
        owner: &OwnerId,
        id: Uuid,
        template: &TaskTemplate,
    ) -> Result<Task, CoreError> {
        let task = sqlx::query_as(
            r#"UPDATE tasks
            SET title = $1, description = $2, due_date = $3, category_id = $4, is_completed = $5,
                is_recurring = $6, recurrence_frequency = $7, recurrence_end_date = $8, updated_at = $9
            WHERE id = $10 AND owner = $11
            RETURNING *
            "#,
        )
        .bind(&template.title)
        .bind(&template.description)
        .bind(template.due_date)
        .bind(template.category_id)
        .bind(template.is_completed)
        .bind(template.is_recurring)
        .bind(template.recurrence_frequency)
        .bind(template.recurrence_end_date)
        .bind(Utc::now())
        .bind(id)
        .bind(owner)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| CoreError::NotFound(format!("Task {} not found", id)))?;

        debug!(owner = %owner, task_id = %id, "updated task fields");
        Ok(task)
    }

    /// Writes rows with batched multi-row INSERTs inside the caller's transaction
    pub(crate) async fn insert_tasks<'a>(
        tx: &mut Transaction<'a, Sqlite>,
        tasks: &[Task],
    ) -> Result<(), CoreError> {
        for chunk in tasks.chunks(INSERT_CHUNK_SIZE) {
            let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
                "INSERT INTO tasks (id, title, description, due_date, category_id, is_completed, created_at, updated_at, owner, parent_id, is_recurring, recurrence_frequency, recurrence_end_date, series_id) ",
            );
            qb.push_values(chunk, |mut b, task| {
                b.push_bind(task.id)
                    .push_bind(task.title.clone())
                    .push_bind(task.description.clone())
                    .push_bind(task.due_date)
                    .push_bind(task.category_id)
                    .push_bind(task.is_completed)
                    .push_bind(task.created_at)
                    .push_bind(task.updated_at)
                    .push_bind(task.owner.clone())
                    .push_bind(task.parent_id)
                    .push_bind(task.is_recurring)
                    .push_bind(task.recurrence_frequency)
                    .push_bind(task.recurrence_end_date)
                    .push_bind(task.series_id);
            });
            qb.build().execute(&mut **tx).await?;
        }
        Ok(())
    }

    /// Find a task by id and owner within an existing transaction
    pub(crate) async fn find_owned_task_in_transaction<'a>(
        tx: &mut Transaction<'a, Sqlite>,
        owner: &OwnerId,
        id: Uuid,
    ) -> Result<Task, CoreError> {
        sqlx::query_as("SELECT * FROM tasks WHERE id = $1 AND owner = $2")
            .bind(id)
            .bind(owner)
            .fetch_optional(&mut **tx)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("Task {} not found", id)))
    }

    /// Fails with `BlockedByIncompleteChildren` when any direct subtask is open
    async fn ensure_subtasks_complete<'a>(
        tx: &mut Transaction<'a, Sqlite>,
        task: &Task,
        action: &str,
    ) -> Result<(), CoreError> {
        let incomplete: Vec<Task> = sqlx::query_as(
            "SELECT * FROM tasks WHERE parent_id = $1 AND is_completed = FALSE ORDER BY created_at",
        )
        .bind(task.id)
        .fetch_all(&mut **tx)
        .await?;

        if incomplete.is_empty() {
            return Ok(());
        }

        warn!(task_id = %task.id, action, blocking = incomplete.len(), "blocked by incomplete subtasks");
        Err(CoreError::BlockedByIncompleteChildren(format!(
            "cannot {} '{}' while subtasks are incomplete: {}",
            action,
            task.title,
            Self::titles(&incomplete)
        )))
    }

    /// Deletes a task and all of its descendants, deepest first, so the
    /// schema-level cascade never has anything left to do.
    async fn delete_subtree<'a>(
        tx: &mut Transaction<'a, Sqlite>,
        root_id: Uuid,
    ) -> Result<u64, CoreError> {
        let ids: Vec<Uuid> = sqlx::query_scalar(
            r#"WITH RECURSIVE subtree (id, depth) AS (
                SELECT id, 0 FROM tasks WHERE id = $1
                UNION ALL
                SELECT t.id, s.depth + 1
                FROM tasks t
                JOIN subtree s ON t.parent_id = s.id
            )
            SELECT id FROM subtree ORDER BY depth DESC"#,
        )
        .bind(root_id)
        .fetch_all(&mut **tx)
        .await?;

        let mut deleted = 0;
        for id in ids {
            deleted += sqlx::query("DELETE FROM tasks WHERE id = $1")
                .bind(id)
                .execute(&mut **tx)
                .await?
                .rows_affected();
        }
        Ok(deleted)
    }

    fn titles(tasks: &[Task]) -> String {
        tasks
            .iter()
            .map(|t| t.title.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
