use crate::calendar::CalendarEvent;
use crate::db::DbPool;
use crate::error::CoreError;
use crate::models::{Category, CategoryData, OwnerId, Task, TaskData, TaskSummary};
use crate::query::TaskQuery;
use async_trait::async_trait;
use chrono::NaiveDate;
use chrono_tz::Tz;
use uuid::Uuid;

// Re-export domain modules
pub mod categories;
pub mod query_builder;
pub mod tasks;

/// Task mutations and reads. Every operation is scoped to the acting owner;
/// a task owned by someone else is reported as `NotFound`.
#[async_trait]
pub trait TaskRepository {
    /// Creates a task, or every instance of its series when it is recurring.
    async fn create_task(&self, owner: &OwnerId, data: TaskData) -> Result<Vec<Task>, CoreError>;
    /// Creates a task (or series) whose parent is the addressed task.
    async fn add_subtask(&self, owner: &OwnerId, parent_id: Uuid, data: TaskData) -> Result<Vec<Task>, CoreError>;
    /// Replaces a task's fields; a recurring edit regenerates its whole series.
    async fn update_task(&self, owner: &OwnerId, id: Uuid, data: TaskData) -> Result<Vec<Task>, CoreError>;
    async fn toggle_complete(&self, owner: &OwnerId, id: Uuid) -> Result<Task, CoreError>;
    /// Deletes a task and its subtree; returns the number of rows removed.
    async fn delete_task(&self, owner: &OwnerId, id: Uuid) -> Result<u64, CoreError>;
    async fn find_task(&self, owner: &OwnerId, id: Uuid) -> Result<Task, CoreError>;
    async fn find_tasks_by_id_prefix(&self, owner: &OwnerId, prefix: &str) -> Result<Vec<Task>, CoreError>;
    async fn list_tasks(&self, owner: &OwnerId, query: &TaskQuery) -> Result<Vec<Task>, CoreError>;
    async fn find_subtasks(&self, owner: &OwnerId, parent_id: Uuid) -> Result<Vec<Task>, CoreError>;
    async fn find_series(&self, owner: &OwnerId, series_id: Uuid) -> Result<Vec<Task>, CoreError>;
    async fn task_summary(&self, owner: &OwnerId, query: &TaskQuery, today: NaiveDate) -> Result<TaskSummary, CoreError>;
    async fn calendar_events(&self, owner: &OwnerId, tz: Tz, today: NaiveDate) -> Result<Vec<CalendarEvent>, CoreError>;
}

/// Category ownership and deletion protection.
#[async_trait]
pub trait CategoryRepository {
    async fn create_category(&self, owner: &OwnerId, data: CategoryData) -> Result<Category, CoreError>;
    async fn update_category(&self, owner: &OwnerId, id: Uuid, data: CategoryData) -> Result<Category, CoreError>;
    async fn delete_category(&self, owner: &OwnerId, id: Uuid) -> Result<(), CoreError>;
    async fn find_category(&self, owner: &OwnerId, id: Uuid) -> Result<Category, CoreError>;
    async fn list_categories(&self, owner: &OwnerId) -> Result<Vec<Category>, CoreError>;
    async fn find_tasks_by_category(&self, owner: &OwnerId, category_id: Uuid) -> Result<Vec<Task>, CoreError>;
}

/// Main repository trait that composes all domain traits
pub trait Repository: TaskRepository + CategoryRepository {}

/// SQLite implementation of the repository pattern
pub struct SqliteRepository {
    pool: DbPool,
}

impl SqliteRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the database pool for internal use across modules
    pub(crate) fn pool(&self) -> &DbPool {
        &self.pool
    }
}

impl Repository for SqliteRepository {}
