use uuid::Uuid;

/// Filters for task listings and summaries. The default lists every task of
/// the owner.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskQuery {
    /// Case-insensitive substring matched against title or description.
    pub search: Option<String>,
    pub category_id: Option<Uuid>,
    pub completed: Option<bool>,
    /// Hide subtasks; the main task list only shows top-level tasks.
    pub top_level_only: bool,
}

impl TaskQuery {
    pub fn top_level() -> Self {
        Self {
            top_level_only: true,
            ..Default::default()
        }
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        let search = search.into();
        self.search = if search.trim().is_empty() { None } else { Some(search) };
        self
    }

    pub fn in_category(mut self, category_id: Uuid) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }
}
