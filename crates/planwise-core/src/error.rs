use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Database error")]
    Database(#[from] sqlx::Error),

    #[error("Migration error")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("IO error")]
    Io(#[from] std::io::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Blocked by incomplete subtasks: {0}")]
    BlockedByIncompleteChildren(String),

    #[error("Cannot delete category with associated tasks: {0}")]
    CategoryInUse(String),

    #[error("Invalid recurrence frequency: {0}")]
    InvalidFrequency(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// (id, label) of every candidate matching a short id
    #[error("Ambiguous ID")]
    AmbiguousId(Vec<(String, String)>),
}
