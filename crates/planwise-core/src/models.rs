use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

use crate::error::CoreError;

pub const MAX_TITLE_LEN: usize = 200;
pub const MAX_CATEGORY_NAME_LEN: usize = 100;

/// Opaque, stable identifier of the acting user, supplied by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(transparent)]
pub struct OwnerId(String);

impl OwnerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: Uuid,
    /// Unset for legacy categories created before ownership existed.
    pub owner: Option<OwnerId>,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceFrequency {
    Daily,
    Weekly,
    Monthly,
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid recurrence frequency: {0}")]
pub struct ParseRecurrenceFrequencyError(String);

impl FromStr for RecurrenceFrequency {
    type Err = ParseRecurrenceFrequencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(RecurrenceFrequency::Daily),
            "weekly" => Ok(RecurrenceFrequency::Weekly),
            "monthly" => Ok(RecurrenceFrequency::Monthly),
            _ => Err(ParseRecurrenceFrequencyError(s.to_string())),
        }
    }
}

impl fmt::Display for RecurrenceFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecurrenceFrequency::Daily => write!(f, "daily"),
            RecurrenceFrequency::Weekly => write!(f, "weekly"),
            RecurrenceFrequency::Monthly => write!(f, "monthly"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub category_id: Option<Uuid>,
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub owner: OwnerId,
    /// Owning reference: deleting the parent removes this task as well.
    pub parent_id: Option<Uuid>,
    pub is_recurring: bool,
    /// Only meaningful when `is_recurring` is set.
    pub recurrence_frequency: Option<RecurrenceFrequency>,
    pub recurrence_end_date: Option<NaiveDate>,
    /// Shared by every instance generated from one recurring template.
    pub series_id: Uuid,
}

impl Task {
    /// Builds a fresh, not yet persisted row from a validated template.
    pub fn from_template(
        template: &TaskTemplate,
        owner: &OwnerId,
        due_date: Option<NaiveDate>,
        series_id: Uuid,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            title: template.title.clone(),
            description: template.description.clone(),
            due_date,
            category_id: template.category_id,
            is_completed: template.is_completed,
            created_at: now,
            updated_at: now,
            owner: owner.clone(),
            parent_id: template.parent_id,
            is_recurring: template.is_recurring,
            recurrence_frequency: template.recurrence_frequency,
            recurrence_end_date: template.recurrence_end_date,
            series_id,
        }
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.is_completed && self.due_date.is_some_and(|due| due < today)
    }
}

/// Field values submitted by the presentation layer for a task create or edit.
///
/// Carries no owner; the owner always comes from the acting identity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskData {
    pub title: String,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    pub due_date: Option<NaiveDate>,
    pub is_completed: bool,
    pub is_recurring: bool,
    /// Raw frequency as submitted; parsed during validation.
    pub recurrence_frequency: Option<String>,
    pub recurrence_end_date: Option<NaiveDate>,
}

impl TaskData {
    /// Checks the payload against the task schema and produces a typed template.
    pub fn validate(self) -> Result<TaskTemplate, CoreError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(CoreError::Validation("Title is required".to_string()));
        }
        if title.chars().count() > MAX_TITLE_LEN {
            return Err(CoreError::Validation(format!(
                "Title must be at most {} characters",
                MAX_TITLE_LEN
            )));
        }

        let recurrence_frequency = match self.recurrence_frequency.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(
                raw.parse::<RecurrenceFrequency>()
                    .map_err(|_| CoreError::InvalidFrequency(raw.to_string()))?,
            ),
        };

        Ok(TaskTemplate {
            title: title.to_string(),
            description: self.description.filter(|d| !d.trim().is_empty()),
            category_id: self.category_id,
            due_date: self.due_date,
            is_completed: self.is_completed,
            is_recurring: self.is_recurring,
            recurrence_frequency,
            recurrence_end_date: self.recurrence_end_date,
            parent_id: None,
        })
    }
}

/// A validated task payload, ready to be persisted or expanded into a series.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskTemplate {
    pub title: String,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    pub due_date: Option<NaiveDate>,
    pub is_completed: bool,
    pub is_recurring: bool,
    pub recurrence_frequency: Option<RecurrenceFrequency>,
    pub recurrence_end_date: Option<NaiveDate>,
    pub parent_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryData {
    pub name: String,
}

impl CategoryData {
    pub fn validate(self) -> Result<String, CoreError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(CoreError::Validation("Category name is required".to_string()));
        }
        if name.chars().count() > MAX_CATEGORY_NAME_LEN {
            return Err(CoreError::Validation(format!(
                "Category name must be at most {} characters",
                MAX_CATEGORY_NAME_LEN
            )));
        }
        Ok(name.to_string())
    }
}

/// Counts shown on the task list summary cards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, FromRow)]
pub struct TaskSummary {
    pub total: i64,
    pub completed: i64,
    pub pending: i64,
    pub overdue: i64,
}
