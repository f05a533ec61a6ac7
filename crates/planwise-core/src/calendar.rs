//! Calendar feed for the presentation layer.
//!
//! Built purely from already persisted tasks; nothing here mutates state.

use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::Serialize;
use uuid::Uuid;

use crate::models::Task;
use crate::timezone::local_noon_millis;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EventClass {
    #[serde(rename = "event-success")]
    Success,
    #[serde(rename = "event-important")]
    Important,
    #[serde(rename = "event-info")]
    Info,
}

impl EventClass {
    /// Completed wins over overdue; overdue means due strictly before `today`.
    pub fn for_task(task: &Task, today: NaiveDate) -> Self {
        if task.is_completed {
            EventClass::Success
        } else if task.is_overdue(today) {
            EventClass::Important
        } else {
            EventClass::Info
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarEvent {
    pub id: Uuid,
    pub title: String,
    /// Milliseconds since the epoch at local noon of the due date.
    pub start: i64,
    pub url: String,
    pub class: EventClass,
}

/// One event per task with a due date, in input order. Undated tasks are skipped.
pub fn build_events<'a>(
    tasks: impl IntoIterator<Item = &'a Task>,
    tz: Tz,
    today: NaiveDate,
) -> Vec<CalendarEvent> {
    tasks
        .into_iter()
        .filter_map(|task| {
            let due = task.due_date?;
            Some(CalendarEvent {
                id: task.id,
                title: task.title.clone(),
                start: local_noon_millis(due, tz),
                url: format!("/task/{}/", task.id),
                class: EventClass::for_task(task, today),
            })
        })
        .collect()
}

pub fn to_json(events: &[CalendarEvent]) -> Result<String, serde_json::Error> {
    serde_json::to_string(events)
}
