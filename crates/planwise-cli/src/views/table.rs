use chrono::{Local, NaiveDate, NaiveTime, TimeZone};
use chrono_humanize::{Accuracy, HumanTime, Tense};
use comfy_table::{Attribute, Cell, Color, Row, Table};
use owo_colors::OwoColorize;
use planwise_core::models::{Category, Task, TaskSummary};
use std::collections::HashMap;
use uuid::Uuid;

use crate::util::short_id;

#[derive(Debug, Clone)]
pub struct ViewTask {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub is_completed: bool,
    pub due_date: Option<NaiveDate>,
    pub category_name: Option<String>,
    pub is_recurring: bool,
    pub is_subtask: bool,
}

impl ViewTask {
    /// Joins a task with the names of the categories it may reference.
    pub fn from_task(task: Task, categories: &HashMap<Uuid, String>) -> Self {
        Self {
            id: task.id,
            category_name: task.category_id.and_then(|id| categories.get(&id).cloned()),
            title: task.title,
            description: task.description,
            is_completed: task.is_completed,
            due_date: task.due_date,
            is_recurring: task.is_recurring,
            is_subtask: task.parent_id.is_some(),
        }
    }
}

pub fn category_names(categories: &[Category]) -> HashMap<Uuid, String> {
    categories.iter().map(|c| (c.id, c.name.clone())).collect()
}

/// "in 3 days", "2 weeks ago", "today"
fn humanize_due(due: NaiveDate, today: NaiveDate) -> String {
    if due == today {
        return "today".to_string();
    }
    let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(NaiveTime::MIN);
    let delta = due.and_time(noon) - today.and_time(noon);
    let tense = if delta.num_seconds() < 0 { Tense::Past } else { Tense::Future };
    HumanTime::from(delta).to_text_en(Accuracy::Rough, tense)
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn display_tasks(tasks: &[ViewTask]) {
    if tasks.is_empty() {
        println!("No tasks found.");
        return;
    }

    let today = today();
    let mut table = Table::new();
    table.set_header(vec!["ID", "Title", "Status", "Due Date", "Category"]);

    for task in tasks {
        let mut row = Row::new();
        row.add_cell(Cell::new(short_id(&task.id)));

        let mut display_name = String::new();
        if task.is_subtask {
            display_name.push_str("  ");
        }
        if task.is_recurring {
            display_name.push('↻');
            display_name.push(' ');
        }
        display_name.push_str(&task.title);

        let name_cell = if task.is_completed {
            Cell::new(display_name)
                .add_attribute(Attribute::CrossedOut)
                .fg(Color::DarkGrey)
        } else {
            Cell::new(display_name)
        };
        row.add_cell(name_cell);

        row.add_cell(if task.is_completed {
            Cell::new("Completed").fg(Color::Green)
        } else {
            Cell::new("Pending")
        });

        let due_date_cell = match task.due_date {
            Some(due) => {
                let text = format!("{} ({})", due, humanize_due(due, today));
                if task.is_completed {
                    Cell::new(text)
                } else if due < today {
                    Cell::new(text).fg(Color::Red)
                } else if due == today {
                    Cell::new(text).fg(Color::Yellow)
                } else {
                    Cell::new(text)
                }
            }
            None => Cell::new("None"),
        };
        row.add_cell(due_date_cell);

        row.add_cell(Cell::new(task.category_name.as_deref().unwrap_or("None")));
        table.add_row(row);
    }

    println!("{table}");
}

pub fn display_task_detail(task: &ViewTask, subtasks: &[ViewTask]) {
    let today = today();
    println!("{} {}", short_id(&task.id).yellow(), task.title.bold());
    println!("  ID:        {}", task.id);
    println!(
        "  Status:    {}",
        if task.is_completed { "Completed".green().to_string() } else { "Pending".to_string() }
    );
    if let Some(due) = task.due_date {
        println!("  Due:       {} ({})", due, humanize_due(due, today));
    }
    if let Some(category) = &task.category_name {
        println!("  Category:  {}", category);
    }
    if task.is_recurring {
        println!("  Recurring: yes");
    }
    if let Some(description) = &task.description {
        println!("\n{}", description);
    }

    println!("\nSubtasks:");
    display_tasks(subtasks);
}

pub fn display_categories(categories: &[Category]) {
    if categories.is_empty() {
        println!("No categories found.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Name", "Created At"]);

    for category in categories {
        let mut row = Row::new();
        row.add_cell(Cell::new(category.id.to_string()));
        row.add_cell(Cell::new(&category.name));
        row.add_cell(Cell::new(
            Local
                .from_utc_datetime(&category.created_at.naive_utc())
                .format("%Y-%m-%d %H:%M")
                .to_string(),
        ));
        table.add_row(row);
    }

    println!("{table}");
}

pub fn display_summary(summary: &TaskSummary) {
    println!(
        "{} total  {} completed  {} pending  {} overdue",
        summary.total.bold(),
        summary.completed.green(),
        summary.pending.yellow(),
        summary.overdue.red()
    );
}
