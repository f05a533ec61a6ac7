use anyhow::Result;
use owo_colors::{OwoColorize, Style};
use planwise_core::models::{OwnerId, RecurrenceFrequency, Task, TaskData};
use planwise_core::repository::Repository;

use crate::cli::{AddCommand, ReplyCommand, TaskFields};
use crate::parser::parse_optional_date;
use crate::util::{resolve_optional_category, resolve_task_id};

/// Turns the shared task flags into a payload for the core.
pub(crate) async fn task_data(
    repo: &impl Repository,
    owner: &OwnerId,
    title: String,
    fields: TaskFields,
) -> Result<TaskData> {
    Ok(TaskData {
        title,
        description: fields.description,
        category_id: resolve_optional_category(repo, owner, fields.category.as_deref()).await?,
        due_date: parse_optional_date(fields.due.as_deref())?,
        is_completed: false,
        is_recurring: fields.every.is_some(),
        recurrence_frequency: fields.every.map(|f| RecurrenceFrequency::from(f).to_string()),
        recurrence_end_date: parse_optional_date(fields.until.as_deref())?,
    })
}

pub async fn add_task(repo: &impl Repository, owner: &OwnerId, command: AddCommand) -> Result<()> {
    let data = task_data(repo, owner, command.title, command.fields).await?;
    let created = repo.create_task(owner, data).await?;
    report_created(&created, "task");
    Ok(())
}

pub async fn reply_task(repo: &impl Repository, owner: &OwnerId, command: ReplyCommand) -> Result<()> {
    let parent_id = resolve_task_id(repo, owner, &command.parent).await?;
    let data = task_data(repo, owner, command.title, command.fields).await?;
    let created = repo.add_subtask(owner, parent_id, data).await?;
    report_created(&created, "subtask");
    Ok(())
}

pub(crate) fn report_created(created: &[Task], kind: &str) {
    let success_style = Style::new().green().bold();
    let info_style = Style::new().blue();

    match created {
        [] => {
            println!(
                "{} No {} created: the series has no occurrences (missing due or end date, or due date after end date)",
                "!".yellow().bold(),
                kind
            );
        }
        [task] if !task.is_recurring => {
            println!("{} Created {}: {}", "✓".style(success_style), kind, task.title.bright_white().bold());
            println!("  {} Task ID: {}", "→".style(info_style), task.id.to_string().yellow());
            if let Some(due) = task.due_date {
                println!("  {} Due: {}", "→".style(info_style), due.to_string().cyan());
            }
        }
        [first, ..] => {
            println!(
                "{} Created recurring {}: {}",
                "✓".style(success_style),
                kind,
                first.title.bright_white().bold()
            );
            println!("  {} {} instances", "→".style(info_style), created.len());
            if let (Some(from), Some(to)) = (first.due_date, created.last().and_then(|t| t.due_date)) {
                println!("  {} From {} to {}", "→".style(info_style), from.to_string().cyan(), to.to_string().cyan());
            }
            println!("  {} Series ID: {}", "→".style(info_style), first.series_id.to_string().yellow());
        }
    }
}
