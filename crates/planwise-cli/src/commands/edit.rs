use anyhow::{anyhow, Result};
use dialoguer::Confirm;
use planwise_core::error::CoreError;
use planwise_core::models::{OwnerId, RecurrenceFrequency, TaskData};
use planwise_core::repository::Repository;

use crate::cli::EditCommand;
use crate::commands::add::report_created;
use crate::parser::parse_date;
use crate::util::{resolve_category_id, resolve_task_id};

pub async fn edit_task(repo: &impl Repository, owner: &OwnerId, command: EditCommand) -> Result<()> {
    let task_id = resolve_task_id(repo, owner, &command.id).await?;
    let current = repo.find_task(owner, task_id).await?;

    let description = if command.description_clear {
        None
    } else {
        command.description.or(current.description)
    };
    let due_date = if command.due_clear {
        None
    } else {
        match command.due.as_deref() {
            Some(due) => Some(parse_date(due)?),
            None => current.due_date,
        }
    };
    let category_id = if command.category_clear {
        None
    } else {
        match command.category.as_deref() {
            Some(category) => Some(resolve_category_id(repo, owner, category).await?),
            None => current.category_id,
        }
    };
    let is_recurring = !command.recurrence_clear && (command.every.is_some() || current.is_recurring);
    let recurrence_frequency = command
        .every
        .map(RecurrenceFrequency::from)
        .or(current.recurrence_frequency);
    let recurrence_end_date = match command.until.as_deref() {
        Some(until) => Some(parse_date(until)?),
        None => current.recurrence_end_date,
    };
    let is_completed = if command.completed {
        true
    } else if command.pending {
        false
    } else {
        current.is_completed
    };

    // An empty expansion would delete the series without replacing it
    if is_recurring && (due_date.is_none() || recurrence_end_date.is_none()) {
        return Err(anyhow!(CoreError::Validation(
            "A recurring task needs a due date and an end date (--due and --until)".to_string()
        )));
    }

    if is_recurring && !command.force {
        let confirmation = Confirm::new()
            .with_prompt(format!(
                "Editing '{}' regenerates every task of its series. Continue?",
                current.title
            ))
            .default(false)
            .interact()
            .unwrap_or(false);

        if !confirmation {
            println!("Edit cancelled.");
            return Ok(());
        }
    }

    let data = TaskData {
        title: command.title.unwrap_or(current.title),
        description,
        category_id,
        due_date,
        is_completed,
        is_recurring,
        recurrence_frequency: recurrence_frequency.filter(|_| is_recurring).map(|f| f.to_string()),
        recurrence_end_date: recurrence_end_date.filter(|_| is_recurring),
    };

    let updated = repo.update_task(owner, task_id, data).await?;
    if is_recurring {
        report_created(&updated, "task");
    } else if let Some(task) = updated.first() {
        println!("Updated task: '{}'", task.title);
    }

    Ok(())
}
