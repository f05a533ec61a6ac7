use anyhow::Result;
use chrono::Utc;
use chrono_tz::Tz;
use planwise_core::models::OwnerId;
use planwise_core::query::TaskQuery;
use planwise_core::repository::Repository;

use crate::cli::{ListCommand, ShowCommand, SummaryCommand};
use crate::util::{resolve_optional_category, resolve_task_id};
use crate::views::table::{category_names, display_summary, display_task_detail, display_tasks, ViewTask};

pub async fn list_tasks(repo: &impl Repository, owner: &OwnerId, command: ListCommand) -> Result<()> {
    let mut query = if command.all { TaskQuery::default() } else { TaskQuery::top_level() };
    if let Some(search) = command.search {
        query = query.with_search(search);
    }
    if let Some(category_id) = resolve_optional_category(repo, owner, command.category.as_deref()).await? {
        query = query.in_category(category_id);
    }
    if command.pending {
        query = query.completed(false);
    }

    let names = category_names(&repo.list_categories(owner).await?);
    let tasks: Vec<ViewTask> = repo
        .list_tasks(owner, &query)
        .await?
        .into_iter()
        .map(|t| ViewTask::from_task(t, &names))
        .collect();

    display_tasks(&tasks);
    Ok(())
}

pub async fn show_task(repo: &impl Repository, owner: &OwnerId, command: ShowCommand) -> Result<()> {
    let task_id = resolve_task_id(repo, owner, &command.id).await?;
    let names = category_names(&repo.list_categories(owner).await?);

    let task = ViewTask::from_task(repo.find_task(owner, task_id).await?, &names);
    let subtasks: Vec<ViewTask> = repo
        .find_subtasks(owner, task_id)
        .await?
        .into_iter()
        .map(|t| ViewTask::from_task(t, &names))
        .collect();

    display_task_detail(&task, &subtasks);
    Ok(())
}

pub async fn summarize_tasks(
    repo: &impl Repository,
    owner: &OwnerId,
    command: SummaryCommand,
    tz: Tz,
) -> Result<()> {
    let mut query = TaskQuery::top_level();
    if let Some(search) = command.search {
        query = query.with_search(search);
    }

    let summary = repo.task_summary(owner, &query, Utc::now().with_timezone(&tz).date_naive()).await?;
    display_summary(&summary);
    Ok(())
}
