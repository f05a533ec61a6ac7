use anyhow::Result;
use planwise_core::models::OwnerId;
use planwise_core::repository::Repository;

use crate::cli::DoneCommand;
use crate::util::resolve_task_id;

pub async fn toggle_task(repo: &impl Repository, owner: &OwnerId, command: DoneCommand) -> Result<()> {
    let task_id = resolve_task_id(repo, owner, &command.id).await?;
    let task = repo.toggle_complete(owner, task_id).await?;

    if task.is_completed {
        println!("Completed task: '{}'", task.title);
    } else {
        println!("Reopened task: '{}'", task.title);
    }

    Ok(())
}
