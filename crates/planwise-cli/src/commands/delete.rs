use anyhow::Result;
use dialoguer::Confirm;
use planwise_core::models::OwnerId;
use planwise_core::repository::Repository;

use crate::cli::DeleteCommand;
use crate::util::resolve_task_id;

pub async fn delete_task(repo: &impl Repository, owner: &OwnerId, command: DeleteCommand) -> Result<()> {
    let task_id = resolve_task_id(repo, owner, &command.id).await?;
    let task = repo.find_task(owner, task_id).await?;

    if !command.force {
        let confirmation = Confirm::new()
            .with_prompt(format!("Are you sure you want to delete task '{}'?", task.title))
            .default(false)
            .interact()
            .unwrap_or(false);

        if !confirmation {
            println!("Deletion cancelled.");
            return Ok(());
        }
    }

    let deleted = repo.delete_task(owner, task_id).await?;
    if deleted > 1 {
        println!("Deleted task '{}' and {} subtask(s).", task.title, deleted - 1);
    } else {
        println!("Deleted task '{}'.", task.title);
    }

    Ok(())
}
