use anyhow::Result;
use dialoguer::Confirm;
use planwise_core::models::{CategoryData, OwnerId};
use planwise_core::repository::Repository;

use crate::cli::{CategoryCommand, CategorySubcommand};
use crate::util::resolve_category_id;
use crate::views::table::{category_names, display_categories, display_tasks, ViewTask};

pub async fn category_command(repo: &impl Repository, owner: &OwnerId, command: CategoryCommand) -> Result<()> {
    match command.command {
        CategorySubcommand::Add(add) => {
            let category = repo.create_category(owner, CategoryData { name: add.name }).await?;
            println!("Added category: '{}' ({})", category.name, category.id);
        }
        CategorySubcommand::Rename(rename) => {
            let id = resolve_category_id(repo, owner, &rename.id).await?;
            let category = repo.update_category(owner, id, CategoryData { name: rename.name }).await?;
            println!("Renamed category to '{}'", category.name);
        }
        CategorySubcommand::Delete(delete) => {
            let id = resolve_category_id(repo, owner, &delete.id).await?;
            let category = repo.find_category(owner, id).await?;

            if !delete.force {
                let confirmation = Confirm::new()
                    .with_prompt(format!("Are you sure you want to delete category '{}'?", category.name))
                    .default(false)
                    .interact()
                    .unwrap_or(false);

                if !confirmation {
                    println!("Deletion cancelled.");
                    return Ok(());
                }
            }

            repo.delete_category(owner, id).await?;
            println!("Deleted category: '{}'", category.name);
        }
        CategorySubcommand::List => {
            let categories = repo.list_categories(owner).await?;
            display_categories(&categories);
        }
        CategorySubcommand::Tasks(tasks) => {
            let id = resolve_category_id(repo, owner, &tasks.id).await?;
            let names = category_names(&repo.list_categories(owner).await?);
            let tasks: Vec<ViewTask> = repo
                .find_tasks_by_category(owner, id)
                .await?
                .into_iter()
                .map(|t| ViewTask::from_task(t, &names))
                .collect();
            display_tasks(&tasks);
        }
    }

    Ok(())
}
