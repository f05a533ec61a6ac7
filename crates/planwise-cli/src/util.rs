use anyhow::{anyhow, Result};
use planwise_core::error::CoreError;
use planwise_core::models::OwnerId;
use planwise_core::repository::Repository;
use uuid::Uuid;

const MIN_PREFIX_LEN: usize = 2;

fn check_prefix(short_id: &str) -> Result<()> {
    if short_id.trim().len() < MIN_PREFIX_LEN {
        return Err(anyhow!(CoreError::Validation(
            "Short ID must be at least 2 characters long.".to_string()
        )));
    }
    Ok(())
}

/// Single match wins; none is `NotFound`; several are `AmbiguousId`.
fn pick_unique(kind: &str, short_id: &str, mut matches: Vec<(Uuid, String)>) -> Result<Uuid> {
    match matches.len() {
        1 => Ok(matches.remove(0).0),
        0 => Err(anyhow!(CoreError::NotFound(format!(
            "No {} found with ID prefix '{}'",
            kind, short_id
        )))),
        _ => Err(anyhow!(CoreError::AmbiguousId(
            matches
                .into_iter()
                .map(|(id, label)| (id.to_string(), label))
                .collect()
        ))),
    }
}

pub async fn resolve_task_id(repo: &impl Repository, owner: &OwnerId, short_id: &str) -> Result<Uuid> {
    if let Ok(id) = short_id.parse::<Uuid>() {
        return Ok(id);
    }
    check_prefix(short_id)?;

    let tasks = repo.find_tasks_by_id_prefix(owner, short_id).await?;
    pick_unique(
        "task",
        short_id,
        tasks.into_iter().map(|t| (t.id, t.title)).collect(),
    )
}

pub async fn resolve_category_id(repo: &impl Repository, owner: &OwnerId, short_id: &str) -> Result<Uuid> {
    if let Ok(id) = short_id.parse::<Uuid>() {
        return Ok(id);
    }
    check_prefix(short_id)?;

    let prefix = short_id.trim().to_lowercase();
    let categories = repo.list_categories(owner).await?;
    pick_unique(
        "category",
        short_id,
        categories
            .into_iter()
            .filter(|c| c.id.to_string().starts_with(&prefix))
            .map(|c| (c.id, c.name))
            .collect(),
    )
}

pub async fn resolve_optional_category(
    repo: &impl Repository,
    owner: &OwnerId,
    short_id: Option<&str>,
) -> Result<Option<Uuid>> {
    match short_id {
        Some(short_id) => Ok(Some(resolve_category_id(repo, owner, short_id).await?)),
        None => Ok(None),
    }
}

/// First seven characters of an id, as shown in tables.
pub fn short_id(id: &Uuid) -> String {
    id.to_string()[..7].to_string()
}
