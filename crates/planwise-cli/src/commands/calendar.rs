use anyhow::Result;
use chrono::Utc;
use chrono_tz::Tz;
use planwise_core::calendar;
use planwise_core::models::OwnerId;
use planwise_core::repository::Repository;

/// Prints the owner's dated tasks as a JSON array of calendar events.
pub async fn print_calendar(repo: &impl Repository, owner: &OwnerId, tz: Tz) -> Result<()> {
    let today = Utc::now().with_timezone(&tz).date_naive();
    let events = repo.calendar_events(owner, tz, today).await?;
    println!("{}", calendar::to_json(&events)?);
    Ok(())
}
