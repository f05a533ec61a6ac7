//! # PlanWise Core Library
//!
//! Task management for many users over one SQLite database: categorised
//! tasks, subtasks that gate their parent's completion, and recurring tasks
//! expanded into dated series.
//!
//! ## Features
//!
//! - **Owner Scoping**: every operation takes the acting owner explicitly;
//!   other owners' rows are indistinguishable from missing ones
//! - **Recurring Series**: daily, weekly and monthly templates expanded into
//!   concrete tasks with calendar-aware month arithmetic
//! - **Completion Rules**: a task with open subtasks can be neither completed
//!   nor deleted
//! - **Protected Categories**: a category in use cannot be deleted
//! - **Atomic Writes**: each mutation, including a whole series, is one transaction
//!
//! ## Core Modules
//!
//! - [`db`]: Database connection and migration management
//! - [`models`]: Core data structures and submitted payloads
//! - [`repository`]: Data access and mutation rules with Repository pattern
//! - [`recurrence`]: Recurrence expansion
//! - [`calendar`]: Calendar feed for presentation layers
//! - [`timezone`]: Timezone utilities and validation
//! - [`error`]: Error kinds reported to callers
//! - [`query`]: Task listing filters
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use chrono::NaiveDate;
//! use planwise_core::{
//!     db, models::{OwnerId, TaskData}, repository::{SqliteRepository, TaskRepository},
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = db::establish_connection("tasks.db").await?;
//!     let repo = SqliteRepository::new(pool);
//!     let owner = OwnerId::new("alice");
//!
//!     let series = repo
//!         .create_task(&owner, TaskData {
//!             title: "Pay rent".to_string(),
//!             due_date: NaiveDate::from_ymd_opt(2024, 1, 31),
//!             is_recurring: true,
//!             recurrence_frequency: Some("monthly".to_string()),
//!             recurrence_end_date: NaiveDate::from_ymd_opt(2024, 4, 30),
//!             ..Default::default()
//!         })
//!         .await?;
//!     println!("Created {} instances", series.len());
//!
//!     Ok(())
//! }
//! ```

pub mod calendar;
pub mod db;
pub mod error;
pub mod models;
pub mod query;
pub mod recurrence;
pub mod repository;
pub mod timezone;
