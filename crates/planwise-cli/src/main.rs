use clap::Parser;
use owo_colors::{OwoColorize, Style};
use planwise_core::db;
use planwise_core::error::CoreError;
use planwise_core::models::OwnerId;
use planwise_core::repository::SqliteRepository;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod config;
mod parser;
mod util;
mod views;

use cli::{Commands, TaskSubcommand};

#[tokio::main]
async fn main() {
    // Logs go to stderr; stdout carries tables and the calendar JSON.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = cli::Cli::parse();
    let config = config::Config::new().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "invalid configuration, using defaults");
        config::Config::default()
    });

    if let Err(e) = run(cli, config).await {
        handle_error(e);
        std::process::exit(1);
    }
}

async fn run(cli: cli::Cli, config: config::Config) -> anyhow::Result<()> {
    let owner = match cli.user.or_else(|| config.user.clone()) {
        Some(user) if !user.trim().is_empty() => OwnerId::new(user.trim()),
        _ => {
            return Err(CoreError::Validation(
                "No user configured. Pass --user or set PLANWISE_USER.".to_string(),
            )
            .into())
        }
    };

    let db_pool = db::establish_connection(&config.database_path).await?;
    let repository = SqliteRepository::new(db_pool);

    match cli.command {
        Commands::Task(task) => match task.command {
            TaskSubcommand::Add(command) => commands::add::add_task(&repository, &owner, command).await,
            TaskSubcommand::Reply(command) => commands::add::reply_task(&repository, &owner, command).await,
            TaskSubcommand::Edit(command) => commands::edit::edit_task(&repository, &owner, command).await,
            TaskSubcommand::Done(command) => commands::done::toggle_task(&repository, &owner, command).await,
            TaskSubcommand::Delete(command) => {
                commands::delete::delete_task(&repository, &owner, command).await
            }
            TaskSubcommand::List(command) => commands::list::list_tasks(&repository, &owner, command).await,
            TaskSubcommand::Show(command) => commands::list::show_task(&repository, &owner, command).await,
            TaskSubcommand::Summary(command) => {
                commands::list::summarize_tasks(&repository, &owner, command, config.tz()).await
            }
        },
        Commands::Category(command) => {
            commands::category::category_command(&repository, &owner, command).await
        }
        Commands::Calendar => commands::calendar::print_calendar(&repository, &owner, config.tz()).await,
    }
}

fn handle_error(err: anyhow::Error) {
    let error_style = Style::new().red().bold();

    if let Some(core_error) = err.downcast_ref::<CoreError>() {
        match core_error {
            CoreError::NotFound(s) => {
                eprintln!("{} {}", "Error:".style(error_style), s);
            }
            CoreError::BlockedByIncompleteChildren(s) => {
                eprintln!(
                    "{} Blocked by incomplete subtasks: {}",
                    "Error:".style(error_style),
                    s.yellow()
                );
            }
            CoreError::CategoryInUse(s) => {
                eprintln!(
                    "{} Cannot delete category {}",
                    "Error:".style(error_style),
                    s.yellow()
                );
            }
            CoreError::AmbiguousId(candidates) => {
                eprintln!("{}", "Error: Ambiguous ID.".style(error_style));
                eprintln!("Did you mean one of these?");
                for (id, label) in candidates {
                    eprintln!("  {} ({})", id.yellow(), label);
                }
            }
            CoreError::InvalidFrequency(s) => {
                eprintln!("{} Invalid recurrence frequency: {}", "Error:".style(error_style), s);
            }
            CoreError::Validation(s) => {
                eprintln!("{} Invalid input: {}", "Error:".style(error_style), s);
            }
            CoreError::Database(e) => {
                eprintln!("{} Database error: {}", "Error:".style(error_style), e);
            }
            _ => eprintln!("{} {}", "Error:".style(error_style), err),
        }
    } else {
        eprintln!("{} {:#}", "Error:".style(error_style), err);
    }
}
