use clap::{Args, Parser, Subcommand, ValueEnum};
use planwise_core::models::RecurrenceFrequency;

/// PlanWise: categorised tasks, subtasks and recurring series from the command line
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Act as this user (overrides the configured user)
    #[arg(short, long, global = true)]
    pub user: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Manage tasks
    Task(TaskCommand),
    /// Manage categories
    Category(CategoryCommand),
    /// Print the calendar feed as JSON
    Calendar,
}

#[derive(Parser, Debug, Clone)]
pub struct TaskCommand {
    #[command(subcommand)]
    pub command: TaskSubcommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum TaskSubcommand {
    /// Add a new task
    Add(AddCommand),
    /// Edit a task; editing a recurring task regenerates its whole series
    Edit(EditCommand),
    /// Add a subtask to an existing task
    Reply(ReplyCommand),
    /// Toggle a task between completed and pending
    Done(DoneCommand),
    /// Delete a task and its subtasks
    Delete(DeleteCommand),
    /// List tasks
    List(ListCommand),
    /// Show a task with its subtasks
    Show(ShowCommand),
    /// Show task counts
    Summary(SummaryCommand),
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
}

impl From<Frequency> for RecurrenceFrequency {
    fn from(frequency: Frequency) -> Self {
        match frequency {
            Frequency::Daily => RecurrenceFrequency::Daily,
            Frequency::Weekly => RecurrenceFrequency::Weekly,
            Frequency::Monthly => RecurrenceFrequency::Monthly,
        }
    }
}

/// Fields shared by every command that submits a task.
#[derive(Args, Debug, Clone)]
pub struct TaskFields {
    /// The description of the task
    #[arg(short, long)]
    pub description: Option<String>,
    /// The due date of the task (YYYY-MM-DD or e.g. "next friday")
    #[arg(long)]
    pub due: Option<String>,
    /// The category of the task (ID or unique ID prefix)
    #[arg(short, long)]
    pub category: Option<String>,
    /// Repeat the task until --until
    #[arg(long, value_enum, requires = "until")]
    pub every: Option<Frequency>,
    /// Last possible date of a recurring task
    #[arg(long)]
    pub until: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct AddCommand {
    /// The title of the task
    pub title: String,
    #[command(flatten)]
    pub fields: TaskFields,
}

#[derive(Parser, Debug, Clone)]
pub struct ReplyCommand {
    /// The ID of the parent task
    pub parent: String,
    /// The title of the subtask
    pub title: String,
    #[command(flatten)]
    pub fields: TaskFields,
}

#[derive(Parser, Debug, Clone)]
pub struct EditCommand {
    /// The ID of the task to edit
    pub id: String,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub description: Option<String>,
    #[arg(long, conflicts_with = "description")]
    pub description_clear: bool,

    #[arg(long)]
    pub due: Option<String>,
    #[arg(long, conflicts_with = "due")]
    pub due_clear: bool,

    #[arg(long)]
    pub category: Option<String>,
    #[arg(long, conflicts_with = "category")]
    pub category_clear: bool,

    #[arg(long, value_enum)]
    pub every: Option<Frequency>,
    #[arg(long)]
    pub until: Option<String>,
    /// Turn a recurring task into a one-off task
    #[arg(long, conflicts_with_all = ["every", "until"])]
    pub recurrence_clear: bool,

    #[arg(long, conflicts_with = "pending")]
    pub completed: bool,
    #[arg(long)]
    pub pending: bool,

    /// Skip the confirmation before a series is regenerated
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct DoneCommand {
    /// The ID of the task to toggle
    pub id: String,
}

#[derive(Parser, Debug, Clone)]
pub struct DeleteCommand {
    /// The ID of the task to delete
    pub id: String,
    /// Force deletion without confirmation
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct ListCommand {
    /// Only tasks whose title or description contains this text
    #[arg(short, long)]
    pub search: Option<String>,
    /// Only tasks in this category
    #[arg(short, long)]
    pub category: Option<String>,
    /// Include subtasks
    #[arg(short, long)]
    pub all: bool,
    /// Only tasks that are not completed
    #[arg(short, long)]
    pub pending: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct ShowCommand {
    /// The ID of the task to show
    pub id: String,
}

#[derive(Parser, Debug, Clone)]
pub struct SummaryCommand {
    #[arg(short, long)]
    pub search: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct CategoryCommand {
    #[command(subcommand)]
    pub command: CategorySubcommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum CategorySubcommand {
    /// Add a new category
    Add(AddCategoryCommand),
    /// Rename a category
    Rename(RenameCategoryCommand),
    /// Delete a category that no task uses
    Delete(DeleteCategoryCommand),
    /// List categories
    List,
    /// List the tasks of a category
    Tasks(CategoryTasksCommand),
}

#[derive(Parser, Debug, Clone)]
pub struct AddCategoryCommand {
    /// The name of the category
    pub name: String,
}

#[derive(Parser, Debug, Clone)]
pub struct RenameCategoryCommand {
    /// The ID of the category to rename
    pub id: String,
    /// The new name
    pub name: String,
}

#[derive(Parser, Debug, Clone)]
pub struct DeleteCategoryCommand {
    /// The ID of the category to delete
    pub id: String,
    /// Force deletion without confirmation
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CategoryTasksCommand {
    /// The ID of the category
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_every_requires_until() {
        let result = Cli::try_parse_from(["planwise", "task", "add", "Gym", "--every", "weekly"]);
        assert!(result.is_err());

        let cli = Cli::try_parse_from([
            "planwise", "task", "add", "Gym", "--due", "2024-01-01", "--every", "weekly", "--until", "2024-02-01",
        ])
        .unwrap();
        match cli.command {
            Commands::Task(TaskCommand { command: TaskSubcommand::Add(add) }) => {
                assert_eq!(add.fields.every, Some(Frequency::Weekly));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_user_flag_is_global() {
        let cli = Cli::try_parse_from(["planwise", "category", "list", "--user", "bob"]).unwrap();
        assert_eq!(cli.user.as_deref(), Some("bob"));
    }
}
