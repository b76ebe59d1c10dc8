use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::models::TaskFilter;

#[derive(Parser, Debug)]
#[command(name = "weekdesk")]
#[command(version)]
#[command(about = "Track weekly tasks and feedback in plain directories")]
pub struct Cli {
    /// Storage root directory
    #[arg(long, env = "WEEKDESK_ROOT", default_value = "./weekdesk", global = true)]
    pub root: PathBuf,

    /// Emit JSON instead of human-readable rows
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage weekly tasks
    #[command(subcommand)]
    Task(TaskCommand),

    /// Manage sub-tasks of one task
    #[command(subcommand)]
    Sub(SubCommand),

    /// Manage feedback entries
    #[command(subcommand)]
    Feedback(FeedbackCommand),
}

#[derive(Subcommand, Debug)]
pub enum TaskCommand {
    /// List the tasks of a week
    List {
        #[command(flatten)]
        week: WeekArg,
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Add a task
    Add {
        #[command(flatten)]
        week: WeekArg,
        /// Mark the task as planned for the week
        #[arg(long)]
        planned: bool,
        /// Task description
        #[arg(required = true, num_args = 1..)]
        description: Vec<String>,
    },
    /// Show one task with all of its sub-tasks
    Show {
        #[command(flatten)]
        week: WeekArg,
        id: u32,
    },
    /// Mark a task done
    Done {
        #[command(flatten)]
        week: WeekArg,
        id: u32,
    },
    /// Delete a task (a marker; the entry stays on disk)
    Rm {
        #[command(flatten)]
        week: WeekArg,
        id: u32,
    },
}

#[derive(Subcommand, Debug)]
pub enum SubCommand {
    /// Add a sub-task under a task
    Add {
        #[command(flatten)]
        week: WeekArg,
        /// Parent task id
        #[arg(long = "task")]
        task_id: u32,
        /// Sub-task description
        #[arg(required = true, num_args = 1..)]
        description: Vec<String>,
    },
    /// Mark a sub-task done
    Done {
        #[command(flatten)]
        week: WeekArg,
        /// Parent task id
        #[arg(long = "task")]
        task_id: u32,
        id: u32,
    },
    /// Delete a sub-task (a marker; the entry stays on disk)
    Rm {
        #[command(flatten)]
        week: WeekArg,
        /// Parent task id
        #[arg(long = "task")]
        task_id: u32,
        id: u32,
    },
}

#[derive(Subcommand, Debug)]
pub enum FeedbackCommand {
    /// List feedback entries
    List {
        /// Show only deleted entries
        #[arg(long, conflicts_with = "all")]
        deleted: bool,
        /// Include deleted entries as well
        #[arg(long)]
        all: bool,
    },
    /// Add a feedback entry
    Add {
        /// Feedback text
        #[arg(required = true, num_args = 1..)]
        description: Vec<String>,
    },
    /// Delete a feedback entry (a marker; the entry stays on disk)
    Rm { id: u32 },
}

#[derive(Args, Debug)]
pub struct WeekArg {
    /// Week number; defaults to the current ISO week
    #[arg(long)]
    pub week: Option<u32>,
}

impl WeekArg {
    pub fn resolve(&self) -> u32 {
        use chrono::{Datelike, Utc};
        self.week.unwrap_or_else(|| Utc::now().iso_week().week())
    }
}

/// Flag pairs mapping onto the filter's tri-state dimensions: naming one
/// side constrains the dimension, naming neither leaves it open. Deleted
/// entries are excluded unless asked for.
#[derive(Args, Debug)]
pub struct FilterArgs {
    /// Only tasks already done
    #[arg(long, conflicts_with = "open")]
    pub done: bool,
    /// Only tasks not yet done
    #[arg(long)]
    pub open: bool,
    /// Only planned tasks
    #[arg(long, conflicts_with = "unplanned")]
    pub planned: bool,
    /// Only unplanned tasks
    #[arg(long)]
    pub unplanned: bool,
    /// Only deleted tasks
    #[arg(long, conflicts_with = "all")]
    pub deleted: bool,
    /// Include deleted tasks as well
    #[arg(long)]
    pub all: bool,
}

impl FilterArgs {
    pub fn to_filter(&self) -> TaskFilter {
        let done = match (self.done, self.open) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };
        let planned = match (self.planned, self.unplanned) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };
        let deleted = if self.deleted {
            Some(true)
        } else if self.all {
            None
        } else {
            Some(false)
        };
        TaskFilter {
            done,
            planned,
            deleted,
        }
    }
}

pub fn join_description(words: &[String]) -> String {
    words.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn task_add_collects_description_words() {
        let cli = Cli::parse_from(["weekdesk", "task", "add", "--week", "12", "write", "report"]);
        match cli.command {
            Commands::Task(TaskCommand::Add {
                week,
                planned,
                description,
            }) => {
                assert_eq!(week.week, Some(12));
                assert!(!planned);
                assert_eq!(join_description(&description), "write report");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn task_list_default_filter_excludes_deleted_only() {
        let cli = Cli::parse_from(["weekdesk", "task", "list"]);
        match cli.command {
            Commands::Task(TaskCommand::List { filter, .. }) => {
                assert_eq!(filter.to_filter(), TaskFilter::include_default());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn task_list_flags_map_to_tristate_dimensions() {
        let cli = Cli::parse_from(["weekdesk", "task", "list", "--open", "--planned", "--all"]);
        match cli.command {
            Commands::Task(TaskCommand::List { filter, .. }) => {
                let filter = filter.to_filter();
                assert_eq!(filter.done, Some(false));
                assert_eq!(filter.planned, Some(true));
                assert_eq!(filter.deleted, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn conflicting_filter_flags_are_rejected() {
        assert!(Cli::try_parse_from(["weekdesk", "task", "list", "--done", "--open"]).is_err());
        assert!(Cli::try_parse_from(["weekdesk", "task", "list", "--deleted", "--all"]).is_err());
    }

    #[test]
    fn sub_add_requires_parent_task() {
        let cli = Cli::parse_from(["weekdesk", "sub", "add", "--task", "3", "nested", "step"]);
        match cli.command {
            Commands::Sub(SubCommand::Add {
                task_id,
                description,
                ..
            }) => {
                assert_eq!(task_id, 3);
                assert_eq!(join_description(&description), "nested step");
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert!(Cli::try_parse_from(["weekdesk", "sub", "add", "nested"]).is_err());
    }

    #[test]
    fn root_flag_is_global() {
        let cli = Cli::parse_from(["weekdesk", "feedback", "list", "--root", "/tmp/deskroot"]);
        assert_eq!(cli.root, PathBuf::from("/tmp/deskroot"));
    }
}
