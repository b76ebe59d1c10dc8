use clap::Parser;
use std::path::Path;
use std::sync::OnceLock;
use tracing_appender::non_blocking::WorkerGuard;

use weekdesk::cli::{
    join_description, Cli, Commands, FeedbackCommand, SubCommand, TaskCommand,
};
use weekdesk::errors::AppResult;
use weekdesk::models::{FeedbackItem, TaskFilter, TaskItem};
use weekdesk::workspace;

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

fn main() {
    let cli = Cli::parse();
    if let Err(error) = run(cli) {
        eprintln!("{error}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> AppResult<()> {
    init_tracing(&cli.root)?;
    let root = cli.root.as_path();

    match cli.command {
        Commands::Task(command) => match command {
            TaskCommand::List { week, filter } => {
                let week = week.resolve();
                let mut tasks = workspace::tasks_list(root, week, &filter.to_filter())?;
                tasks.sort_by_key(|task| task.id);
                if cli.json {
                    print_json(&tasks)?;
                } else if tasks.is_empty() {
                    println!("no tasks in week {week}");
                } else {
                    for task in &tasks {
                        print_task(task);
                    }
                }
            }
            TaskCommand::Add {
                week,
                planned,
                description,
            } => {
                let task = workspace::task_create(
                    root,
                    week.resolve(),
                    &join_description(&description),
                    planned,
                )?;
                if cli.json {
                    print_json(&task)?;
                } else {
                    println!("added task {}", task.id);
                }
            }
            TaskCommand::Show { week, id } => {
                let task = workspace::task_get(root, week.resolve(), id)?;
                if cli.json {
                    print_json(&task)?;
                } else {
                    print_task(&task);
                }
            }
            TaskCommand::Done { week, id } => {
                let task = workspace::task_mark_done(root, week.resolve(), id)?;
                if cli.json {
                    print_json(&task)?;
                } else {
                    println!("task {} done", task.id);
                }
            }
            TaskCommand::Rm { week, id } => {
                workspace::task_delete(root, week.resolve(), id)?;
                if !cli.json {
                    println!("task {id} deleted");
                }
            }
        },
        Commands::Sub(command) => match command {
            SubCommand::Add {
                week,
                task_id,
                description,
            } => {
                let sub = workspace::subtask_create(
                    root,
                    week.resolve(),
                    task_id,
                    &join_description(&description),
                )?;
                if cli.json {
                    print_json(&sub)?;
                } else {
                    println!("added sub-task {} under task {task_id}", sub.id);
                }
            }
            SubCommand::Done { week, task_id, id } => {
                let sub = workspace::subtask_mark_done(root, week.resolve(), task_id, id)?;
                if cli.json {
                    print_json(&sub)?;
                } else {
                    println!("sub-task {} done", sub.id);
                }
            }
            SubCommand::Rm { week, task_id, id } => {
                workspace::subtask_delete(root, week.resolve(), task_id, id)?;
                if !cli.json {
                    println!("sub-task {id} deleted");
                }
            }
        },
        Commands::Feedback(command) => match command {
            FeedbackCommand::List { deleted, all } => {
                let filter = TaskFilter {
                    done: None,
                    planned: None,
                    deleted: if deleted {
                        Some(true)
                    } else if all {
                        None
                    } else {
                        Some(false)
                    },
                };
                let mut items = workspace::feedback_list(root, &filter)?;
                items.sort_by_key(|item| item.id);
                if cli.json {
                    print_json(&items)?;
                } else if items.is_empty() {
                    println!("no feedback");
                } else {
                    for item in &items {
                        print_feedback(item);
                    }
                }
            }
            FeedbackCommand::Add { description } => {
                let item = workspace::feedback_create(root, &join_description(&description))?;
                if cli.json {
                    print_json(&item)?;
                } else {
                    println!("added feedback {}", item.id);
                }
            }
            FeedbackCommand::Rm { id } => {
                workspace::feedback_delete(root, id)?;
                if !cli.json {
                    println!("feedback {id} deleted");
                }
            }
        },
    }

    Ok(())
}

fn init_tracing(root: &Path) -> AppResult<()> {
    let log_dir = root.join("logs");
    std::fs::create_dir_all(&log_dir)?;
    let file_appender = tracing_appender::rolling::daily(log_dir, "weekdesk.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    let _ = LOG_GUARD.set(guard);

    // A second init (tests, embedding) is not an error worth dying over.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .json()
        .with_writer(non_blocking)
        .try_init();
    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> AppResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_task(task: &TaskItem) {
    println!(
        "{:>3} [{}] {}{}{}",
        task.id,
        if task.is_done { "x" } else { " " },
        task.description,
        if task.is_planned { "  (planned)" } else { "" },
        if task.is_deleted { "  (deleted)" } else { "" },
    );
    let mut subs = task.sub_tasks.clone();
    subs.sort_by_key(|sub| sub.id);
    for sub in &subs {
        println!(
            "      {:>3} [{}] {}{}",
            sub.id,
            if sub.is_done { "x" } else { " " },
            sub.description,
            if sub.is_deleted { "  (deleted)" } else { "" },
        );
    }
}

fn print_feedback(item: &FeedbackItem) {
    println!(
        "{:>3} {}{}",
        item.id,
        item.description,
        if item.is_deleted { "  (deleted)" } else { "" },
    );
}
