use std::path::PathBuf;

use clap::{ArgGroup, Args, Parser, Subcommand};

use crate::model::task::TaskId;

#[derive(Parser)]
#[command(name = "jot", about = concat!("[x] jot v", env!("CARGO_PKG_VERSION"), " - a small task list"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Use a different data directory
    #[arg(short = 'd', long = "data-dir", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Write debug output to the log file
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a task
    Add(AddArgs),
    /// List tasks, newest first
    List(ListArgs),
    /// Mark tasks as done
    Check(IdsArgs),
    /// Mark tasks as not done
    Uncheck(IdsArgs),
    /// Delete a task
    Rm(RmArgs),
    /// Drop selection entries that no longer match a task
    Clean,
    /// View or prune the recovery log
    Recovery(RecoveryArgs),
    /// Print the data directory
    Path,
}

#[derive(Args)]
pub struct AddArgs {
    /// Task title (words are joined with spaces)
    #[arg(required = true, num_args = 1..)]
    pub title: Vec<String>,
}

#[derive(Args)]
#[command(group(ArgGroup::new("filter").args(["done", "open"])))]
pub struct ListArgs {
    /// Only tasks that are done
    #[arg(long)]
    pub done: bool,
    /// Only tasks that are not done
    #[arg(long)]
    pub open: bool,
}

#[derive(Args)]
pub struct IdsArgs {
    /// Task IDs
    #[arg(required = true)]
    pub ids: Vec<TaskId>,
}

#[derive(Args)]
pub struct RmArgs {
    /// Task ID to delete
    pub id: TaskId,
    /// Skip confirmation prompt
    #[arg(long)]
    pub yes: bool,
}

#[derive(Args)]
pub struct RecoveryArgs {
    /// Remove entries older than 30 days
    #[arg(long)]
    pub prune: bool,
}
