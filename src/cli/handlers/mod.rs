mod recovery;
pub use recovery::cmd_recovery;

use std::io::{self, BufRead, Write};
use std::path::Path;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::storage::{DirStore, KvStore, StorageError};
use crate::model::config::Config;
use crate::model::task::TaskId;
use crate::ops::store::{StoreOptions, TaskStore};

/// The store every command works against
pub type Store = TaskStore<Box<dyn KvStore>>;

/// Open the on-disk task store in `data_dir`
pub fn open_store(data_dir: &Path, config: &Config) -> Result<Store, StorageError> {
    let storage = DirStore::open(data_dir)?;
    tracing::debug!(dir = %data_dir.display(), "opened store");
    Ok(TaskStore::open(
        Box::new(storage) as Box<dyn KvStore>,
        StoreOptions::from(&config.store),
    ))
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(
    cli: Cli,
    data_dir: &Path,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;

    match cli.command {
        None => {
            let store = open_store(data_dir, config)?;
            crate::tui::run(store, config)
        }
        Some(Commands::Path) => {
            println!("{}", data_dir.display());
            Ok(())
        }
        Some(Commands::Recovery(args)) => cmd_recovery(args, data_dir, json),
        Some(Commands::Add(args)) => cmd_add(&mut open_store(data_dir, config)?, args, json),
        Some(Commands::List(args)) => cmd_list(&open_store(data_dir, config)?, args, json),
        Some(Commands::Check(args)) => {
            cmd_check(&mut open_store(data_dir, config)?, args.ids, true)
        }
        Some(Commands::Uncheck(args)) => {
            cmd_check(&mut open_store(data_dir, config)?, args.ids, false)
        }
        Some(Commands::Rm(args)) => {
            let mut store = open_store(data_dir, config)?;
            cmd_rm(&mut store, args, &mut io::stdin().lock())
        }
        Some(Commands::Clean) => cmd_clean(&mut open_store(data_dir, config)?, json),
    }
}

/// Turn a save failure recorded by the store into a command error
fn ensure_saved(store: &mut Store) -> Result<(), Box<dyn std::error::Error>> {
    match store.take_write_error() {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn cmd_add(store: &mut Store, args: AddArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let title = args.title.join(" ");
    let task = store.add_task(&title)?;
    ensure_saved(store)?;
    tracing::info!(id = task.id, "added task");

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&task_to_json(&task, false))?
        );
    } else {
        println!("{}", task.id);
    }
    Ok(())
}

fn cmd_list(store: &Store, args: ListArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let tasks: Vec<_> = store
        .tasks()
        .iter()
        .filter(|t| {
            let selected = store.is_selected(t.id);
            (!args.done || selected) && (!args.open || !selected)
        })
        .collect();

    if json {
        let out: Vec<TaskJson> = tasks
            .iter()
            .map(|t| task_to_json(t, store.is_selected(t.id)))
            .collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else if tasks.is_empty() {
        println!("no tasks");
    } else {
        for task in tasks {
            println!("{}", format_task_line(task, store.is_selected(task.id)));
        }
    }
    Ok(())
}

/// Add (`check`) or remove ids from the selection. Ids are not validated
/// against the task list.
fn cmd_check(
    store: &mut Store,
    ids: Vec<TaskId>,
    check: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut selected = store.selected().clone();
    for id in &ids {
        if check {
            selected.insert(*id);
        } else {
            selected.shift_remove(id);
        }
    }
    store.set_selected(selected);
    ensure_saved(store)?;

    for id in ids {
        if store.find(id).is_none() {
            eprintln!("warning: no task with id {}", id);
        }
    }
    Ok(())
}

fn cmd_rm(
    store: &mut Store,
    args: RmArgs,
    input: &mut impl BufRead,
) -> Result<(), Box<dyn std::error::Error>> {
    let Some(task) = store.find(args.id).cloned() else {
        return Err(format!("no task with id {}", args.id).into());
    };

    if !args.yes && !confirm(&task.title, input)? {
        println!("cancelled");
        return Ok(());
    }

    store.delete_task(task.id);
    ensure_saved(store)?;
    tracing::info!(id = task.id, "deleted task");
    println!("deleted \"{}\"", task.title);
    Ok(())
}

/// Ask `Delete "<title>"? [y/N]` and read one line of answer
fn confirm(title: &str, input: &mut impl BufRead) -> io::Result<bool> {
    eprint!("Delete \"{}\"? [y/N] ", title);
    io::stderr().flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    let answer = answer.trim();
    Ok(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
}

fn cmd_clean(store: &mut Store, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let removed = store.prune_stale_selection();
    ensure_saved(store)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&CleanJson { removed })?);
    } else {
        println!(
            "removed {} stale selection id{}",
            removed,
            if removed == 1 { "" } else { "s" }
        );
    }
    Ok(())
}
