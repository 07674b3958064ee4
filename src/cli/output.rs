use serde::Serialize;

use crate::model::task::{Task, TaskId};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TaskJson {
    pub id: TaskId,
    pub title: String,
    pub completed: bool,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    pub selected: bool,
}

#[derive(Serialize)]
pub struct CleanJson {
    pub removed: usize,
}

pub fn task_to_json(task: &Task, selected: bool) -> TaskJson {
    TaskJson {
        id: task.id,
        title: task.title.clone(),
        completed: task.completed,
        created_at: task.created_at.clone(),
        selected,
    }
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

/// One list line: `[x] <id>  <title>  (<createdAt>)`
pub fn format_task_line(task: &Task, selected: bool) -> String {
    let marker = if selected { "[x]" } else { "[ ]" };
    format!("{} {}  {}  ({})", marker, task.id, task.title, task.created_at)
}
