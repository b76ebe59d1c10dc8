//! Repository operations over the on-disk tree.
//!
//! Layout: one directory per entity, named by its integer id, one file per
//! state marker. `Weekly/<week>/<task>/<sub-task>` for tasks and
//! `Feedback/<id>` for feedback. The filesystem is the database: there is no
//! index, no transaction log, and no locking. Two processes allocating ids
//! in the same scope, or writing the same marker, can race; the tool is
//! single-user and runs one operation per invocation, so this is accepted
//! rather than guarded against.
//!
//! Conversion from a directory to a typed entity is read-only and never
//! touches the tree. Lookups by id fail with `NOT_FOUND` instead of
//! fabricating an empty entity directory.

use crate::errors::{AppError, AppResult};
use crate::models::{FeedbackItem, SubTaskItem, TaskFilter, TaskItem};
use crate::paths::{
    self, DELETED_FILE, DESCRIPTION_FILE, DONE_FILE, PLANNED_FILE,
};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::Path;

// ── Tree-to-entity conversion ───────────────────────────────────────

/// Fields shared by every entity kind, read from one directory.
struct EntityCore {
    id: u32,
    description: String,
    created_at: DateTime<Utc>,
    is_done: bool,
    done_at: Option<DateTime<Utc>>,
    is_deleted: bool,
    deleted_at: Option<DateTime<Utc>>,
}

fn read_entity_core(dir: &Path) -> AppResult<EntityCore> {
    let id = paths::entity_id(dir)?;

    let description_path = dir.join(DESCRIPTION_FILE);
    if !description_path.exists() {
        return Err(AppError::Corrupt(format!(
            "entity directory {} has no {}",
            dir.to_string_lossy(),
            DESCRIPTION_FILE
        )));
    }
    let description =
        fs::read_to_string(&description_path).map_err(|error| AppError::Io(error.to_string()))?;

    let created_at = paths::marker_timestamp(dir, DESCRIPTION_FILE)?.ok_or_else(|| {
        AppError::Io(format!(
            "cannot stat {} in {}",
            DESCRIPTION_FILE,
            dir.to_string_lossy()
        ))
    })?;
    let done_at = paths::marker_timestamp(dir, DONE_FILE)?;
    let deleted_at = paths::marker_timestamp(dir, DELETED_FILE)?;

    Ok(EntityCore {
        id,
        description,
        created_at,
        is_done: done_at.is_some(),
        done_at,
        is_deleted: deleted_at.is_some(),
        deleted_at,
    })
}

/// Convert a task directory, recursing into numeric subdirectories for
/// sub-tasks. Sub-tasks are pruned by the same filter; a sub-task can drop
/// out independently of whether the parent survives its own filtering.
fn read_task(dir: &Path, filter: &TaskFilter) -> AppResult<TaskItem> {
    let core = read_entity_core(dir)?;
    let is_planned = paths::marker_exists(dir, PLANNED_FILE);

    let mut sub_tasks = Vec::new();
    for sub_dir in paths::entity_dirs(dir)? {
        let sub = read_subtask(&sub_dir)?;
        if include_subtask(&sub, filter) {
            sub_tasks.push(sub);
        }
    }

    Ok(TaskItem {
        id: core.id,
        description: core.description,
        created_at: core.created_at,
        is_done: core.is_done,
        done_at: core.done_at,
        is_planned,
        is_deleted: core.is_deleted,
        deleted_at: core.deleted_at,
        sub_tasks,
    })
}

fn read_subtask(dir: &Path) -> AppResult<SubTaskItem> {
    let core = read_entity_core(dir)?;
    Ok(SubTaskItem {
        id: core.id,
        description: core.description,
        created_at: core.created_at,
        is_done: core.is_done,
        done_at: core.done_at,
        is_deleted: core.is_deleted,
        deleted_at: core.deleted_at,
    })
}

fn read_feedback(dir: &Path) -> AppResult<FeedbackItem> {
    let core = read_entity_core(dir)?;
    Ok(FeedbackItem {
        id: core.id,
        description: core.description,
        created_at: core.created_at,
        is_deleted: core.is_deleted,
        deleted_at: core.deleted_at,
    })
}

// ── Filter engine ───────────────────────────────────────────────────

fn include_task(task: &TaskItem, filter: &TaskFilter) -> bool {
    if let Some(done) = filter.done {
        if task.is_done != done {
            return false;
        }
    }
    if let Some(planned) = filter.planned {
        if task.is_planned != planned {
            return false;
        }
    }
    if let Some(deleted) = filter.deleted {
        if task.is_deleted != deleted {
            return false;
        }
    }
    true
}

// Sub-tasks have no planned flag; that dimension never constrains them.
fn include_subtask(sub: &SubTaskItem, filter: &TaskFilter) -> bool {
    if let Some(done) = filter.done {
        if sub.is_done != done {
            return false;
        }
    }
    if let Some(deleted) = filter.deleted {
        if sub.is_deleted != deleted {
            return false;
        }
    }
    true
}

// Feedback exposes neither done nor planned; only deletion constrains it.
fn include_feedback(item: &FeedbackItem, filter: &TaskFilter) -> bool {
    if let Some(deleted) = filter.deleted {
        if item.is_deleted != deleted {
            return false;
        }
    }
    true
}

// ── Task repository ─────────────────────────────────────────────────

/// List the tasks of one week, converted and filtered. Directory-enumeration
/// order; callers that want a stable order must sort. An absent week yields
/// an empty list without creating anything.
pub fn tasks_list(root: &Path, week: u32, filter: &TaskFilter) -> AppResult<Vec<TaskItem>> {
    let mut tasks = Vec::new();
    for dir in paths::entity_dirs(&paths::week_dir(root, week))? {
        let task = read_task(&dir, filter)?;
        if include_task(&task, filter) {
            tasks.push(task);
        }
    }
    Ok(tasks)
}

/// Read-only lookup. Deleted tasks are still returned and report their
/// deletion; sub-tasks are not pruned.
pub fn task_get(root: &Path, week: u32, task_id: u32) -> AppResult<TaskItem> {
    let dir = paths::task_dir(root, week, task_id);
    if !dir.exists() {
        return Err(AppError::NotFound(format!(
            "no task {task_id} in week {week}"
        )));
    }
    read_task(&dir, &TaskFilter::unconstrained())
}

/// Allocate the next id in the week, write the description marker (and the
/// planned marker when requested), and return the freshly reconverted task
/// so `created_at` reflects actual filesystem time.
pub fn task_create(
    root: &Path,
    week: u32,
    description: &str,
    planned: bool,
) -> AppResult<TaskItem> {
    require_description(description)?;

    let week_dir = paths::week_dir(root, week);
    paths::ensure_dir(&week_dir)?;

    let task_id = paths::next_id(&week_dir)?;
    let dir = paths::task_dir(root, week, task_id);
    paths::ensure_dir(&dir)?;
    paths::write_marker(&dir, DESCRIPTION_FILE, description)?;
    if planned {
        paths::write_marker(&dir, PLANNED_FILE, "")?;
    }

    tracing::debug!(week, task_id, planned, "task created");
    read_task(&dir, &TaskFilter::unconstrained())
}

/// Write the done marker. No-op when already done: the existing marker and
/// its timestamp are left untouched.
pub fn task_mark_done(root: &Path, week: u32, task_id: u32) -> AppResult<TaskItem> {
    let dir = paths::task_dir(root, week, task_id);
    if !dir.exists() {
        return Err(AppError::NotFound(format!(
            "no task {task_id} in week {week}"
        )));
    }
    if !paths::marker_exists(&dir, DONE_FILE) {
        paths::write_marker(&dir, DONE_FILE, "")?;
        tracing::debug!(week, task_id, "task marked done");
    }
    read_task(&dir, &TaskFilter::unconstrained())
}

/// Deletion is one more marker, never directory removal. No-op when already
/// deleted.
pub fn task_delete(root: &Path, week: u32, task_id: u32) -> AppResult<()> {
    let dir = paths::task_dir(root, week, task_id);
    if !dir.exists() {
        return Err(AppError::NotFound(format!(
            "no task {task_id} in week {week}"
        )));
    }
    if !paths::marker_exists(&dir, DELETED_FILE) {
        paths::write_marker(&dir, DELETED_FILE, "")?;
        tracing::debug!(week, task_id, "task deleted");
    }
    Ok(())
}

pub fn next_task_id(root: &Path, week: u32) -> AppResult<u32> {
    paths::next_id(&paths::week_dir(root, week))
}

// ── Sub-task repository ─────────────────────────────────────────────

/// Create a sub-task under an existing task. Sub-task ids are scoped per
/// parent task, not per week.
pub fn subtask_create(
    root: &Path,
    week: u32,
    task_id: u32,
    description: &str,
) -> AppResult<SubTaskItem> {
    require_description(description)?;

    let parent = paths::task_dir(root, week, task_id);
    if !parent.exists() {
        return Err(AppError::NotFound(format!(
            "no task {task_id} in week {week}"
        )));
    }

    let sub_id = paths::next_id(&parent)?;
    let dir = paths::subtask_dir(root, week, task_id, sub_id);
    paths::ensure_dir(&dir)?;
    paths::write_marker(&dir, DESCRIPTION_FILE, description)?;

    tracing::debug!(week, task_id, sub_id, "sub-task created");
    read_subtask(&dir)
}

pub fn subtask_mark_done(
    root: &Path,
    week: u32,
    task_id: u32,
    sub_id: u32,
) -> AppResult<SubTaskItem> {
    let dir = paths::subtask_dir(root, week, task_id, sub_id);
    if !dir.exists() {
        return Err(AppError::NotFound(format!(
            "no sub-task {sub_id} under task {task_id} in week {week}"
        )));
    }
    if !paths::marker_exists(&dir, DONE_FILE) {
        paths::write_marker(&dir, DONE_FILE, "")?;
        tracing::debug!(week, task_id, sub_id, "sub-task marked done");
    }
    read_subtask(&dir)
}

pub fn subtask_delete(root: &Path, week: u32, task_id: u32, sub_id: u32) -> AppResult<()> {
    let dir = paths::subtask_dir(root, week, task_id, sub_id);
    if !dir.exists() {
        return Err(AppError::NotFound(format!(
            "no sub-task {sub_id} under task {task_id} in week {week}"
        )));
    }
    if !paths::marker_exists(&dir, DELETED_FILE) {
        paths::write_marker(&dir, DELETED_FILE, "")?;
        tracing::debug!(week, task_id, sub_id, "sub-task deleted");
    }
    Ok(())
}

// ── Feedback repository ─────────────────────────────────────────────

pub fn feedback_list(root: &Path, filter: &TaskFilter) -> AppResult<Vec<FeedbackItem>> {
    let mut items = Vec::new();
    for dir in paths::entity_dirs(&paths::feedback_root(root))? {
        let item = read_feedback(&dir)?;
        if include_feedback(&item, filter) {
            items.push(item);
        }
    }
    Ok(items)
}

pub fn feedback_get(root: &Path, feedback_id: u32) -> AppResult<FeedbackItem> {
    let dir = paths::feedback_dir(root, feedback_id);
    if !dir.exists() {
        return Err(AppError::NotFound(format!("no feedback {feedback_id}")));
    }
    read_feedback(&dir)
}

pub fn feedback_create(root: &Path, description: &str) -> AppResult<FeedbackItem> {
    require_description(description)?;

    let scope = paths::feedback_root(root);
    paths::ensure_dir(&scope)?;

    let feedback_id = paths::next_id(&scope)?;
    let dir = paths::feedback_dir(root, feedback_id);
    paths::ensure_dir(&dir)?;
    paths::write_marker(&dir, DESCRIPTION_FILE, description)?;

    tracing::debug!(feedback_id, "feedback created");
    read_feedback(&dir)
}

pub fn feedback_delete(root: &Path, feedback_id: u32) -> AppResult<()> {
    let dir = paths::feedback_dir(root, feedback_id);
    if !dir.exists() {
        return Err(AppError::NotFound(format!("no feedback {feedback_id}")));
    }
    if !paths::marker_exists(&dir, DELETED_FILE) {
        paths::write_marker(&dir, DELETED_FILE, "")?;
        tracing::debug!(feedback_id, "feedback deleted");
    }
    Ok(())
}

pub fn next_feedback_id(root: &Path) -> AppResult<u32> {
    paths::next_id(&paths::feedback_root(root))
}

fn require_description(description: &str) -> AppResult<()> {
    if description.trim().is_empty() {
        return Err(AppError::Invalid("description must not be blank".to_string()));
    }
    Ok(())
}
