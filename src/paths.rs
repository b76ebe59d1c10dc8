use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};

/// Marker filenames. A marker's existence is the sole source of truth for
/// the corresponding flag; its creation timestamp is when the flag was set.
pub const DESCRIPTION_FILE: &str = "description.txt";
pub const DONE_FILE: &str = "done.txt";
pub const PLANNED_FILE: &str = "planned.txt";
pub const DELETED_FILE: &str = "deleted.txt";

const WEEKLY_DIR: &str = "Weekly";
const FEEDBACK_DIR: &str = "Feedback";

pub fn week_dir(root: &Path, week: u32) -> PathBuf {
    root.join(WEEKLY_DIR).join(week.to_string())
}

pub fn task_dir(root: &Path, week: u32, task_id: u32) -> PathBuf {
    week_dir(root, week).join(task_id.to_string())
}

pub fn subtask_dir(root: &Path, week: u32, task_id: u32, sub_id: u32) -> PathBuf {
    task_dir(root, week, task_id).join(sub_id.to_string())
}

pub fn feedback_root(root: &Path) -> PathBuf {
    root.join(FEEDBACK_DIR)
}

pub fn feedback_dir(root: &Path, feedback_id: u32) -> PathBuf {
    feedback_root(root).join(feedback_id.to_string())
}

/// Create the directory (and any missing parents) if absent. Idempotent;
/// pre-existence is not an error.
pub fn ensure_dir(path: &Path) -> AppResult<()> {
    if !path.exists() {
        fs::create_dir_all(path).map_err(|error| AppError::Io(error.to_string()))?;
    }
    Ok(())
}

/// Write a marker file inside `dir`. No overwrite protection: writing an
/// existing marker silently succeeds, and whether the filesystem keeps the
/// original creation timestamp is unspecified. Callers that need a stable
/// timestamp must check existence first.
pub fn write_marker(dir: &Path, name: &str, content: &str) -> AppResult<()> {
    fs::write(dir.join(name), content).map_err(|error| AppError::Io(error.to_string()))
}

pub fn marker_exists(dir: &Path, name: &str) -> bool {
    dir.join(name).exists()
}

/// Creation timestamp of a marker, or `None` when the marker is absent.
/// Falls back to mtime on filesystems without a birth time; markers are
/// write-once, so the two coincide.
pub fn marker_timestamp(dir: &Path, name: &str) -> AppResult<Option<DateTime<Utc>>> {
    let path = dir.join(name);
    if !path.exists() {
        return Ok(None);
    }
    let metadata = fs::metadata(&path).map_err(|error| AppError::Io(error.to_string()))?;
    let instant = metadata
        .created()
        .or_else(|_| metadata.modified())
        .map_err(|error| AppError::Io(error.to_string()))?;
    Ok(Some(DateTime::<Utc>::from(instant)))
}

/// Parse an entity directory's own name as its id. Non-numeric names are
/// structural corruption, never skipped.
pub fn entity_id(dir: &Path) -> AppResult<u32> {
    let name = dir
        .file_name()
        .and_then(|value| value.to_str())
        .ok_or_else(|| {
            AppError::Corrupt(format!(
                "entity directory has no readable name: {}",
                dir.to_string_lossy()
            ))
        })?;
    parse_id(name, dir)
}

fn parse_id(name: &str, scope: &Path) -> AppResult<u32> {
    match name.parse::<u32>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(AppError::Corrupt(format!(
            "directory name '{}' under {} is not a positive integer id",
            name,
            scope.to_string_lossy()
        ))),
    }
}

/// Immediate subdirectories of a scope, in directory-enumeration order.
/// Plain files (markers live alongside sub-task directories) are skipped.
pub fn entity_dirs(scope: &Path) -> AppResult<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    if !scope.exists() {
        return Ok(dirs);
    }
    for entry in fs::read_dir(scope).map_err(|error| AppError::Io(error.to_string()))? {
        let entry = entry.map_err(|error| AppError::Io(error.to_string()))?;
        let path = entry.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    Ok(dirs)
}

/// Next unused id within a scope: `max + 1` over the immediate subdirectory
/// names, or `1` for an empty or absent scope. Any non-numeric subdirectory
/// name fails fast as corruption. Not safe under concurrent callers; see the
/// workspace module docs.
pub fn next_id(scope: &Path) -> AppResult<u32> {
    let mut max = 0;
    for dir in entity_dirs(scope)? {
        let id = entity_id(&dir)?;
        max = max.max(id);
    }
    Ok(max + 1)
}
