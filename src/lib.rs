pub mod cli;
pub mod errors;
pub mod models;
pub mod paths;
pub mod workspace;

pub use errors::{AppError, AppResult};
pub use models::{FeedbackItem, SubTaskItem, TaskFilter, TaskItem};
