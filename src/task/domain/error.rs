//! Error types for task domain validation.

use super::TaskId;
use thiserror::Error;

/// Errors returned while constructing or mutating domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The task description is empty after trimming.
    #[error("task description must not be empty")]
    EmptyDescription,

    /// A reward was recorded for a task that is not completed.
    #[error("task {0} must be completed before it can be rewarded")]
    RewardBeforeCompletion(TaskId),

    /// The task has already earned its reward.
    #[error("task {0} has already been rewarded")]
    AlreadyRewarded(TaskId),
}
