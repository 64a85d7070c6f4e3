//! Domain model for quests (tasks) and their completion lifecycle.
//!
//! A task earns XP the first time it is completed. Completion can be
//! toggled freely afterwards; the reward flag is append-only, so XP is
//! granted exactly once per task lifetime.

mod error;
mod ids;
mod stats;
mod task;

pub use crate::progression::domain::{Difficulty, Priority};
pub use error::TaskDomainError;
pub use ids::{TaskDescription, TaskId, TaskTitle};
pub use stats::TaskStats;
pub use task::{
    CompletionToggle, NewTask, PersistedTaskData, Task, TaskChanges, TaskRewardState,
};
