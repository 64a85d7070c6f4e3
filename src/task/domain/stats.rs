//! Read-only completion statistics over a task list.

use super::Task;
use serde::Serialize;

/// Counts of total, completed, and pending tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TaskStats {
    /// Number of tasks.
    pub total: usize,
    /// Number of completed tasks.
    pub completed: usize,
    /// Number of tasks not yet completed.
    pub pending: usize,
    /// `round(100 * completed / total)`, halves up; 0 for an empty list.
    pub completion_rate: u8,
}

impl TaskStats {
    /// Computes statistics for `tasks`.
    #[must_use]
    pub fn from_tasks<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        let (total, completed) = tasks.into_iter().fold((0_usize, 0_usize), |(all, done), task| {
            (all + 1, done + usize::from(task.is_completed()))
        });
        Self {
            total,
            completed,
            pending: total - completed,
            completion_rate: completion_rate(completed, total),
        }
    }
}

#[expect(
    clippy::integer_division,
    reason = "adding half the divisor before truncating implements round-half-up exactly"
)]
fn completion_rate(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let done = completed as u128;
    let all = total as u128;
    let rounded = (200 * done + all) / (2 * all);
    u8::try_from(rounded).unwrap_or(100)
}
