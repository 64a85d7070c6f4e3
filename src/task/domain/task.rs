//! Task aggregate root and its completion/reward transitions.

use super::{Difficulty, Priority, TaskDescription, TaskDomainError, TaskId, TaskTitle};
use crate::identity::domain::OwnerId;
use crate::progression::domain::xp_for_task;
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Reward-relevant position of a task, derived from `(completed, rewarded)`.
///
/// `Open` is the initial state and is never re-entered. `AwaitingReward`
/// only exists between completing a task and recording its reward.
/// `Rewarded` and `Reopened` toggle into each other freely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskRewardState {
    /// Not completed, never rewarded.
    Open,
    /// Completed, reward not yet recorded.
    AwaitingReward,
    /// Completed and rewarded.
    Rewarded,
    /// Reopened after having been rewarded.
    Reopened,
}

impl TaskRewardState {
    /// Derives the state from the two stored flags.
    #[must_use]
    pub const fn from_flags(completed: bool, rewarded: bool) -> Self {
        match (completed, rewarded) {
            (false, false) => Self::Open,
            (true, false) => Self::AwaitingReward,
            (true, true) => Self::Rewarded,
            (false, true) => Self::Reopened,
        }
    }
}

/// Result of flipping a task's completion flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionToggle {
    /// The task became completed.
    Completed {
        /// `true` when this is the first completion and XP is owed.
        reward_due: bool,
    },
    /// The task became incomplete again.
    Reopened,
}

/// Validated fields for a task about to be created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    /// Owning user.
    pub owner_id: OwnerId,
    /// Title.
    pub title: TaskTitle,
    /// Description.
    pub description: TaskDescription,
    /// Priority, scaling the reward.
    pub priority: Priority,
    /// Difficulty, selecting the base reward.
    pub difficulty: Difficulty,
    /// Optional due date.
    pub due_date: Option<NaiveDate>,
}

/// Partial update applied through [`Task::apply_changes`].
///
/// `None` leaves a field unchanged. `due_date: Some(None)` clears the due
/// date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskChanges {
    /// Replacement title.
    pub title: Option<TaskTitle>,
    /// Replacement description.
    pub description: Option<TaskDescription>,
    /// Replacement priority.
    pub priority: Option<Priority>,
    /// Replacement difficulty.
    pub difficulty: Option<Difficulty>,
    /// Replacement or cleared due date.
    pub due_date: Option<Option<NaiveDate>>,
    /// Direct completion flag; never awards XP.
    pub completed: Option<bool>,
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    owner_id: OwnerId,
    title: TaskTitle,
    description: TaskDescription,
    priority: Priority,
    difficulty: Difficulty,
    completed: bool,
    rewarded: bool,
    due_date: Option<NaiveDate>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted owner.
    pub owner_id: OwnerId,
    /// Persisted title.
    pub title: TaskTitle,
    /// Persisted description.
    pub description: TaskDescription,
    /// Persisted priority.
    pub priority: Priority,
    /// Persisted difficulty.
    pub difficulty: Difficulty,
    /// Persisted completion flag.
    pub completed: bool,
    /// Persisted reward flag.
    pub rewarded: bool,
    /// Persisted due date.
    pub due_date: Option<NaiveDate>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest mutation timestamp.
    pub updated_at: DateTime<Utc>,
    /// Persisted completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Creates a new, open task.
    #[must_use]
    pub fn new(fields: NewTask, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: TaskId::new(),
            owner_id: fields.owner_id,
            title: fields.title,
            description: fields.description,
            priority: fields.priority,
            difficulty: fields.difficulty,
            completed: false,
            rewarded: false,
            due_date: fields.due_date,
            created_at: timestamp,
            updated_at: timestamp,
            completed_at: None,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            owner_id: data.owner_id,
            title: data.title,
            description: data.description,
            priority: data.priority,
            difficulty: data.difficulty,
            completed: data.completed,
            rewarded: data.rewarded,
            due_date: data.due_date,
            created_at: data.created_at,
            updated_at: data.updated_at,
            completed_at: data.completed_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning user.
    #[must_use]
    pub const fn owner_id(&self) -> &OwnerId {
        &self.owner_id
    }

    /// Returns the title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub const fn description(&self) -> &TaskDescription {
        &self.description
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Returns the difficulty.
    #[must_use]
    pub const fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Returns whether the task is completed.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.completed
    }

    /// Returns whether the task has earned its XP.
    #[must_use]
    pub const fn is_rewarded(&self) -> bool {
        self.rewarded
    }

    /// Returns the due date, if any.
    #[must_use]
    pub const fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest mutation timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns when the task was last completed, while it is completed.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Returns the reward-relevant state.
    #[must_use]
    pub const fn reward_state(&self) -> TaskRewardState {
        TaskRewardState::from_flags(self.completed, self.rewarded)
    }

    /// Returns the XP this task is worth on first completion.
    #[must_use]
    pub const fn xp_reward(&self) -> u32 {
        xp_for_task(self.difficulty, self.priority)
    }

    /// Merges a partial update.
    ///
    /// Changing `completed` here maintains `completed_at` but leaves
    /// `rewarded` alone; only [`Task::toggle_completion`] participates in the
    /// reward protocol.
    pub fn apply_changes(&mut self, changes: TaskChanges, clock: &impl Clock) {
        let TaskChanges {
            title,
            description,
            priority,
            difficulty,
            due_date,
            completed,
        } = changes;

        if let Some(value) = title {
            self.title = value;
        }
        if let Some(value) = description {
            self.description = value;
        }
        if let Some(value) = priority {
            self.priority = value;
        }
        if let Some(value) = difficulty {
            self.difficulty = value;
        }
        if let Some(value) = due_date {
            self.due_date = value;
        }
        let now = self.touch(clock);
        if let Some(value) = completed {
            self.set_completed(value, now);
        }
    }

    /// Flips the completion flag.
    ///
    /// Reports whether XP is owed: only a transition into `completed` on a
    /// task that has never been rewarded owes XP.
    pub fn toggle_completion(&mut self, clock: &impl Clock) -> CompletionToggle {
        let now = self.touch(clock);
        let completing = !self.completed;
        self.set_completed(completing, now);
        if completing {
            CompletionToggle::Completed {
                reward_due: !self.rewarded,
            }
        } else {
            CompletionToggle::Reopened
        }
    }

    /// Records that the completion reward has been granted.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::RewardBeforeCompletion`] when the task is
    /// not completed, or [`TaskDomainError::AlreadyRewarded`] when the reward
    /// was recorded earlier.
    pub fn mark_rewarded(&mut self, clock: &impl Clock) -> Result<(), TaskDomainError> {
        if !self.completed {
            return Err(TaskDomainError::RewardBeforeCompletion(self.id));
        }
        if self.rewarded {
            return Err(TaskDomainError::AlreadyRewarded(self.id));
        }
        self.rewarded = true;
        self.touch(clock);
        Ok(())
    }

    fn set_completed(&mut self, completed: bool, now: DateTime<Utc>) {
        if completed == self.completed {
            return;
        }
        self.completed = completed;
        self.completed_at = completed.then_some(now);
    }

    /// Bumps `updated_at` without letting it move backwards.
    fn touch(&mut self, clock: &impl Clock) -> DateTime<Utc> {
        self.updated_at = self.updated_at.max(clock.utc());
        self.updated_at
    }
}
