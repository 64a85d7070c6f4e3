//! Task store: owner-scoped CRUD plus the completion reward protocol.

use crate::identity::domain::OwnerId;
use crate::locks::KeyedLocks;
use crate::progression::{
    ports::ProgressionRepository,
    services::{ProgressionService, ProgressionServiceError, XpAward},
};
use crate::task::{
    domain::{
        CompletionToggle, Difficulty, NewTask, Priority, Task, TaskChanges, TaskDescription,
        TaskDomainError, TaskId, TaskStats, TaskTitle,
    },
    ports::{TaskRepository, TaskRepositoryError},
};
use chrono::NaiveDate;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    title: String,
    description: String,
    priority: Priority,
    difficulty: Difficulty,
    due_date: Option<NaiveDate>,
}

impl CreateTaskRequest {
    /// Creates a request with medium priority and difficulty.
    #[must_use]
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            priority: Priority::Medium,
            difficulty: Difficulty::Medium,
            due_date: None,
        }
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the difficulty.
    #[must_use]
    pub const fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Sets the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }
}

/// Request payload for a partial task update.
///
/// Fields left unset keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateTaskRequest {
    title: Option<String>,
    description: Option<String>,
    priority: Option<Priority>,
    difficulty: Option<Difficulty>,
    due_date: Option<Option<NaiveDate>>,
    completed: Option<bool>,
}

impl UpdateTaskRequest {
    /// Creates an empty update.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Replaces the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Replaces the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Replaces the difficulty.
    #[must_use]
    pub const fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = Some(difficulty);
        self
    }

    /// Sets a due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(Some(due_date));
        self
    }

    /// Removes the due date.
    #[must_use]
    pub const fn clear_due_date(mut self) -> Self {
        self.due_date = Some(None);
        self
    }

    /// Sets the completion flag directly. This never awards XP.
    #[must_use]
    pub const fn with_completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    fn into_changes(self) -> Result<TaskChanges, TaskDomainError> {
        Ok(TaskChanges {
            title: self.title.map(TaskTitle::new).transpose()?,
            description: self.description.map(TaskDescription::new).transpose()?,
            priority: self.priority,
            difficulty: self.difficulty,
            due_date: self.due_date,
            completed: self.completed,
        })
    }
}

/// Result of toggling a task's completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleOutcome {
    /// The task as persisted after the toggle.
    pub task: Task,
    /// The XP award, present only on a task's first completion.
    pub award: Option<XpAward>,
}

impl ToggleOutcome {
    /// Returns `true` when the toggle's award raised the owner's level.
    #[must_use]
    pub fn leveled_up(&self) -> bool {
        self.award.as_ref().is_some_and(XpAward::leveled_up)
    }
}

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// The task does not exist for the requesting owner.
    #[error("task not found: {0}")]
    NotFound(TaskId),
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(TaskRepositoryError),
    /// Awarding XP failed.
    #[error(transparent)]
    Progression(#[from] ProgressionServiceError),
}

impl From<TaskRepositoryError> for TaskLifecycleError {
    fn from(err: TaskRepositoryError) -> Self {
        match err {
            TaskRepositoryError::NotFound(id) => Self::NotFound(id),
            other => Self::Repository(other),
        }
    }
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Task lifecycle orchestration service.
///
/// Mutations of one task are serialized for their whole
/// read-modify-persist span; different tasks interleave freely.
pub struct TaskLifecycleService<R, P, C>
where
    R: TaskRepository + ?Sized,
    P: ProgressionRepository + ?Sized,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    progression: ProgressionService<P, C>,
    clock: Arc<C>,
    task_locks: Arc<KeyedLocks<TaskId>>,
}

impl<R, P, C> Clone for TaskLifecycleService<R, P, C>
where
    R: TaskRepository + ?Sized,
    P: ProgressionRepository + ?Sized,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            progression: self.progression.clone(),
            clock: Arc::clone(&self.clock),
            task_locks: Arc::clone(&self.task_locks),
        }
    }
}

impl<R, P, C> TaskLifecycleService<R, P, C>
where
    R: TaskRepository + ?Sized,
    P: ProgressionRepository + ?Sized,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service awarding XP through
    /// `progression`.
    #[must_use]
    pub fn new(repository: Arc<R>, progression: ProgressionService<P, C>, clock: Arc<C>) -> Self {
        Self {
            repository,
            progression,
            clock,
            task_locks: Arc::new(KeyedLocks::new()),
        }
    }

    /// Returns the progression service this store awards XP through.
    #[must_use]
    pub const fn progression(&self) -> &ProgressionService<P, C> {
        &self.progression
    }

    /// Creates and persists a new open task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] when the title or description
    /// is blank, or [`TaskLifecycleError::Repository`] when the write fails.
    pub async fn create(
        &self,
        owner: &OwnerId,
        request: CreateTaskRequest,
    ) -> TaskLifecycleResult<Task> {
        let fields = NewTask {
            owner_id: owner.clone(),
            title: TaskTitle::new(request.title)?,
            description: TaskDescription::new(request.description)?,
            priority: request.priority,
            difficulty: request.difficulty,
            due_date: request.due_date,
        };
        let task = Task::new(fields, &*self.clock);
        self.repository.store(&task).await?;
        tracing::debug!(owner = %owner, task_id = %task.id(), "created task");
        Ok(task)
    }

    /// Lists the owner's tasks, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the lookup fails.
    pub async fn list(&self, owner: &OwnerId) -> TaskLifecycleResult<Vec<Task>> {
        Ok(self.repository.list_by_owner(owner).await?)
    }

    /// Returns one of the owner's tasks.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] when the owner has no such
    /// task, or [`TaskLifecycleError::Repository`] when the lookup fails.
    pub async fn find(&self, owner: &OwnerId, id: TaskId) -> TaskLifecycleResult<Task> {
        self.repository
            .find_by_id(owner, id)
            .await?
            .ok_or(TaskLifecycleError::NotFound(id))
    }

    /// Applies a partial update.
    ///
    /// Setting the completion flag here keeps `completed_at` consistent but
    /// leaves the reward flag alone and never awards XP.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] when the task is missing,
    /// [`TaskLifecycleError::Domain`] when a replacement text is blank, or
    /// [`TaskLifecycleError::Repository`] when persistence fails.
    pub async fn update(
        &self,
        owner: &OwnerId,
        id: TaskId,
        request: UpdateTaskRequest,
    ) -> TaskLifecycleResult<Task> {
        let changes = request.into_changes()?;
        let _guard = self.task_locks.lock(id).await;
        let mut task = self.find(owner, id).await?;
        task.apply_changes(changes, &*self.clock);
        self.repository.update(&task).await?;
        Ok(task)
    }

    /// Removes a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] when the task is missing, or
    /// [`TaskLifecycleError::Repository`] when persistence fails.
    pub async fn delete(&self, owner: &OwnerId, id: TaskId) -> TaskLifecycleResult<()> {
        let _guard = self.task_locks.lock(id).await;
        self.repository.delete(owner, id).await?;
        tracing::debug!(owner = %owner, task_id = %id, "deleted task");
        Ok(())
    }

    /// Flips a task's completion flag, awarding XP on its first completion.
    ///
    /// The award is persisted before the task. When the award fails the
    /// stored task is left as it was, so the toggle can simply be retried.
    /// The task is then written once with its completion and reward flags
    /// together; if that write fails the granted XP stands and the error is
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] when the task is missing,
    /// [`TaskLifecycleError::Progression`] when the award fails, or
    /// [`TaskLifecycleError::Repository`] when the task write fails.
    pub async fn toggle_complete(
        &self,
        owner: &OwnerId,
        id: TaskId,
    ) -> TaskLifecycleResult<ToggleOutcome> {
        let _guard = self.task_locks.lock(id).await;
        let mut task = self.find(owner, id).await?;

        let award = match task.toggle_completion(&*self.clock) {
            CompletionToggle::Completed { reward_due: true } => {
                let award = self
                    .progression
                    .add_xp(owner, u64::from(task.xp_reward()))
                    .await?;
                task.mark_rewarded(&*self.clock)?;
                Some(award)
            }
            CompletionToggle::Completed { reward_due: false } | CompletionToggle::Reopened => None,
        };

        if let Err(err) = self.repository.update(&task).await {
            if let Some(granted) = award {
                tracing::warn!(
                    owner = %owner,
                    task_id = %id,
                    awarded = granted.awarded.value(),
                    error = %err,
                    "xp granted but task write failed"
                );
            }
            return Err(err.into());
        }

        tracing::debug!(
            owner = %owner,
            task_id = %id,
            state = ?task.reward_state(),
            "toggled task completion"
        );
        Ok(ToggleOutcome { task, award })
    }

    /// Lists the owner's completed tasks, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the lookup fails.
    pub async fn completed(&self, owner: &OwnerId) -> TaskLifecycleResult<Vec<Task>> {
        self.list_where(owner, true).await
    }

    /// Lists the owner's tasks that are not completed, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the lookup fails.
    pub async fn pending(&self, owner: &OwnerId) -> TaskLifecycleResult<Vec<Task>> {
        self.list_where(owner, false).await
    }

    async fn list_where(
        &self,
        owner: &OwnerId,
        completed: bool,
    ) -> TaskLifecycleResult<Vec<Task>> {
        let mut tasks = self.repository.list_by_owner(owner).await?;
        tasks.retain(|task| task.is_completed() == completed);
        Ok(tasks)
    }

    /// Computes completion statistics over the owner's tasks.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the lookup fails.
    pub async fn stats(&self, owner: &OwnerId) -> TaskLifecycleResult<TaskStats> {
        let tasks = self.repository.list_by_owner(owner).await?;
        Ok(TaskStats::from_tasks(&tasks))
    }
}
