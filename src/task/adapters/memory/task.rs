//! In-memory repository for task lifecycle tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::identity::domain::OwnerId;
use crate::task::{
    domain::{Task, TaskId},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};

/// Thread-safe in-memory task repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    /// Tasks per owner in insertion order.
    tasks: HashMap<OwnerId, Vec<Task>>,
    owners: HashMap<TaskId, OwnerId>,
}

impl InMemoryTaskState {
    fn slot_mut(&mut self, owner: &OwnerId, id: TaskId) -> Option<&mut Task> {
        self.tasks
            .get_mut(owner)
            .and_then(|tasks| tasks.iter_mut().find(|task| task.id() == id))
    }
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        if state.owners.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }
        state.owners.insert(task.id(), task.owner_id().clone());
        state
            .tasks
            .entry(task.owner_id().clone())
            .or_default()
            .push(task.clone());
        Ok(())
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let slot = state
            .slot_mut(task.owner_id(), task.id())
            .ok_or(TaskRepositoryError::NotFound(task.id()))?;
        *slot = task.clone();
        Ok(())
    }

    async fn delete(&self, owner: &OwnerId, id: TaskId) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let tasks = state
            .tasks
            .get_mut(owner)
            .ok_or(TaskRepositoryError::NotFound(id))?;
        let position = tasks
            .iter()
            .position(|task| task.id() == id)
            .ok_or(TaskRepositoryError::NotFound(id))?;
        tasks.remove(position);
        state.owners.remove(&id);
        Ok(())
    }

    async fn find_by_id(
        &self,
        owner: &OwnerId,
        id: TaskId,
    ) -> TaskRepositoryResult<Option<Task>> {
        let state = self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state
            .tasks
            .get(owner)
            .and_then(|tasks| tasks.iter().find(|task| task.id() == id))
            .cloned())
    }

    async fn list_by_owner(&self, owner: &OwnerId) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state
            .tasks
            .get(owner)
            .map(|tasks| tasks.iter().rev().cloned().collect())
            .unwrap_or_default())
    }
}
