//! File-backed repository keeping one task document per owner.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::identity::domain::OwnerId;
use crate::storage::{DocumentStoreError, JsonDocumentStore, document_name};
use crate::task::{
    domain::{Task, TaskId},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};

const COLLECTION: &str = "tasks";

/// On-disk shape of an owner's task document, in insertion order.
#[derive(Debug, Default, Serialize, Deserialize)]
struct TaskDocument {
    tasks: Vec<Task>,
}

impl TaskDocument {
    fn position(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|task| task.id() == id)
    }
}

impl From<DocumentStoreError> for TaskRepositoryError {
    fn from(err: DocumentStoreError) -> Self {
        Self::persistence(err)
    }
}

/// Task repository persisting to local JSON documents.
#[derive(Debug, Clone)]
pub struct FileTaskRepository {
    store: JsonDocumentStore,
}

impl FileTaskRepository {
    /// Creates a repository over an opened document store.
    #[must_use]
    pub const fn new(store: JsonDocumentStore) -> Self {
        Self { store }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&JsonDocumentStore) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = self.store.clone();
        tokio::task::spawn_blocking(move || f(&store))
            .await
            .map_err(TaskRepositoryError::persistence)?
    }
}

#[async_trait]
impl TaskRepository for FileTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let name = document_name(COLLECTION, task.owner_id().as_str());
        let record = task.clone();
        self.run_blocking(move |store| {
            store.modify(&name, |document: &mut TaskDocument| {
                if document.position(record.id()).is_some() {
                    return Err(TaskRepositoryError::DuplicateTask(record.id()));
                }
                document.tasks.push(record);
                Ok(())
            })
        })
        .await
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let name = document_name(COLLECTION, task.owner_id().as_str());
        let record = task.clone();
        self.run_blocking(move |store| {
            store.modify(&name, |document: &mut TaskDocument| {
                let id = record.id();
                let slot = document
                    .position(id)
                    .and_then(|index| document.tasks.get_mut(index))
                    .ok_or(TaskRepositoryError::NotFound(id))?;
                *slot = record;
                Ok(())
            })
        })
        .await
    }

    async fn delete(&self, owner: &OwnerId, id: TaskId) -> TaskRepositoryResult<()> {
        let name = document_name(COLLECTION, owner.as_str());
        self.run_blocking(move |store| {
            store.modify(&name, |document: &mut TaskDocument| {
                let index = document
                    .position(id)
                    .ok_or(TaskRepositoryError::NotFound(id))?;
                document.tasks.remove(index);
                Ok(())
            })
        })
        .await
    }

    async fn find_by_id(
        &self,
        owner: &OwnerId,
        id: TaskId,
    ) -> TaskRepositoryResult<Option<Task>> {
        let name = document_name(COLLECTION, owner.as_str());
        self.run_blocking(move |store| {
            let document: Option<TaskDocument> = store.read(&name)?;
            Ok(document.and_then(|stored| stored.tasks.into_iter().find(|task| task.id() == id)))
        })
        .await
    }

    async fn list_by_owner(&self, owner: &OwnerId) -> TaskRepositoryResult<Vec<Task>> {
        let name = document_name(COLLECTION, owner.as_str());
        self.run_blocking(move |store| {
            let document: Option<TaskDocument> = store.read(&name)?;
            Ok(document
                .map(|stored| stored.tasks.into_iter().rev().collect())
                .unwrap_or_default())
        })
        .await
    }
}
