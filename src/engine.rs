//! Quest engine: the single entry point embedding applications call.
//!
//! The engine resolves the signed-in owner through an
//! [`IdentityProvider`] before every operation and forwards to the task and
//! progression services with that owner.

use crate::config::{ConfigError, EngineConfig, StorageConfig};
use crate::identity::{domain::OwnerId, ports::IdentityProvider};
use crate::progression::{
    adapters::{
        file::FileProgressionRepository, memory::InMemoryProgressionRepository,
        postgres::PostgresProgressionRepository,
    },
    domain::{LevelProgress, ProgressionEvent, ProgressionState},
    ports::ProgressionRepository,
    services::{ProgressionService, ProgressionServiceError, XpAward},
};
use crate::storage::JsonDocumentStore;
use crate::task::{
    adapters::{
        file::FileTaskRepository, memory::InMemoryTaskRepository, postgres::PostgresTaskRepository,
    },
    domain::{Task, TaskId, TaskStats},
    ports::TaskRepository,
    services::{
        CreateTaskRequest, TaskLifecycleError, TaskLifecycleService, ToggleOutcome,
        UpdateTaskRequest,
    },
};
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use mockable::{Clock, DefaultClock};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::broadcast;

/// Errors surfaced by the engine.
#[derive(Debug, Error)]
pub enum QuestEngineError {
    /// No user is signed in.
    #[error("no authenticated user")]
    NotAuthenticated,
    /// A task operation failed.
    #[error(transparent)]
    Tasks(#[from] TaskLifecycleError),
    /// A progression operation failed.
    #[error(transparent)]
    Progression(#[from] ProgressionServiceError),
    /// The configuration could not be read.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The configured storage backend could not be opened.
    #[error("storage backend unavailable: {0}")]
    Backend(Arc<dyn std::error::Error + Send + Sync>),
}

impl QuestEngineError {
    /// Wraps a backend start-up error.
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Backend(Arc::new(err))
    }
}

/// Result type for engine operations.
pub type QuestEngineResult<T> = Result<T, QuestEngineError>;

/// Task store and progression store bound to an identity provider.
pub struct QuestEngine<C = DefaultClock>
where
    C: Clock + Send + Sync,
{
    identity: Arc<dyn IdentityProvider>,
    tasks: TaskLifecycleService<dyn TaskRepository, dyn ProgressionRepository, C>,
}

impl<C> Clone for QuestEngine<C>
where
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            identity: Arc::clone(&self.identity),
            tasks: self.tasks.clone(),
        }
    }
}

impl QuestEngine<DefaultClock> {
    /// Builds an engine over the backend named in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`QuestEngineError::Backend`] when the file directory or the
    /// database pool cannot be opened.
    pub fn from_config(
        config: &EngineConfig,
        identity: Arc<dyn IdentityProvider>,
    ) -> QuestEngineResult<Self> {
        let clock = Arc::new(DefaultClock);
        let (tasks, progression): (Arc<dyn TaskRepository>, Arc<dyn ProgressionRepository>) =
            match &config.storage {
                StorageConfig::Memory => (
                    Arc::new(InMemoryTaskRepository::new()),
                    Arc::new(InMemoryProgressionRepository::new()),
                ),
                StorageConfig::File { directory } => {
                    let store =
                        JsonDocumentStore::open(directory).map_err(QuestEngineError::backend)?;
                    (
                        Arc::new(FileTaskRepository::new(store.clone())),
                        Arc::new(FileProgressionRepository::new(store)),
                    )
                }
                StorageConfig::Postgres {
                    database_url,
                    max_connections,
                } => {
                    let pool = Pool::builder()
                        .max_size(*max_connections)
                        .build(ConnectionManager::<PgConnection>::new(database_url))
                        .map_err(QuestEngineError::backend)?;
                    let repository_clock: Arc<dyn Clock + Send + Sync> =
                        Arc::<DefaultClock>::clone(&clock);
                    (
                        Arc::new(PostgresTaskRepository::new(pool.clone())),
                        Arc::new(PostgresProgressionRepository::new(pool, repository_clock)),
                    )
                }
            };
        tracing::info!(storage = ?config.storage, "opened storage backend");
        Ok(Self::new(identity, tasks, progression, clock))
    }

    /// Builds an engine from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`QuestEngineError::Config`] when the environment is
    /// malformed, or [`QuestEngineError::Backend`] when the backend cannot be
    /// opened.
    pub fn from_env(identity: Arc<dyn IdentityProvider>) -> QuestEngineResult<Self> {
        Self::from_config(&EngineConfig::from_env()?, identity)
    }
}

impl<C> QuestEngine<C>
where
    C: Clock + Send + Sync,
{
    /// Assembles an engine from explicit adapters.
    #[must_use]
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        tasks: Arc<dyn TaskRepository>,
        progression: Arc<dyn ProgressionRepository>,
        clock: Arc<C>,
    ) -> Self {
        let progression_service = ProgressionService::new(progression, Arc::clone(&clock));
        Self {
            identity,
            tasks: TaskLifecycleService::new(tasks, progression_service, clock),
        }
    }

    /// Returns the signed-in owner.
    ///
    /// # Errors
    ///
    /// Returns [`QuestEngineError::NotAuthenticated`] when nobody is signed
    /// in.
    pub fn current_owner(&self) -> QuestEngineResult<OwnerId> {
        self.identity
            .current_user_id()
            .ok_or(QuestEngineError::NotAuthenticated)
    }

    /// Returns the owner-explicit task service.
    #[must_use]
    pub const fn tasks(
        &self,
    ) -> &TaskLifecycleService<dyn TaskRepository, dyn ProgressionRepository, C> {
        &self.tasks
    }

    /// Returns the owner-explicit progression service.
    #[must_use]
    pub const fn progression(&self) -> &ProgressionService<dyn ProgressionRepository, C> {
        self.tasks.progression()
    }

    /// Returns the signed-in owner's progression.
    ///
    /// # Errors
    ///
    /// Returns [`QuestEngineError::NotAuthenticated`] or a progression
    /// failure.
    pub async fn get_state(&self) -> QuestEngineResult<ProgressionState> {
        let owner = self.current_owner()?;
        Ok(self.progression().get_state(&owner).await?)
    }

    /// Persists the initial progression for a first-time owner.
    ///
    /// # Errors
    ///
    /// Returns [`QuestEngineError::NotAuthenticated`] or a progression
    /// failure.
    pub async fn initialize(&self) -> QuestEngineResult<ProgressionState> {
        let owner = self.current_owner()?;
        Ok(self.progression().initialize(&owner).await?)
    }

    /// Returns the signed-in owner's position on the level curve.
    ///
    /// # Errors
    ///
    /// Returns [`QuestEngineError::NotAuthenticated`] or a progression
    /// failure.
    pub async fn level_progress(&self) -> QuestEngineResult<LevelProgress> {
        let owner = self.current_owner()?;
        Ok(self.progression().level_progress(&owner).await?)
    }

    /// Awards XP to the signed-in owner directly.
    ///
    /// # Errors
    ///
    /// Returns [`QuestEngineError::NotAuthenticated`] or a progression
    /// failure, including a zero amount.
    pub async fn add_xp(&self, amount: u64) -> QuestEngineResult<XpAward> {
        let owner = self.current_owner()?;
        Ok(self.progression().add_xp(&owner, amount).await?)
    }

    /// Subscribes to progression events for every owner.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ProgressionEvent> {
        self.progression().subscribe()
    }

    /// Lists the signed-in owner's tasks, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`QuestEngineError::NotAuthenticated`] or a task failure.
    pub async fn list(&self) -> QuestEngineResult<Vec<Task>> {
        let owner = self.current_owner()?;
        Ok(self.tasks.list(&owner).await?)
    }

    /// Lists the signed-in owner's completed tasks, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`QuestEngineError::NotAuthenticated`] or a task failure.
    pub async fn completed(&self) -> QuestEngineResult<Vec<Task>> {
        let owner = self.current_owner()?;
        Ok(self.tasks.completed(&owner).await?)
    }

    /// Lists the signed-in owner's open tasks, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`QuestEngineError::NotAuthenticated`] or a task failure.
    pub async fn pending(&self) -> QuestEngineResult<Vec<Task>> {
        let owner = self.current_owner()?;
        Ok(self.tasks.pending(&owner).await?)
    }

    /// Creates a task for the signed-in owner.
    ///
    /// # Errors
    ///
    /// Returns [`QuestEngineError::NotAuthenticated`] or a task failure.
    pub async fn create(&self, request: CreateTaskRequest) -> QuestEngineResult<Task> {
        let owner = self.current_owner()?;
        Ok(self.tasks.create(&owner, request).await?)
    }

    /// Returns one of the signed-in owner's tasks.
    ///
    /// # Errors
    ///
    /// Returns [`QuestEngineError::NotAuthenticated`] or a task failure.
    pub async fn find(&self, id: TaskId) -> QuestEngineResult<Task> {
        let owner = self.current_owner()?;
        Ok(self.tasks.find(&owner, id).await?)
    }

    /// Updates one of the signed-in owner's tasks.
    ///
    /// # Errors
    ///
    /// Returns [`QuestEngineError::NotAuthenticated`] or a task failure.
    pub async fn update(&self, id: TaskId, request: UpdateTaskRequest) -> QuestEngineResult<Task> {
        let owner = self.current_owner()?;
        Ok(self.tasks.update(&owner, id, request).await?)
    }

    /// Deletes one of the signed-in owner's tasks.
    ///
    /// # Errors
    ///
    /// Returns [`QuestEngineError::NotAuthenticated`] or a task failure.
    pub async fn delete(&self, id: TaskId) -> QuestEngineResult<()> {
        let owner = self.current_owner()?;
        Ok(self.tasks.delete(&owner, id).await?)
    }

    /// Toggles completion of one of the signed-in owner's tasks.
    ///
    /// # Errors
    ///
    /// Returns [`QuestEngineError::NotAuthenticated`] or a task failure.
    pub async fn toggle_complete(&self, id: TaskId) -> QuestEngineResult<ToggleOutcome> {
        let owner = self.current_owner()?;
        Ok(self.tasks.toggle_complete(&owner, id).await?)
    }

    /// Computes completion statistics for the signed-in owner.
    ///
    /// # Errors
    ///
    /// Returns [`QuestEngineError::NotAuthenticated`] or a task failure.
    pub async fn stats(&self) -> QuestEngineResult<TaskStats> {
        let owner = self.current_owner()?;
        Ok(self.tasks.stats(&owner).await?)
    }
}
