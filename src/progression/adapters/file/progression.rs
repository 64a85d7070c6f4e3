//! File-backed repository keeping one progression document per owner.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::identity::domain::OwnerId;
use crate::progression::{
    adapters::restore_state,
    domain::ProgressionState,
    ports::{ProgressionRepository, ProgressionRepositoryError, ProgressionRepositoryResult},
};
use crate::storage::{JsonDocumentStore, document_name};

const COLLECTION: &str = "progression";

/// On-disk shape of a progression document.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct StoredProgression {
    level: u32,
    current_xp: i64,
    total_xp: u64,
}

impl From<&ProgressionState> for StoredProgression {
    fn from(state: &ProgressionState) -> Self {
        Self {
            level: state.level(),
            current_xp: state.current_xp(),
            total_xp: state.total_xp(),
        }
    }
}

/// Progression repository persisting to local JSON documents.
#[derive(Debug, Clone)]
pub struct FileProgressionRepository {
    store: JsonDocumentStore,
}

impl FileProgressionRepository {
    /// Creates a repository over an opened document store.
    #[must_use]
    pub const fn new(store: JsonDocumentStore) -> Self {
        Self { store }
    }

    async fn run_blocking<F, T>(&self, f: F) -> ProgressionRepositoryResult<T>
    where
        F: FnOnce(&JsonDocumentStore) -> ProgressionRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = self.store.clone();
        tokio::task::spawn_blocking(move || f(&store))
            .await
            .map_err(ProgressionRepositoryError::persistence)?
    }
}

#[async_trait]
impl ProgressionRepository for FileProgressionRepository {
    async fn load(&self, owner: &OwnerId) -> ProgressionRepositoryResult<Option<ProgressionState>> {
        let name = document_name(COLLECTION, owner.as_str());
        let owner_key = owner.as_str().to_owned();
        self.run_blocking(move |store| {
            let stored: Option<StoredProgression> = store
                .read(&name)
                .map_err(ProgressionRepositoryError::persistence)?;
            Ok(stored.map(|record| {
                restore_state(&owner_key, record.level, record.current_xp, record.total_xp)
            }))
        })
        .await
    }

    async fn save(
        &self,
        owner: &OwnerId,
        state: &ProgressionState,
    ) -> ProgressionRepositoryResult<()> {
        let name = document_name(COLLECTION, owner.as_str());
        let record = StoredProgression::from(state);
        self.run_blocking(move |store| {
            store
                .write(&name, &record)
                .map_err(ProgressionRepositoryError::persistence)
        })
        .await
    }
}
