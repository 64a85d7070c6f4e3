//! In-memory repository for progression state.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::identity::domain::OwnerId;
use crate::progression::{
    domain::ProgressionState,
    ports::{ProgressionRepository, ProgressionRepositoryError, ProgressionRepositoryResult},
};

/// Thread-safe in-memory progression repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProgressionRepository {
    states: Arc<RwLock<HashMap<OwnerId, ProgressionState>>>,
}

impl InMemoryProgressionRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProgressionRepository for InMemoryProgressionRepository {
    async fn load(&self, owner: &OwnerId) -> ProgressionRepositoryResult<Option<ProgressionState>> {
        let states = self.states.read().map_err(|err| {
            ProgressionRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(states.get(owner).copied())
    }

    async fn save(
        &self,
        owner: &OwnerId,
        state: &ProgressionState,
    ) -> ProgressionRepositoryResult<()> {
        let mut states = self.states.write().map_err(|err| {
            ProgressionRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        states.insert(owner.clone(), *state);
        Ok(())
    }
}
