//! Repository port for per-owner progression state.

use crate::identity::domain::OwnerId;
use crate::progression::domain::ProgressionState;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for progression repository operations.
pub type ProgressionRepositoryResult<T> = Result<T, ProgressionRepositoryError>;

/// Progression persistence contract.
///
/// `save` always writes the whole `(level, current_xp, total_xp)` triple.
#[async_trait]
pub trait ProgressionRepository: Send + Sync {
    /// Loads the state stored for `owner`.
    ///
    /// Returns `None` when the owner has never been initialized.
    async fn load(&self, owner: &OwnerId) -> ProgressionRepositoryResult<Option<ProgressionState>>;

    /// Inserts or replaces the state stored for `owner`.
    ///
    /// # Errors
    ///
    /// Returns [`ProgressionRepositoryError::Persistence`] when the write
    /// does not reach durable storage.
    async fn save(
        &self,
        owner: &OwnerId,
        state: &ProgressionState,
    ) -> ProgressionRepositoryResult<()>;
}

/// Errors returned by progression repository implementations.
#[derive(Debug, Clone, Error)]
pub enum ProgressionRepositoryError {
    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ProgressionRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
