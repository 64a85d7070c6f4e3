//! Progression store: per-owner XP state and the award operation.

use crate::identity::domain::OwnerId;
use crate::locks::KeyedLocks;
use crate::progression::{
    domain::{
        LevelChange, LevelProgress, ProgressionDomainError, ProgressionEvent, ProgressionState,
        XpAmount,
    },
    ports::{ProgressionRepository, ProgressionRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::broadcast;

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Service-level errors for progression operations.
#[derive(Debug, Error)]
pub enum ProgressionServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] ProgressionDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] ProgressionRepositoryError),
}

/// Result type for progression service operations.
pub type ProgressionServiceResult<T> = Result<T, ProgressionServiceError>;

/// Outcome of a persisted XP award.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XpAward {
    /// State before the award.
    pub previous: ProgressionState,
    /// State after the award, as persisted.
    pub state: ProgressionState,
    /// XP granted.
    pub awarded: XpAmount,
    /// Level increase, when the award crossed a threshold.
    pub level_change: Option<LevelChange>,
}

impl XpAward {
    /// Returns `true` when the award raised the level.
    #[must_use]
    pub const fn leveled_up(&self) -> bool {
        self.level_change.is_some()
    }
}

/// Owns every owner's [`ProgressionState`] and applies awards to it.
///
/// Owners that have never been observed start at the initial state; the
/// first award persists it. Awards for the same owner are serialized so the
/// stored triple is always a full, consistent read-modify-write.
pub struct ProgressionService<R, C>
where
    R: ProgressionRepository + ?Sized,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
    owner_locks: Arc<KeyedLocks<OwnerId>>,
    events: broadcast::Sender<ProgressionEvent>,
}

impl<R, C> Clone for ProgressionService<R, C>
where
    R: ProgressionRepository + ?Sized,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            clock: Arc::clone(&self.clock),
            owner_locks: Arc::clone(&self.owner_locks),
            events: self.events.clone(),
        }
    }
}

impl<R, C> ProgressionService<R, C>
where
    R: ProgressionRepository + ?Sized,
    C: Clock + Send + Sync,
{
    /// Creates a new progression service.
    #[must_use]
    pub fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            repository,
            clock,
            owner_locks: Arc::new(KeyedLocks::new()),
            events,
        }
    }

    /// Returns the owner's current state.
    ///
    /// Owners without stored progression report the initial state; nothing
    /// is written.
    ///
    /// # Errors
    ///
    /// Returns [`ProgressionServiceError::Repository`] when the lookup fails.
    pub async fn get_state(&self, owner: &OwnerId) -> ProgressionServiceResult<ProgressionState> {
        self.load_or_initial(owner).await
    }

    /// Persists the initial state for an owner seen for the first time.
    ///
    /// Returns the stored state unchanged when the owner already has one.
    ///
    /// # Errors
    ///
    /// Returns [`ProgressionServiceError::Repository`] when the lookup or
    /// write fails.
    pub async fn initialize(&self, owner: &OwnerId) -> ProgressionServiceResult<ProgressionState> {
        let _guard = self.owner_locks.lock(owner.clone()).await;
        if let Some(existing) = self.repository.load(owner).await? {
            return Ok(existing);
        }
        let initial = ProgressionState::initial();
        self.repository.save(owner, &initial).await?;
        tracing::debug!(owner = %owner, "initialized progression");
        Ok(initial)
    }

    /// Returns the owner's position on the level curve.
    ///
    /// # Errors
    ///
    /// Returns [`ProgressionServiceError::Repository`] when the lookup fails.
    pub async fn level_progress(&self, owner: &OwnerId) -> ProgressionServiceResult<LevelProgress> {
        Ok(self.load_or_initial(owner).await?.into())
    }

    /// Awards `amount` XP to `owner`.
    ///
    /// The new state is persisted before it is returned or published. A
    /// failed write leaves the stored state untouched.
    ///
    /// # Errors
    ///
    /// Returns [`ProgressionServiceError::Domain`] when `amount` is zero, or
    /// [`ProgressionServiceError::Repository`] when the read or write fails.
    pub async fn add_xp(&self, owner: &OwnerId, amount: u64) -> ProgressionServiceResult<XpAward> {
        let awarded = XpAmount::new(amount)?;
        let _guard = self.owner_locks.lock(owner.clone()).await;

        let previous = self.load_or_initial(owner).await?;
        let (state, level_change) = previous.award(awarded);
        self.repository.save(owner, &state).await?;

        tracing::info!(
            owner = %owner,
            awarded = awarded.value(),
            total_xp = state.total_xp(),
            level = state.level(),
            "awarded xp"
        );
        if let Some(change) = level_change {
            tracing::info!(owner = %owner, from = change.from, to = change.to, "{change}");
        }

        self.publish(ProgressionEvent {
            owner_id: owner.clone(),
            previous,
            current: state,
            awarded,
            level_change,
            occurred_at: self.clock.utc(),
        });

        Ok(XpAward {
            previous,
            state,
            awarded,
            level_change,
        })
    }

    /// Subscribes to events published after each persisted award.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ProgressionEvent> {
        self.events.subscribe()
    }

    async fn load_or_initial(&self, owner: &OwnerId) -> ProgressionServiceResult<ProgressionState> {
        match self.repository.load(owner).await? {
            Some(state) => Ok(state),
            None => {
                tracing::debug!(owner = %owner, "no stored progression, starting at level 1");
                Ok(ProgressionState::initial())
            }
        }
    }

    fn publish(&self, event: ProgressionEvent) {
        if self.events.send(event).is_err() {
            tracing::trace!("no progression subscribers");
        }
    }
}
