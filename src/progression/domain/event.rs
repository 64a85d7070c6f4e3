//! Change notification published after every durable award.

use super::{LevelChange, ProgressionState, XpAmount};
use crate::identity::domain::OwnerId;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Published once an award has been persisted.
///
/// Presentation layers subscribe to these to re-render XP bars and to
/// announce level-ups; the engine itself never notifies the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressionEvent {
    /// Owner whose progression changed.
    pub owner_id: OwnerId,
    /// State before the award.
    pub previous: ProgressionState,
    /// State after the award.
    pub current: ProgressionState,
    /// XP granted.
    pub awarded: XpAmount,
    /// Level increase, when the award crossed a threshold.
    pub level_change: Option<LevelChange>,
    /// When the award was persisted.
    pub occurred_at: DateTime<Utc>,
}

impl ProgressionEvent {
    /// Returns `true` when the award raised the level.
    #[must_use]
    pub const fn leveled_up(&self) -> bool {
        self.level_change.is_some()
    }
}
