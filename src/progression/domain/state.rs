//! Per-owner progression state and the level delta produced by an award.

use super::{ProgressionDomainError, cumulative_xp_before, level_for_total_xp, progress_in_level};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Positive XP amount accepted by an award.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct XpAmount(u64);

impl XpAmount {
    /// Creates a validated XP amount.
    ///
    /// # Errors
    ///
    /// Returns [`ProgressionDomainError::InvalidXpAmount`] when the value is
    /// zero.
    pub const fn new(value: u64) -> Result<Self, ProgressionDomainError> {
        if value == 0 {
            return Err(ProgressionDomainError::InvalidXpAmount(value));
        }
        Ok(Self(value))
    }

    /// Returns the underlying XP value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for XpAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Level increase caused by a single award.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelChange {
    /// Level before the award.
    pub from: u32,
    /// Level after the award.
    pub to: u32,
}

impl LevelChange {
    /// Returns how many levels were gained.
    #[must_use]
    pub const fn levels_gained(self) -> u32 {
        self.to.saturating_sub(self.from)
    }
}

impl fmt::Display for LevelChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "level increased from {} to {}", self.from, self.to)
    }
}

/// XP totals for one owner.
///
/// `level` and `current_xp` are always derived from `total_xp`; the triple
/// is only ever replaced as a whole. Storage adapters rebuild it through
/// [`ProgressionState::from_persisted`], falling back to
/// [`ProgressionState::from_total_xp`] for stored triples that disagree
/// with the curve, so it is serialize-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProgressionState {
    level: u32,
    current_xp: i64,
    total_xp: u64,
}

impl ProgressionState {
    /// State of an owner who has not earned any XP yet.
    #[must_use]
    pub const fn initial() -> Self {
        Self {
            level: 1,
            current_xp: 0,
            total_xp: 0,
        }
    }

    /// Derives the full state from a cumulative XP total.
    #[must_use]
    pub fn from_total_xp(total_xp: u64) -> Self {
        let progress = progress_in_level(total_xp);
        Self {
            level: progress.level,
            current_xp: progress.current_xp,
            total_xp,
        }
    }

    /// Reconstructs a state read back from storage.
    ///
    /// # Errors
    ///
    /// Returns [`ProgressionDomainError::InconsistentState`] when the stored
    /// level or in-level XP disagree with the stored total.
    pub fn from_persisted(
        level: u32,
        current_xp: i64,
        total_xp: u64,
    ) -> Result<Self, ProgressionDomainError> {
        let derived = Self::from_total_xp(total_xp);
        if derived.level != level || derived.current_xp != current_xp {
            return Err(ProgressionDomainError::InconsistentState {
                level,
                current_xp,
                total_xp,
            });
        }
        Ok(derived)
    }

    /// Returns the current level.
    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    /// Returns the XP accumulated within the current level.
    #[must_use]
    pub const fn current_xp(&self) -> i64 {
        self.current_xp
    }

    /// Returns the cumulative XP ever earned.
    #[must_use]
    pub const fn total_xp(&self) -> u64 {
        self.total_xp
    }

    /// Returns the cumulative XP charged for the levels already passed.
    #[must_use]
    pub fn xp_consumed_by_prior_levels(&self) -> u64 {
        cumulative_xp_before(self.level)
    }

    /// Returns the state after awarding `amount`, plus the level change if
    /// the award crossed a threshold.
    #[must_use]
    pub fn award(self, amount: XpAmount) -> (Self, Option<LevelChange>) {
        let next = Self::from_total_xp(self.total_xp.saturating_add(amount.value()));
        let change = (next.level > self.level).then_some(LevelChange {
            from: self.level,
            to: next.level,
        });
        (next, change)
    }
}

impl Default for ProgressionState {
    fn default() -> Self {
        Self::initial()
    }
}

impl From<ProgressionState> for super::LevelProgress {
    fn from(state: ProgressionState) -> Self {
        debug_assert_eq!(level_for_total_xp(state.total_xp), state.level);
        progress_in_level(state.total_xp)
    }
}
