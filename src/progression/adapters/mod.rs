//! Adapter implementations for progression ports.

pub mod file;
pub mod memory;
pub mod postgres;

use crate::progression::domain::ProgressionState;

/// Rebuilds a stored triple, deriving it from `total_xp` when the stored
/// level or in-level XP disagree with the curve.
///
/// Older clients accumulated in-level XP without charging thresholds. The
/// total is still authoritative, and the next save writes the derived
/// triple back.
pub(crate) fn restore_state(
    owner: &str,
    level: u32,
    current_xp: i64,
    total_xp: u64,
) -> ProgressionState {
    ProgressionState::from_persisted(level, current_xp, total_xp).unwrap_or_else(|err| {
        tracing::warn!(owner, error = %err, "rebuilding progression from total XP");
        ProgressionState::from_total_xp(total_xp)
    })
}
