//! Domain model for XP rewards and levels.
//!
//! Everything here is pure and deterministic: the same inputs always produce
//! the same reward, level, and progress values.

mod error;
mod event;
mod level;
mod reward;
mod state;

pub use error::{ParseRatingError, ProgressionDomainError};
pub use event::ProgressionEvent;
pub use level::{
    LevelProgress, cumulative_xp_before, level_for_total_xp, progress_in_level, xp_threshold,
};
pub use reward::{Difficulty, Priority, xp_for_task};
pub use state::{LevelChange, ProgressionState, XpAmount};
