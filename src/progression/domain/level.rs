//! Level curve: thresholds, level lookup, and in-level progress.
//!
//! The threshold for level `L` is `round(100 * L^1.5)`, rounded per level.
//! A level's threshold doubles as the per-level cost charged once the level
//! has been passed, so `current_xp` inside level `L` is the cumulative total
//! minus the thresholds of levels `1..L`.

use serde::{Deserialize, Serialize};

/// Snapshot of a cumulative XP total projected onto the level curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelProgress {
    /// Level reached with this total.
    pub level: u32,
    /// XP remaining after charging the thresholds of every earlier level.
    ///
    /// Negative just after crossing a high threshold, because the charged
    /// thresholds grow faster than the thresholds themselves.
    pub current_xp: i64,
    /// Threshold of the next level.
    pub xp_for_next_level: u64,
    /// `current_xp` as a share of `xp_for_next_level`, clamped to `0..=100`.
    pub progress_percent: f64,
}

/// Returns the XP threshold of `level`, rounded to the nearest integer.
///
/// `xp_threshold(1) == 100`, `xp_threshold(2) == 283`,
/// `xp_threshold(3) == 520`.
#[must_use]
#[expect(
    clippy::float_arithmetic,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "the curve is defined over reals and rounded per level; the result is non-negative and saturates"
)]
pub fn xp_threshold(level: u32) -> u64 {
    (100.0 * f64::from(level).powf(1.5)).round() as u64
}

/// Returns the level reached with `total_xp` cumulative XP.
///
/// The level is the largest `L` whose threshold is met by `total_xp`,
/// never less than 1. Thresholds are strictly increasing, so the walk from
/// level 1 is replaced by a bounded binary search.
#[must_use]
pub fn level_for_total_xp(total_xp: u64) -> u32 {
    let reaches = |level: u32| level == 1 || xp_threshold(level) <= total_xp;

    let mut low = 1_u32;
    let mut high = initial_upper_bound(total_xp);
    while reaches(high) {
        if high == u32::MAX {
            return u32::MAX;
        }
        low = high;
        high = high.saturating_mul(2);
    }

    // `low` reaches, `high` does not.
    while high - low > 1 {
        let mid = low + ((high - low) >> 1);
        if reaches(mid) {
            low = mid;
        } else {
            high = mid;
        }
    }
    low
}

/// First guess at a level whose threshold exceeds `total_xp`.
#[expect(
    clippy::float_arithmetic,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    reason = "an estimate only; the caller verifies it against the exact thresholds"
)]
fn initial_upper_bound(total_xp: u64) -> u32 {
    let estimate = (total_xp as f64 / 100.0).powf(2.0 / 3.0);
    (estimate as u32).saturating_add(2)
}

/// Returns the sum of the thresholds of every level below `level`.
///
/// Saturates at `u64::MAX`.
#[must_use]
pub fn cumulative_xp_before(level: u32) -> u64 {
    let mut sum = 0_u64;
    for earlier in 1..level {
        match sum.checked_add(xp_threshold(earlier)) {
            Some(next) => sum = next,
            None => return u64::MAX,
        }
    }
    sum
}

/// Projects `total_xp` onto the level curve.
#[must_use]
#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "progress percentage is a display ratio"
)]
pub fn progress_in_level(total_xp: u64) -> LevelProgress {
    let level = level_for_total_xp(total_xp);
    let current_xp = signed_difference(total_xp, cumulative_xp_before(level));
    let xp_for_next_level = xp_threshold(level.saturating_add(1));
    let ratio = 100.0 * current_xp as f64 / xp_for_next_level as f64;

    LevelProgress {
        level,
        current_xp,
        xp_for_next_level,
        progress_percent: ratio.clamp(0.0, 100.0),
    }
}

fn signed_difference(minuend: u64, subtrahend: u64) -> i64 {
    let difference = i128::from(minuend) - i128::from(subtrahend);
    i64::try_from(difference).unwrap_or(if difference < 0 { i64::MIN } else { i64::MAX })
}
