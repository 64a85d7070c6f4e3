//! Reward table mapping task difficulty and priority to XP.

use super::ParseRatingError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How hard a task is; selects the base XP reward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    /// Base reward of 10 XP.
    Easy,
    /// Base reward of 25 XP.
    Medium,
    /// Base reward of 50 XP.
    Hard,
}

impl Difficulty {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }

    const fn base_xp(self) -> u32 {
        match self {
            Self::Easy => 10,
            Self::Medium => 25,
            Self::Hard => 50,
        }
    }
}

impl TryFrom<&str> for Difficulty {
    type Error = ParseRatingError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            _ => Err(ParseRatingError {
                kind: "difficulty",
                value: value.to_owned(),
            }),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How urgent a task is; scales the base XP reward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Multiplier 1.0.
    Low,
    /// Multiplier 1.2.
    Medium,
    /// Multiplier 1.5.
    High,
}

impl Priority {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Multiplier expressed in tenths so rewards stay in integer arithmetic.
    const fn multiplier_tenths(self) -> u32 {
        match self {
            Self::Low => 10,
            Self::Medium => 12,
            Self::High => 15,
        }
    }
}

impl TryFrom<&str> for Priority {
    type Error = ParseRatingError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(ParseRatingError {
                kind: "priority",
                value: value.to_owned(),
            }),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns the XP reward for completing a task.
///
/// The base reward for `difficulty` is scaled by the `priority` multiplier
/// and rounded to the nearest integer, halves rounding up (37.5 becomes 38).
#[must_use]
#[expect(
    clippy::integer_division,
    reason = "adding five tenths before truncating implements round-half-up exactly"
)]
pub const fn xp_for_task(difficulty: Difficulty, priority: Priority) -> u32 {
    let tenths = difficulty.base_xp() * priority.multiplier_tenths();
    (tenths + 5) / 10
}
