//! Task lifecycle management for FocusQuest.
//!
//! Tasks are owner-scoped records that can be created, edited, deleted, and
//! toggled between open and completed. The first completion of a task
//! awards XP through the progression store exactly once; later toggles move
//! the task between completed and reopened without awarding again. The
//! module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
