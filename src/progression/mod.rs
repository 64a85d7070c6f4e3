//! XP and level progression for FocusQuest.
//!
//! Completing a task earns XP; cumulative XP maps onto a level curve whose
//! per-level cost grows with exponent 1.5. Progress is permanent: there is no
//! operation that removes XP or demotes a level. The module follows the same
//! layout as [`crate::task`]:
//!
//! - Pure math and state types in [`domain`]
//! - Persistence contracts in [`ports`]
//! - Memory, file, and `PostgreSQL` adapters in [`adapters`]
//! - The progression store in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
