//! FocusQuest: the progression engine of a gamified task tracker.
//!
//! Users create tasks ("quests") and earn experience points (XP) and levels
//! when they complete them. The crate owns the XP/level curve, the
//! exactly-once award attached to task completion, and the task lifecycle,
//! and keeps them consistent whether state lives in memory, in local JSON
//! documents, or in `PostgreSQL`.
//!
//! # Architecture
//!
//! Each bounded context follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (memory, files, database)
//! - **Services**: Orchestration over ports
//!
//! # Modules
//!
//! - [`progression`]: XP curve, per-owner progression store, and events
//! - [`task`]: Task records, completion toggling, and statistics
//! - [`identity`]: The signed-in owner
//! - [`engine`]: Façade resolving the owner before every operation
//! - [`config`]: Storage backend selection

pub mod config;
pub mod engine;
pub mod identity;
pub mod locks;
pub mod progression;
pub mod storage;
pub mod task;

pub use engine::{QuestEngine, QuestEngineError, QuestEngineResult};
