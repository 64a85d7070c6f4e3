//! `PostgreSQL` adapter storing quests in the `tasks` table.

mod models;
mod repository;
mod schema;

pub use repository::{PostgresTaskRepository, TaskPgPool};
