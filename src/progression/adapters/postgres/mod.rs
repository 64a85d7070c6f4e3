//! `PostgreSQL` adapter for progression persistence.

mod models;
mod repository;
mod schema;

pub use repository::{PostgresProgressionRepository, ProgressionPgPool};
