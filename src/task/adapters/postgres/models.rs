//! Diesel row models for task persistence.

use super::schema::tasks;
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;

/// Row shape shared by reads and writes of the `tasks` table.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub struct TaskRow {
    /// Internal task identifier.
    pub id: uuid::Uuid,
    /// Owner identifier.
    pub user_id: String,
    /// Task title.
    pub title: String,
    /// Task description.
    pub description: String,
    /// Priority label.
    pub priority: String,
    /// Difficulty label.
    pub difficulty: String,
    /// Completion flag.
    pub completed: bool,
    /// Reward flag.
    pub xp_awarded: bool,
    /// Optional due date.
    pub due_date: Option<NaiveDate>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
}
