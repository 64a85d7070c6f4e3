//! Diesel row models for progression persistence.

use super::schema::user_progress;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for progression records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = user_progress)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProgressionRow {
    /// Owner identifier.
    pub user_id: String,
    /// Current level.
    pub level: i32,
    /// XP within the current level.
    pub current_xp: i64,
    /// Cumulative XP.
    pub total_xp: i64,
}

/// Upsert model for progression records.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = user_progress)]
pub struct ProgressionUpsert {
    /// Owner identifier.
    pub user_id: String,
    /// Current level.
    pub level: i32,
    /// XP within the current level.
    pub current_xp: i64,
    /// Cumulative XP.
    pub total_xp: i64,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
