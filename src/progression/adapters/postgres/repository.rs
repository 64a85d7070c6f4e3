//! `PostgreSQL` repository implementation for progression storage.

use super::{
    models::{ProgressionRow, ProgressionUpsert},
    schema::user_progress,
};
use crate::identity::domain::OwnerId;
use crate::progression::{
    adapters::restore_state,
    domain::ProgressionState,
    ports::{ProgressionRepository, ProgressionRepositoryError, ProgressionRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use mockable::Clock;
use std::sync::Arc;

/// `PostgreSQL` connection pool type used by progression adapters.
pub type ProgressionPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed progression repository.
#[derive(Clone)]
pub struct PostgresProgressionRepository {
    pool: ProgressionPgPool,
    clock: Arc<dyn Clock + Send + Sync>,
}

impl PostgresProgressionRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub fn new(pool: ProgressionPgPool, clock: Arc<dyn Clock + Send + Sync>) -> Self {
        Self { pool, clock }
    }

    async fn run_blocking<F, T>(&self, f: F) -> ProgressionRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> ProgressionRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(ProgressionRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(ProgressionRepositoryError::persistence)?
    }
}

#[async_trait]
impl ProgressionRepository for PostgresProgressionRepository {
    async fn load(&self, owner: &OwnerId) -> ProgressionRepositoryResult<Option<ProgressionState>> {
        let user_id = owner.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = user_progress::table
                .filter(user_progress::user_id.eq(&user_id))
                .select(ProgressionRow::as_select())
                .first::<ProgressionRow>(connection)
                .optional()
                .map_err(ProgressionRepositoryError::persistence)?;
            row.as_ref().map(row_to_state).transpose()
        })
        .await
    }

    async fn save(
        &self,
        owner: &OwnerId,
        state: &ProgressionState,
    ) -> ProgressionRepositoryResult<()> {
        let upsert = to_upsert(owner, state, self.clock.utc())?;
        self.run_blocking(move |connection| {
            diesel::insert_into(user_progress::table)
                .values(&upsert)
                .on_conflict(user_progress::user_id)
                .do_update()
                .set(&upsert)
                .execute(connection)
                .map_err(ProgressionRepositoryError::persistence)?;
            Ok(())
        })
        .await
    }
}

fn to_upsert(
    owner: &OwnerId,
    state: &ProgressionState,
    updated_at: chrono::DateTime<chrono::Utc>,
) -> ProgressionRepositoryResult<ProgressionUpsert> {
    Ok(ProgressionUpsert {
        user_id: owner.as_str().to_owned(),
        level: i32::try_from(state.level()).map_err(ProgressionRepositoryError::persistence)?,
        current_xp: state.current_xp(),
        total_xp: i64::try_from(state.total_xp())
            .map_err(ProgressionRepositoryError::persistence)?,
        updated_at,
    })
}

fn row_to_state(row: &ProgressionRow) -> ProgressionRepositoryResult<ProgressionState> {
    let level = u32::try_from(row.level).unwrap_or_default();
    let total_xp = u64::try_from(row.total_xp).map_err(ProgressionRepositoryError::persistence)?;
    Ok(restore_state(&row.user_id, level, row.current_xp, total_xp))
}
