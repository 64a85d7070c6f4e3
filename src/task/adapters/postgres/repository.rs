//! `PostgreSQL` repository implementation for task storage.

use super::{models::TaskRow, schema::tasks};
use crate::identity::domain::OwnerId;
use crate::task::{
    domain::{
        Difficulty, PersistedTaskData, Priority, Task, TaskDescription, TaskId, TaskTitle,
    },
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by task adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed task repository.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: TaskPgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let row = to_row(task);
        self.run_blocking(move |connection| {
            diesel::insert_into(tasks::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TaskRepositoryError::DuplicateTask(task_id)
                    }
                    _ => TaskRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let row = to_row(task);
        self.run_blocking(move |connection| {
            let affected = diesel::update(
                tasks::table
                    .filter(tasks::id.eq(row.id))
                    .filter(tasks::user_id.eq(&row.user_id)),
            )
            .set(&row)
            .execute(connection)
            .map_err(TaskRepositoryError::persistence)?;
            if affected == 0 {
                return Err(TaskRepositoryError::NotFound(task_id));
            }
            Ok(())
        })
        .await
    }

    async fn delete(&self, owner: &OwnerId, id: TaskId) -> TaskRepositoryResult<()> {
        let user_id = owner.as_str().to_owned();
        self.run_blocking(move |connection| {
            let affected = diesel::delete(
                tasks::table
                    .filter(tasks::id.eq(id.into_inner()))
                    .filter(tasks::user_id.eq(&user_id)),
            )
            .execute(connection)
            .map_err(TaskRepositoryError::persistence)?;
            if affected == 0 {
                return Err(TaskRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(
        &self,
        owner: &OwnerId,
        id: TaskId,
    ) -> TaskRepositoryResult<Option<Task>> {
        let user_id = owner.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(id.into_inner()))
                .filter(tasks::user_id.eq(&user_id))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn list_by_owner(&self, owner: &OwnerId) -> TaskRepositoryResult<Vec<Task>> {
        let user_id = owner.as_str().to_owned();
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .filter(tasks::user_id.eq(&user_id))
                .order((tasks::created_at.desc(), tasks::id.desc()))
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }
}

fn to_row(task: &Task) -> TaskRow {
    TaskRow {
        id: task.id().into_inner(),
        user_id: task.owner_id().as_str().to_owned(),
        title: task.title().as_str().to_owned(),
        description: task.description().as_str().to_owned(),
        priority: task.priority().as_str().to_owned(),
        difficulty: task.difficulty().as_str().to_owned(),
        completed: task.is_completed(),
        xp_awarded: task.is_rewarded(),
        due_date: task.due_date(),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
        completed_at: task.completed_at(),
    }
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        user_id,
        title,
        description,
        priority,
        difficulty,
        completed,
        xp_awarded,
        due_date,
        created_at,
        updated_at,
        completed_at,
    } = row;

    let data = PersistedTaskData {
        id: TaskId::from_uuid(id),
        owner_id: OwnerId::new(user_id).map_err(TaskRepositoryError::persistence)?,
        title: TaskTitle::new(title).map_err(TaskRepositoryError::persistence)?,
        description: TaskDescription::new(description)
            .map_err(TaskRepositoryError::persistence)?,
        priority: Priority::try_from(priority.as_str())
            .map_err(TaskRepositoryError::persistence)?,
        difficulty: Difficulty::try_from(difficulty.as_str())
            .map_err(TaskRepositoryError::persistence)?,
        completed,
        rewarded: xp_awarded,
        due_date,
        created_at,
        updated_at,
        completed_at,
    };
    Ok(Task::from_persisted(data))
}

#[cfg(test)]
mod tests {
    use super::{TaskRow, row_to_task, to_row};
    use crate::identity::domain::OwnerId;
    use crate::task::domain::{
        Difficulty, NewTask, Priority, TaskDescription, TaskRewardState, TaskTitle,
    };
    use crate::task::domain::Task;
    use chrono::NaiveDate;
    use mockable::DefaultClock;

    fn sample_task() -> Task {
        let fields = NewTask {
            owner_id: OwnerId::new("user-1").expect("valid owner"),
            title: TaskTitle::new("Write report").expect("valid title"),
            description: TaskDescription::new("Quarterly numbers").expect("valid description"),
            priority: Priority::High,
            difficulty: Difficulty::Hard,
            due_date: NaiveDate::from_ymd_opt(2026, 11, 2),
        };
        Task::new(fields, &DefaultClock)
    }

    #[test]
    fn row_round_trip_preserves_the_task() {
        let mut task = sample_task();
        task.toggle_completion(&DefaultClock);
        task.mark_rewarded(&DefaultClock).expect("completed task");

        let row = to_row(&task);
        assert_eq!(row.priority, "high");
        assert_eq!(row.difficulty, "hard");
        assert!(row.xp_awarded);

        let restored = row_to_task(row).expect("valid row");
        assert_eq!(restored, task);
        assert_eq!(restored.reward_state(), TaskRewardState::Rewarded);
    }

    #[test]
    fn unknown_priority_label_is_rejected() {
        let row = TaskRow {
            priority: "urgent".to_owned(),
            ..to_row(&sample_task())
        };
        assert!(row_to_task(row).is_err());
    }

    #[test]
    fn blank_title_is_rejected() {
        let row = TaskRow {
            title: "   ".to_owned(),
            ..to_row(&sample_task())
        };
        assert!(row_to_task(row).is_err());
    }
}
