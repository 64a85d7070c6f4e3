//! Service tests for task CRUD and owner scoping.

use std::sync::Arc;

use crate::identity::domain::OwnerId;
use crate::progression::{
    adapters::memory::InMemoryProgressionRepository, services::ProgressionService,
};
use crate::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{Difficulty, Priority, Task, TaskDomainError, TaskId, TaskRewardState},
    services::{CreateTaskRequest, TaskLifecycleError, TaskLifecycleService, UpdateTaskRequest},
};
use chrono::NaiveDate;
use mockable::DefaultClock;
use rstest::{fixture, rstest};

type TestService =
    TaskLifecycleService<InMemoryTaskRepository, InMemoryProgressionRepository, DefaultClock>;

#[fixture]
fn service() -> TestService {
    let clock = Arc::new(DefaultClock);
    let progression = ProgressionService::new(
        Arc::new(InMemoryProgressionRepository::new()),
        Arc::clone(&clock),
    );
    TaskLifecycleService::new(Arc::new(InMemoryTaskRepository::new()), progression, clock)
}

#[fixture]
fn owner() -> OwnerId {
    OwnerId::new("user-1").expect("valid owner")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_applies_defaults_and_persists(service: TestService, owner: OwnerId) {
    let created = service
        .create(&owner, CreateTaskRequest::new("  Water plants ", "Balcony"))
        .await
        .expect("task creation should succeed");

    assert_eq!(created.title().as_str(), "Water plants");
    assert_eq!(created.priority(), Priority::Medium);
    assert_eq!(created.difficulty(), Difficulty::Medium);
    assert_eq!(created.reward_state(), TaskRewardState::Open);

    let fetched = service
        .find(&owner, created.id())
        .await
        .expect("lookup should succeed");
    assert_eq!(fetched, created);
}

#[rstest]
#[case("", "description", TaskDomainError::EmptyTitle)]
#[case("title", "   ", TaskDomainError::EmptyDescription)]
#[tokio::test(flavor = "multi_thread")]
async fn create_rejects_blank_text(
    service: TestService,
    owner: OwnerId,
    #[case] title: &str,
    #[case] description: &str,
    #[case] expected: TaskDomainError,
) {
    let result = service
        .create(&owner, CreateTaskRequest::new(title, description))
        .await;

    assert!(matches!(result, Err(TaskLifecycleError::Domain(err)) if err == expected));
    assert!(service.list(&owner).await.expect("list").is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn list_returns_newest_first(service: TestService, owner: OwnerId) {
    let mut created = Vec::new();
    for title in ["first", "second", "third"] {
        let task = service
            .create(&owner, CreateTaskRequest::new(title, "body"))
            .await
            .expect("task creation should succeed");
        created.push(task.id());
    }
    created.reverse();

    let listed: Vec<TaskId> = service
        .list(&owner)
        .await
        .expect("list should succeed")
        .iter()
        .map(crate::task::domain::Task::id)
        .collect();

    assert_eq!(listed, created);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn tasks_are_scoped_to_their_owner(service: TestService, owner: OwnerId) {
    let created = service
        .create(&owner, CreateTaskRequest::new("private", "mine"))
        .await
        .expect("task creation should succeed");
    let intruder = OwnerId::new("user-2").expect("valid owner");

    assert!(service.list(&intruder).await.expect("list").is_empty());
    assert!(matches!(
        service.find(&intruder, created.id()).await,
        Err(TaskLifecycleError::NotFound(id)) if id == created.id()
    ));
    assert!(matches!(
        service.toggle_complete(&intruder, created.id()).await,
        Err(TaskLifecycleError::NotFound(_))
    ));
    assert!(matches!(
        service.delete(&intruder, created.id()).await,
        Err(TaskLifecycleError::NotFound(_))
    ));
    assert!(service.find(&owner, created.id()).await.is_ok());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_merges_fields_without_awarding(service: TestService, owner: OwnerId) {
    let created = service
        .create(
            &owner,
            CreateTaskRequest::new("Plan trip", "Book trains")
                .with_due_date(NaiveDate::from_ymd_opt(2026, 11, 1).expect("valid date")),
        )
        .await
        .expect("task creation should succeed");

    let updated = service
        .update(
            &owner,
            created.id(),
            UpdateTaskRequest::new()
                .with_title("Plan holiday")
                .with_difficulty(Difficulty::Hard)
                .clear_due_date()
                .with_completed(true),
        )
        .await
        .expect("update should succeed");

    assert_eq!(updated.title().as_str(), "Plan holiday");
    assert_eq!(updated.description().as_str(), "Book trains");
    assert_eq!(updated.difficulty(), Difficulty::Hard);
    assert_eq!(updated.due_date(), None);
    assert_eq!(updated.reward_state(), TaskRewardState::AwaitingReward);
    assert!(updated.updated_at() >= created.updated_at());

    let state = service
        .progression()
        .get_state(&owner)
        .await
        .expect("state lookup");
    assert_eq!(state.total_xp(), 0);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn due_date_set_by_update_reads_back(service: TestService, owner: OwnerId) {
    let created = service
        .create(&owner, CreateTaskRequest::new("Renew passport", "Post office"))
        .await
        .expect("task creation should succeed");
    assert_eq!(created.due_date(), None);
    let due = NaiveDate::from_ymd_opt(2027, 1, 2).expect("valid date");

    service
        .update(&owner, created.id(), UpdateTaskRequest::new().with_due_date(due))
        .await
        .expect("update should succeed");

    let fetched = service
        .find(&owner, created.id())
        .await
        .expect("lookup should succeed");
    assert_eq!(fetched.due_date(), Some(due));
    let listed = service.list(&owner).await.expect("list");
    assert_eq!(listed, vec![fetched]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_rejects_blank_title(service: TestService, owner: OwnerId) {
    let created = service
        .create(&owner, CreateTaskRequest::new("Keep", "me"))
        .await
        .expect("task creation should succeed");

    let result = service
        .update(&owner, created.id(), UpdateTaskRequest::new().with_title(" "))
        .await;

    assert!(matches!(
        result,
        Err(TaskLifecycleError::Domain(TaskDomainError::EmptyTitle))
    ));
    let stored = service.find(&owner, created.id()).await.expect("lookup");
    assert_eq!(stored, created);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_of_missing_task_is_not_found(service: TestService, owner: OwnerId) {
    let missing = TaskId::new();

    let result = service
        .update(&owner, missing, UpdateTaskRequest::new().with_priority(Priority::Low))
        .await;

    assert!(matches!(result, Err(TaskLifecycleError::NotFound(id)) if id == missing));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_removes_and_reports_missing(service: TestService, owner: OwnerId) {
    let created = service
        .create(&owner, CreateTaskRequest::new("Temporary", "gone soon"))
        .await
        .expect("task creation should succeed");

    service
        .delete(&owner, created.id())
        .await
        .expect("first delete should succeed");

    assert!(service.list(&owner).await.expect("list").is_empty());
    assert!(matches!(
        service.delete(&owner, created.id()).await,
        Err(TaskLifecycleError::NotFound(_))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stats_count_completed_tasks(service: TestService, owner: OwnerId) {
    let mut ids = Vec::new();
    for index in 0..8 {
        let task = service
            .create(&owner, CreateTaskRequest::new(format!("task {index}"), "body"))
            .await
            .expect("task creation should succeed");
        ids.push(task.id());
    }
    let first = ids.first().copied().expect("eight tasks");
    service
        .toggle_complete(&owner, first)
        .await
        .expect("toggle should succeed");

    let stats = service.stats(&owner).await.expect("stats should succeed");

    assert_eq!(
        (stats.total, stats.completed, stats.pending, stats.completion_rate),
        (8, 1, 7, 13)
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn completed_and_pending_partition_the_list(service: TestService, owner: OwnerId) {
    let mut created = Vec::new();
    for title in ["laundry", "dishes", "groceries"] {
        let task = service
            .create(&owner, CreateTaskRequest::new(title, "chores"))
            .await
            .expect("task creation should succeed");
        created.push(task.id());
    }
    let [laundry, dishes, groceries] =
        <[TaskId; 3]>::try_from(created).expect("three tasks created");
    service
        .toggle_complete(&owner, dishes)
        .await
        .expect("toggle should succeed");

    let completed: Vec<TaskId> = service
        .completed(&owner)
        .await
        .expect("completed list")
        .iter()
        .map(Task::id)
        .collect();
    let pending: Vec<TaskId> = service
        .pending(&owner)
        .await
        .expect("pending list")
        .iter()
        .map(Task::id)
        .collect();

    assert_eq!(completed, vec![dishes]);
    assert_eq!(pending, vec![groceries, laundry]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stats_for_empty_list_are_zero(service: TestService, owner: OwnerId) {
    let stats = service.stats(&owner).await.expect("stats should succeed");

    assert_eq!(stats.total, 0);
    assert_eq!(stats.completion_rate, 0);
}
