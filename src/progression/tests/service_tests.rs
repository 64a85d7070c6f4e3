//! Service tests for the progression store.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::identity::domain::OwnerId;
use crate::progression::{
    adapters::memory::InMemoryProgressionRepository,
    domain::{LevelChange, ProgressionDomainError, ProgressionState},
    ports::{ProgressionRepository, ProgressionRepositoryError, ProgressionRepositoryResult},
    services::{ProgressionService, ProgressionServiceError},
};
use async_trait::async_trait;
use mockable::DefaultClock;
use rstest::{fixture, rstest};

type TestService = ProgressionService<InMemoryProgressionRepository, DefaultClock>;

/// Repository whose writes can be switched off to simulate an outage.
#[derive(Debug, Default)]
struct FlakyProgressionRepository {
    inner: InMemoryProgressionRepository,
    reject_writes: AtomicBool,
}

#[async_trait]
impl ProgressionRepository for FlakyProgressionRepository {
    async fn load(&self, owner: &OwnerId) -> ProgressionRepositoryResult<Option<ProgressionState>> {
        self.inner.load(owner).await
    }

    async fn save(
        &self,
        owner: &OwnerId,
        state: &ProgressionState,
    ) -> ProgressionRepositoryResult<()> {
        if self.reject_writes.load(Ordering::SeqCst) {
            return Err(ProgressionRepositoryError::persistence(
                std::io::Error::other("store unavailable"),
            ));
        }
        self.inner.save(owner, state).await
    }
}

#[fixture]
fn repository() -> Arc<InMemoryProgressionRepository> {
    Arc::new(InMemoryProgressionRepository::new())
}

#[fixture]
fn service(repository: Arc<InMemoryProgressionRepository>) -> TestService {
    ProgressionService::new(repository, Arc::new(DefaultClock))
}

#[fixture]
fn owner() -> OwnerId {
    OwnerId::new("auth0|player-one").expect("valid owner")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_owner_reads_initial_state_without_writing(
    repository: Arc<InMemoryProgressionRepository>,
    owner: OwnerId,
) {
    let service = ProgressionService::new(Arc::clone(&repository), Arc::new(DefaultClock));

    let state = service.get_state(&owner).await.expect("lookup succeeds");

    assert_eq!(state, ProgressionState::initial());
    assert!(
        repository
            .load(&owner)
            .await
            .expect("lookup succeeds")
            .is_none()
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn initialize_is_idempotent(service: TestService, owner: OwnerId) {
    let first = service.initialize(&owner).await.expect("initialize");
    service.add_xp(&owner, 50).await.expect("award");
    let second = service.initialize(&owner).await.expect("initialize again");

    assert_eq!(first, ProgressionState::initial());
    assert_eq!(second.total_xp(), 50);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn add_xp_persists_recomputed_triple(
    repository: Arc<InMemoryProgressionRepository>,
    owner: OwnerId,
) {
    let service = ProgressionService::new(Arc::clone(&repository), Arc::new(DefaultClock));

    service.add_xp(&owner, 90).await.expect("first award");
    let award = service.add_xp(&owner, 300).await.expect("second award");

    assert_eq!(award.previous.total_xp(), 90);
    assert_eq!(award.state.total_xp(), 390);
    assert_eq!(award.state.level(), 2);
    assert_eq!(award.state.current_xp(), 290);
    assert_eq!(award.level_change, Some(LevelChange { from: 1, to: 2 }));
    let stored = repository.load(&owner).await.expect("lookup succeeds");
    assert_eq!(stored, Some(award.state));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn add_xp_rejects_zero(service: TestService, owner: OwnerId) {
    let result = service.add_xp(&owner, 0).await;
    assert!(matches!(
        result,
        Err(ProgressionServiceError::Domain(
            ProgressionDomainError::InvalidXpAmount(0)
        ))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn subscribers_receive_level_up_events(service: TestService, owner: OwnerId) {
    let mut events = service.subscribe();

    service.add_xp(&owner, 100).await.expect("small award");
    service.add_xp(&owner, 200).await.expect("level-up award");

    let first = events.recv().await.expect("first event");
    let second = events.recv().await.expect("second event");
    assert!(!first.leveled_up());
    assert_eq!(second.level_change, Some(LevelChange { from: 1, to: 2 }));
    assert_eq!(second.current.total_xp(), 300);
    assert_eq!(second.owner_id, owner);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_write_leaves_state_unchanged(owner: OwnerId) {
    let repository = Arc::new(FlakyProgressionRepository::default());
    let service = ProgressionService::new(Arc::clone(&repository), Arc::new(DefaultClock));
    service.add_xp(&owner, 40).await.expect("award while healthy");

    repository.reject_writes.store(true, Ordering::SeqCst);
    let failed = service.add_xp(&owner, 500).await;
    assert!(matches!(failed, Err(ProgressionServiceError::Repository(_))));

    let state = service.get_state(&owner).await.expect("lookup succeeds");
    assert_eq!(state.total_xp(), 40);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_awards_for_one_owner_are_not_lost(service: TestService, owner: OwnerId) {
    let handles: Vec<_> = (0..32)
        .map(|_| {
            let task_service = service.clone();
            let task_owner = owner.clone();
            tokio::spawn(async move { task_service.add_xp(&task_owner, 15).await })
        })
        .collect();
    for handle in handles {
        handle.await.expect("join").expect("award");
    }

    let state = service.get_state(&owner).await.expect("lookup succeeds");
    assert_eq!(state, ProgressionState::from_total_xp(32 * 15));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn owners_progress_independently(service: TestService, owner: OwnerId) {
    let other = OwnerId::new("auth0|player-two").expect("valid owner");
    service.add_xp(&owner, 75).await.expect("award");

    let other_state = service.get_state(&other).await.expect("lookup succeeds");
    assert_eq!(other_state, ProgressionState::initial());
}
