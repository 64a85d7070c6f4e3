//! Shared world state for quest reward BDD scenarios.

use std::collections::BTreeMap;
use std::sync::Arc;

use focusquest::identity::adapters::StaticIdentity;
use focusquest::progression::{
    adapters::memory::InMemoryProgressionRepository, domain::LevelChange,
};
use focusquest::task::{
    adapters::memory::InMemoryTaskRepository, domain::TaskId, services::ToggleOutcome,
};
use focusquest::{QuestEngine, QuestEngineResult};
use mockable::DefaultClock;
use rstest::fixture;

/// Scenario world for quest reward behaviour tests.
pub struct QuestWorld {
    pub identity: StaticIdentity,
    pub engine: QuestEngine,
    pub quests: BTreeMap<String, TaskId>,
    pub last_completion: Option<QuestEngineResult<ToggleOutcome>>,
    pub level_changes: Vec<LevelChange>,
}

impl QuestWorld {
    /// Creates a world over in-memory storage with nobody signed in.
    #[must_use]
    pub fn new() -> Self {
        let identity = StaticIdentity::signed_out();
        let engine = QuestEngine::new(
            Arc::new(identity.clone()),
            Arc::new(InMemoryTaskRepository::new()),
            Arc::new(InMemoryProgressionRepository::new()),
            Arc::new(DefaultClock),
        );

        Self {
            identity,
            engine,
            quests: BTreeMap::new(),
            last_completion: None,
            level_changes: Vec::new(),
        }
    }

    /// Looks up a quest created earlier in the scenario.
    pub fn quest(&self, title: &str) -> Result<TaskId, eyre::Report> {
        self.quests
            .get(title)
            .copied()
            .ok_or_else(|| eyre::eyre!("no quest titled '{title}' in scenario world"))
    }
}

impl Default for QuestWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> QuestWorld {
    QuestWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
