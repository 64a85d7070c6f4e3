//! Then steps for quest reward BDD scenarios.

use super::world::{QuestWorld, run_async};
use focusquest::QuestEngineError;
use focusquest::progression::domain::LevelChange;
use focusquest::task::domain::TaskRewardState;
use eyre::WrapErr;
use rstest_bdd_macros::then;

#[then("the player has {total:u64} total XP")]
fn player_total_xp(world: &QuestWorld, total: u64) -> Result<(), eyre::Report> {
    let state = run_async(world.engine.get_state()).wrap_err("read progression")?;
    if state.total_xp() != total {
        return Err(eyre::eyre!(
            "expected {total} total XP, found {}",
            state.total_xp()
        ));
    }
    Ok(())
}

#[then(r#"the quest "{title}" is rewarded"#)]
fn quest_is_rewarded(world: &QuestWorld, title: String) -> Result<(), eyre::Report> {
    let id = world.quest(&title)?;
    let task = run_async(world.engine.find(id)).wrap_err("read scenario quest")?;
    if task.reward_state() != TaskRewardState::Rewarded {
        return Err(eyre::eyre!(
            "expected rewarded quest, found {:?}",
            task.reward_state()
        ));
    }
    Ok(())
}

#[then("the player is level {level:u32} with {current:i64} XP into the level")]
fn player_level(world: &QuestWorld, level: u32, current: i64) -> Result<(), eyre::Report> {
    let progress = run_async(world.engine.level_progress()).wrap_err("read level progress")?;
    if (progress.level, progress.current_xp) != (level, current) {
        return Err(eyre::eyre!(
            "expected level {level} with {current} XP, found level {} with {} XP",
            progress.level,
            progress.current_xp
        ));
    }
    Ok(())
}

#[then("a level change from {from:u32} to {to:u32} was reported")]
fn level_change_reported(world: &QuestWorld, from: u32, to: u32) -> Result<(), eyre::Report> {
    let expected = LevelChange { from, to };
    if world.level_changes != [expected] {
        return Err(eyre::eyre!(
            "expected exactly {expected:?}, found {:?}",
            world.level_changes
        ));
    }
    Ok(())
}

#[then("the completion fails because nobody is signed in")]
fn completion_not_authenticated(world: &QuestWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_completion
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing completion result"))?;
    if !matches!(result, Err(QuestEngineError::NotAuthenticated)) {
        return Err(eyre::eyre!("expected NotAuthenticated, got {result:?}"));
    }
    Ok(())
}
