//! When steps for quest reward BDD scenarios.

use super::world::{QuestWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::when;

#[when(r#"the player completes the quest "{title}""#)]
fn complete_quest(world: &mut QuestWorld, title: String) -> Result<(), eyre::Report> {
    let id = world.quest(&title)?;
    let result = run_async(world.engine.toggle_complete(id));
    if let Ok(ref outcome) = result {
        world
            .level_changes
            .extend(outcome.award.and_then(|award| award.level_change));
    }
    world.last_completion = Some(result);
    Ok(())
}

#[when(r#"the player toggles the quest "{title}" {times:u32} times"#)]
fn toggle_quest_repeatedly(
    world: &mut QuestWorld,
    title: String,
    times: u32,
) -> Result<(), eyre::Report> {
    let id = world.quest(&title)?;
    for _ in 0..times {
        run_async(world.engine.toggle_complete(id)).wrap_err("toggle scenario quest")?;
    }
    Ok(())
}

#[when("the player completes every quest")]
fn complete_every_quest(world: &mut QuestWorld) -> Result<(), eyre::Report> {
    let ids: Vec<_> = world.quests.values().copied().collect();
    for id in ids {
        let outcome =
            run_async(world.engine.toggle_complete(id)).wrap_err("complete scenario quest")?;
        world
            .level_changes
            .extend(outcome.award.and_then(|award| award.level_change));
    }
    Ok(())
}

#[when("the player signs out")]
fn player_signs_out(world: &mut QuestWorld) {
    world.identity.sign_out();
}
