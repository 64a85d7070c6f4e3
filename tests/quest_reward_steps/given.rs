//! Given steps for quest reward BDD scenarios.

use super::world::{QuestWorld, run_async};
use focusquest::identity::domain::OwnerId;
use focusquest::task::{
    domain::{Difficulty, Priority},
    services::CreateTaskRequest,
};
use eyre::WrapErr;
use rstest_bdd_macros::given;

fn create_quest(
    world: &mut QuestWorld,
    title: String,
    difficulty: &str,
    priority: &str,
) -> Result<(), eyre::Report> {
    let request = CreateTaskRequest::new(title.clone(), "scenario quest")
        .with_difficulty(Difficulty::try_from(difficulty)?)
        .with_priority(Priority::try_from(priority)?);
    let created = run_async(world.engine.create(request)).wrap_err("create scenario quest")?;
    world.quests.insert(title, created.id());
    Ok(())
}

#[given(r#"a signed-in player "{name}""#)]
fn signed_in_player(world: &mut QuestWorld, name: String) -> Result<(), eyre::Report> {
    world.identity.sign_in(OwnerId::new(name)?);
    Ok(())
}

#[given(r#"a "{difficulty}" difficulty "{priority}" priority quest titled "{title}""#)]
fn quest_titled(
    world: &mut QuestWorld,
    difficulty: String,
    priority: String,
    title: String,
) -> Result<(), eyre::Report> {
    create_quest(world, title, &difficulty, &priority)
}

#[given(r#"{count:u32} "{difficulty}" difficulty "{priority}" priority quests"#)]
fn several_quests(
    world: &mut QuestWorld,
    count: u32,
    difficulty: String,
    priority: String,
) -> Result<(), eyre::Report> {
    for index in 0..count {
        create_quest(world, format!("quest {index}"), &difficulty, &priority)?;
    }
    Ok(())
}
