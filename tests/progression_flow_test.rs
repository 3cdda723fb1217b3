//! Integration test: progression store end to end
//!
//! Drives the store through whole walkthroughs: XP and completion bonuses,
//! the gate jump on quest selection, unknown ids, diploma snapshots and
//! restarting the demo.

use demo_walkthrough::catalog::{core_catalog, Pillar};
use demo_walkthrough::gate::{ScreenId, Variant};
use demo_walkthrough::progression::{
    CompletionOutcome, Persona, ProgressionError, ProgressionState, ProgressionStore,
};
use serde_json::json;

fn fixed_clock() -> i64 {
    1_767_225_600_000
}

fn complete_all(store: &mut ProgressionStore) -> Vec<CompletionOutcome> {
    let task_ids: Vec<String> = store
        .state()
        .selected_quest
        .as_ref()
        .map(|q| q.tasks.iter().map(|t| t.id.clone()).collect())
        .unwrap_or_default();
    task_ids
        .iter()
        .map(|id| store.complete_task(id, "done").unwrap())
        .collect()
}

#[test]
fn test_music_composition_end_to_end() {
    let mut store = ProgressionStore::with_clock(Variant::explorer(), fixed_clock);
    store.select_persona(Persona::Student);
    store.set_learner_name("Sam Rivera");
    store.select_quest("music-composition").unwrap();
    assert_eq!(store.screen(), ScreenId::TaskList);

    let outcomes = complete_all(&mut store);
    assert_eq!(outcomes.len(), 4);
    let bonus = match outcomes.last() {
        Some(CompletionOutcome::Completed { bonus: Some(b), .. }) => b.clone(),
        other => panic!("expected bonus on last task, got {:?}", other),
    };
    assert_eq!(bonus.total, 150);
    assert_eq!(bonus.per_pillar, 50);
    assert_eq!(bonus.dropped, 0);

    let state = store.state();
    assert_eq!(state.xp_for(Pillar::Stem), 175);
    assert_eq!(state.xp_for(Pillar::Art), 150);
    assert_eq!(state.xp_for(Pillar::Communication), 125);
    assert_eq!(state.total_xp(), 450);

    assert!(store.navigation().can_go_forward);
    store.next_step();
    assert_eq!(store.screen(), ScreenId::Diploma);

    let diploma = store.generate_diploma();
    assert_eq!(diploma.name, "Sam Rivera");
    assert_eq!(diploma.quests, vec!["Music Composition"]);
    assert_eq!(diploma.total_xp, 450);
    assert_eq!(diploma.timestamp, fixed_clock());
    assert!(!diploma.is_accredited);
}

#[test]
fn test_bonus_remainder_is_dropped() {
    let mut store = ProgressionStore::new(Variant::explorer());
    store.select_quest("family-recipes").unwrap();
    complete_all(&mut store);

    // 250 XP of tasks, bonus 125 split over three pillars
    let state = store.state();
    assert_eq!(state.total_xp(), 250 + 41 * 3);
    assert_eq!(state.xp_for(Pillar::Wellness), 80 + 41);
}

#[test]
fn test_completing_twice_pays_once() {
    let mut store = ProgressionStore::new(Variant::explorer());
    store.select_quest("music-composition").unwrap();
    complete_all(&mut store);
    let total = store.state().total_xp();

    assert_eq!(
        store.complete_task("mc-rhythm", "again").unwrap(),
        CompletionOutcome::AlreadyCompleted
    );
    assert_eq!(store.state().total_xp(), total);
    assert_eq!(store.state().completed_tasks.len(), 4);
}

#[test]
fn test_family_recipes_gate_jump() {
    let mut store = ProgressionStore::new(Variant::guided());
    store.select_persona(Persona::Parent);
    assert_eq!(store.state().current_step, 1);
    assert!(!store.navigation().can_go_forward);

    store.select_quest("family-recipes").unwrap();
    assert_eq!(store.state().current_step, 3);
    assert_eq!(store.screen(), ScreenId::TaskList);
    // Guided tour wants every task done before moving on
    assert!(!store.navigation().can_go_forward);
    store.complete_task("fr-interview", "notes").unwrap();
    assert!(!store.navigation().can_go_forward);
    complete_all(&mut store);
    assert!(store.navigation().can_go_forward);
}

#[test]
fn test_unknown_quest_leaves_state_untouched() {
    let mut store = ProgressionStore::new(Variant::guided());
    store.select_persona(Persona::Student);
    let before = store.state().clone();

    assert_eq!(
        store.select_quest("underwater-basket-weaving"),
        Err(ProgressionError::UnknownQuest(
            "underwater-basket-weaving".to_string()
        ))
    );
    assert!(store.toggle_quest_selection("nope").is_err());
    assert!(store.submit_work("nope", "t", "w", Default::default()).is_err());
    assert_eq!(store.state(), &before);
}

#[test]
fn test_unknown_task_leaves_state_untouched() {
    let mut store = ProgressionStore::new(Variant::explorer());
    assert_eq!(
        store.complete_task("mc-rhythm", "x"),
        Err(ProgressionError::NoQuestSelected)
    );
    store.select_quest("music-composition").unwrap();
    let before = store.state().clone();
    assert!(matches!(
        store.complete_task("fr-cook", "x"),
        Err(ProgressionError::UnknownTask { .. })
    ));
    assert_eq!(store.state(), &before);
}

#[test]
fn test_diploma_generation_is_idempotent() {
    let mut store = ProgressionStore::with_clock(Variant::explorer(), fixed_clock);
    store.select_quest("music-composition").unwrap();
    store.complete_task("mc-melody", "hum").unwrap();

    let before = store.state().clone();
    let first = store.generate_diploma();
    let second = store.generate_diploma();
    assert_eq!(first, second);
    assert_eq!(store.state(), &before);
}

#[test]
fn test_reset_matches_fresh_state() {
    let mut store = ProgressionStore::new(Variant::explorer());
    let first_session = store.state().session_id;
    store.select_persona(Persona::Parent);
    store.select_quest("music-composition").unwrap();
    complete_all(&mut store);
    store.track_interaction("continue", json!({}));

    store.reset_demo();
    let state = store.state();
    assert_ne!(state.session_id, first_session);

    let mut fresh = ProgressionState::new();
    fresh.session_id = state.session_id;
    assert_eq!(state, &fresh);
    assert_eq!(store.screen(), ScreenId::Hero);
}

#[test]
fn test_every_core_quest_completes_with_bonus() {
    for quest in core_catalog().quests() {
        let mut store = ProgressionStore::new(Variant::explorer());
        store.select_quest(&quest.id).unwrap();
        complete_all(&mut store);
        let expected = quest.total_xp + quest.bonus_share() * quest.distinct_pillars().len() as u32;
        assert_eq!(store.state().total_xp(), expected, "quest {}", quest.id);
        assert!(store.state().awarded_bonuses.contains(&quest.id));
    }
}
