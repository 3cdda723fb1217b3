//! Integration test: full walkthroughs driven through key presses
//!
//! Runs the shell controller the way the terminal loop does, with a stub
//! task generator in place of the backend.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use demo_walkthrough::api::GenerateTasksRequest;
use demo_walkthrough::catalog::{Pillar, Task};
use demo_walkthrough::gate::{ScreenId, Variant};
use demo_walkthrough::progression::{GenerationOutcome, Modal, ProgressionStore, Visibility};
use demo_walkthrough::reveal::RevealPhase;
use demo_walkthrough::{App, TaskGenerator};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Records requests and answers with two tasks, one outside the diploma pillars.
#[derive(Default)]
struct RecordingGenerator {
    requests: Mutex<Vec<GenerateTasksRequest>>,
}

impl TaskGenerator for RecordingGenerator {
    fn generate(&self, request: &GenerateTasksRequest) -> GenerationOutcome {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }
        GenerationOutcome::Success {
            tasks: vec![
                Task::new("gen-pitch", "Pitch to a neighbor", Pillar::Communication, 60),
                Task::new("gen-lab", "Lab safety quiz", Pillar::Stem, 20),
            ],
            rate_limit_remaining: Some(4),
        }
    }
}

struct FailingGenerator;

impl TaskGenerator for FailingGenerator {
    fn generate(&self, _request: &GenerateTasksRequest) -> GenerationOutcome {
        GenerationOutcome::Failed("Too many requests. Try again in an hour.".to_string())
    }
}

fn press(app: &mut App, code: KeyCode) {
    app.handle_key(KeyEvent::new(code, KeyModifiers::NONE), 0);
}

fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
        press(app, KeyCode::Char(c));
    }
}

fn wait_for_generation(app: &mut App) {
    for _ in 0..400 {
        app.tick(0);
        if !app.is_generating() {
            return;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    panic!("generation never finished");
}

#[test]
fn test_explorer_walkthrough() {
    let mut store = ProgressionStore::new(Variant::explorer());
    store.set_learner_name("Jo");
    let mut app = App::new(store, Arc::new(RecordingGenerator::default()), 400, 0);

    press(&mut app, KeyCode::Enter);
    assert_eq!(app.mounted(), ScreenId::QuestSelect);
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.mounted(), ScreenId::TaskList);

    for _ in 0..4 {
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Down);
    }
    assert_eq!(app.store.state().total_xp(), 450);

    app.handle_key(KeyEvent::new(KeyCode::Right, KeyModifiers::NONE), 1_000);
    assert_eq!(app.mounted(), ScreenId::Diploma);
    app.tick(1_400);
    assert!(app.screens.diploma.is_revealed(RevealPhase::Seal));
    assert!(!app.screens.diploma.is_revealed(RevealPhase::Total));
    app.tick(5_000);
    assert!(app.screens.diploma.is_revealed(RevealPhase::Signature));
    assert_eq!(app.screens.diploma.diploma().map(|d| d.total_xp), Some(450));

    press(&mut app, KeyCode::Right);
    assert_eq!(app.mounted(), ScreenId::Pricing);
    assert!(!app.store.state().modals.is_open(Modal::DiplomaPreview));

    press(&mut app, KeyCode::Enter);
    assert!(app.store.state().modals.is_open(Modal::Pricing));
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.mounted(), ScreenId::Hero);
    assert_eq!(app.store.state().total_xp(), 0);
    // Configured name survives a restart
    assert_eq!(app.store.state().learner_name.as_deref(), Some("Jo"));
}

#[test]
fn test_accredited_walkthrough_with_generation() {
    let generator = Arc::new(RecordingGenerator::default());
    let mut app = App::new(
        ProgressionStore::new(Variant::accredited()),
        generator.clone(),
        400,
        0,
    );

    press(&mut app, KeyCode::Enter);
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.mounted(), ScreenId::InterestCapture);
    press(&mut app, KeyCode::Char(' '));
    press(&mut app, KeyCode::Tab);
    type_text(&mut app, "robots");
    press(&mut app, KeyCode::Tab);
    press(&mut app, KeyCode::Right);
    assert_eq!(app.mounted(), ScreenId::TaskGeneration);

    press(&mut app, KeyCode::Right);
    assert_eq!(app.mounted(), ScreenId::TaskGeneration);
    press(&mut app, KeyCode::Char('g'));
    wait_for_generation(&mut app);

    let requests = generator.requests.lock().unwrap().clone();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].quest_id, "startup-pitch");
    assert_eq!(requests[0].interests, vec!["Music"]);
    assert_eq!(requests[0].custom_input, "robots");

    let state = app.store.state();
    assert_eq!(state.generated_tasks.len(), 1);
    assert_eq!(state.generated_tasks[0].pillar, Pillar::Communication);
    assert_eq!(state.rate_limit_remaining, Some(4));

    press(&mut app, KeyCode::Right);
    assert_eq!(app.mounted(), ScreenId::SimulatedTasks);
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.store.state().xp_for(Pillar::Communication), 60);

    press(&mut app, KeyCode::Right);
    assert_eq!(app.mounted(), ScreenId::WorkSubmission);
    press(&mut app, KeyCode::Tab);
    type_text(&mut app, "pitch-video.mp4");
    press(&mut app, KeyCode::Enter);
    assert_eq!(
        app.store.state().visibility_of("startup-pitch", "gen-pitch"),
        Some(Visibility::Confidential)
    );

    press(&mut app, KeyCode::Right);
    assert_eq!(app.mounted(), ScreenId::Diploma);
    let diploma = app.screens.diploma.diploma().cloned().unwrap();
    assert!(diploma.is_accredited);
    assert_eq!(diploma.quests, vec!["Startup Pitch"]);
}

#[test]
fn test_failed_generation_surfaces_message() {
    let mut app = App::new(
        ProgressionStore::new(Variant::portfolio()),
        Arc::new(FailingGenerator),
        400,
        0,
    );
    press(&mut app, KeyCode::Enter);
    press(&mut app, KeyCode::Char(' '));
    press(&mut app, KeyCode::Right);
    press(&mut app, KeyCode::Enter);
    wait_for_generation(&mut app);

    let state = app.store.state();
    assert!(!state.is_generating_tasks);
    assert_eq!(
        state.generation_error.as_deref(),
        Some("Too many requests. Try again in an hour.")
    );
    press(&mut app, KeyCode::Right);
    assert_eq!(app.mounted(), ScreenId::TaskGeneration);
}
