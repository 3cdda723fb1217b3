//! Event-loop controller: routes keys to the active screen, applies the
//! shell's global keys, and runs task generation off the UI thread.

use crate::api::{generation_outcome, ApiClient, GenerateTasksRequest};
use crate::gate::ScreenId;
use crate::progression::{GenerationOutcome, ProgressionStore};
use crate::ui::{ScreenOutcome, Screens};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde_json::json;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Produces tasks for a generation request. Runs on a worker thread.
pub trait TaskGenerator: Send + Sync {
    fn generate(&self, request: &GenerateTasksRequest) -> GenerationOutcome;
}

impl TaskGenerator for ApiClient {
    fn generate(&self, request: &GenerateTasksRequest) -> GenerationOutcome {
        generation_outcome(self.generate_tasks(request))
    }
}

type PendingGeneration = Receiver<(Uuid, GenerationOutcome)>;

pub struct App {
    pub store: ProgressionStore,
    pub screens: Screens,
    generator: Arc<dyn TaskGenerator>,
    pending: Option<PendingGeneration>,
    mounted: ScreenId,
    reveal_interval_ms: u64,
    learner_name: Option<String>,
    pub should_quit: bool,
}

impl App {
    pub fn new(
        store: ProgressionStore,
        generator: Arc<dyn TaskGenerator>,
        reveal_interval_ms: u64,
        now_ms: u64,
    ) -> Self {
        let learner_name = store.state().learner_name.clone();
        let mut app = Self {
            mounted: store.screen(),
            store,
            screens: Screens::new(),
            generator,
            pending: None,
            reveal_interval_ms,
            learner_name,
            should_quit: false,
        };
        app.screens
            .mount(app.mounted, now_ms, reveal_interval_ms, &mut app.store);
        app
    }

    pub fn mounted(&self) -> ScreenId {
        self.mounted
    }

    pub fn is_generating(&self) -> bool {
        self.pending.is_some()
    }

    pub fn handle_key(&mut self, key: KeyEvent, now_ms: u64) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') => self.should_quit = true,
                KeyCode::Char('r') => self.restart(now_ms),
                _ => {}
            }
            return;
        }

        let screen = self.store.screen();
        match self.screens.handle_key(screen, key.code, &mut self.store) {
            ScreenOutcome::Handled => {}
            ScreenOutcome::Generate(request) => self.start_generation(request),
            ScreenOutcome::Restart => self.restart(now_ms),
            ScreenOutcome::Ignored => self.handle_global_key(key.code, now_ms),
        }
        self.sync_mount(now_ms);
    }

    fn handle_global_key(&mut self, code: KeyCode, now_ms: u64) {
        let nav = self.store.navigation();
        match code {
            KeyCode::Left if nav.can_go_back => {
                let step = self.store.previous_step();
                self.store.track_interaction("back", json!({ "to": step }));
            }
            KeyCode::Right if nav.can_go_forward => {
                let step = self.store.next_step();
                self.store.track_interaction("continue", json!({ "to": step }));
            }
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('r') => self.restart(now_ms),
            _ => {}
        }
    }

    /// Advances timers and applies a finished generation, if any.
    pub fn tick(&mut self, now_ms: u64) {
        if let Some(rx) = &self.pending {
            let received = match rx.try_recv() {
                Ok((session_id, outcome)) => Some((session_id, outcome)),
                Err(TryRecvError::Empty) => None,
                Err(TryRecvError::Disconnected) => Some((
                    self.store.state().session_id,
                    GenerationOutcome::Failed("Task generation stopped unexpectedly".to_string()),
                )),
            };
            if let Some((session_id, outcome)) = received {
                self.pending = None;
                self.store.finish_task_generation(session_id, outcome);
            }
        }
        self.screens.tick(now_ms);
        self.sync_mount(now_ms);
    }

    /// Remounts screens when the store moved to a different one.
    fn sync_mount(&mut self, now_ms: u64) {
        let current = self.store.screen();
        if current == self.mounted {
            return;
        }
        debug!(from = ?self.mounted, to = ?current, "screen change");
        self.screens.unmount(self.mounted, &mut self.store);
        self.mounted = current;
        self.screens
            .mount(current, now_ms, self.reveal_interval_ms, &mut self.store);
    }

    fn start_generation(&mut self, request: GenerateTasksRequest) {
        if let Err(e) = self.store.begin_task_generation(&request.quest_id) {
            warn!(error = %e, "cannot start task generation");
            return;
        }
        self.store.track_interaction(
            "generate_tasks",
            json!({ "quest_id": request.quest_id, "interests": request.interests }),
        );
        let session_id = self.store.state().session_id;
        let generator = Arc::clone(&self.generator);
        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || {
            let outcome = generator.generate(&request);
            // Receiver is gone if the demo restarted meanwhile
            let _ = tx.send((session_id, outcome));
        });
        self.pending = Some(rx);
    }

    /// Starts the demo over. An in-flight generation is abandoned.
    pub fn restart(&mut self, now_ms: u64) {
        info!("restarting demo");
        self.screens.unmount(self.mounted, &mut self.store);
        self.pending = None;
        self.store.reset_demo();
        if let Some(name) = &self.learner_name {
            self.store.set_learner_name(name);
        }
        self.screens = Screens::new();
        self.mounted = self.store.screen();
        self.screens
            .mount(self.mounted, now_ms, self.reveal_interval_ms, &mut self.store);
    }
}
