//! The progression store: the only place demo state changes.
//!
//! Every action is a synchronous transition from the current state plus a
//! payload to the next state. Unknown quest or task ids are reported as
//! `ProgressionError` and leave the state untouched.

use super::state::{
    CompletedTask, Interaction, Modal, Persona, ProgressionState, SubmittedWork, Visibility,
};
use crate::catalog::{Pillar, Task};
use crate::gate::{self, Navigation, ScreenId, Variant};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Ceiling for multi-quest selection.
pub const MAX_SELECTED_QUESTS: usize = 4;

/// Learner name printed when none was entered.
pub const DEFAULT_LEARNER_NAME: &str = "Demo Learner";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProgressionError {
    #[error("unknown quest '{0}'")]
    UnknownQuest(String),
    #[error("unknown task '{task_id}' in quest '{quest_id}'")]
    UnknownTask { quest_id: String, task_id: String },
    #[error("no quest selected")]
    NoQuestSelected,
    #[error("no generated tasks for this session")]
    NoGeneratedTasks,
}

/// Result of `toggle_quest_selection`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionChange {
    Added,
    Removed,
    /// Ceiling reached; nothing changed
    Full,
}

/// Completion bonus paid when the last task of a quest is finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BonusAward {
    pub total: u32,
    pub per_pillar: u32,
    pub pillars: Vec<Pillar>,
    /// Lost to integer division
    pub dropped: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionOutcome {
    AlreadyCompleted,
    Completed {
        pillar: Pillar,
        xp: u32,
        bonus: Option<BonusAward>,
    },
}

/// What the task-generation call produced.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationOutcome {
    Success {
        tasks: Vec<Task>,
        rate_limit_remaining: Option<u32>,
    },
    Failed(String),
}

/// Snapshot of the learner's achievements. Derived, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diploma {
    pub name: String,
    pub persona: Option<Persona>,
    pub quests: Vec<String>,
    pub earned_xp: BTreeMap<Pillar, u32>,
    pub total_xp: u32,
    pub timestamp: i64,
    pub is_accredited: bool,
    pub session_id: Uuid,
}

fn system_clock() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Owns the session state for one variant.
#[derive(Debug, Clone)]
pub struct ProgressionStore {
    variant: Variant,
    state: ProgressionState,
    clock: fn() -> i64,
}

impl ProgressionStore {
    pub fn new(variant: Variant) -> Self {
        Self::with_clock(variant, system_clock)
    }

    /// Store with an injected millisecond clock.
    pub fn with_clock(variant: Variant, clock: fn() -> i64) -> Self {
        Self {
            variant,
            state: ProgressionState::new(),
            clock,
        }
    }

    pub fn variant(&self) -> &Variant {
        &self.variant
    }

    pub fn state(&self) -> &ProgressionState {
        &self.state
    }

    pub fn screen(&self) -> ScreenId {
        gate::screen_for(&self.variant, self.state.current_step)
    }

    pub fn navigation(&self) -> Navigation {
        gate::navigation(&self.variant, &self.state)
    }

    fn now(&self) -> i64 {
        (self.clock)()
    }

    /// Sets the persona and moves to step 1. Calling it again re-sets step 1.
    pub fn select_persona(&mut self, persona: Persona) {
        info!(persona = persona.name(), "persona selected");
        self.state.persona = Some(persona);
        self.state.current_step = 1usize.min(self.variant.max_step());
        self.state.session_started_at = Some(self.now());
    }

    pub fn set_learner_name(&mut self, name: &str) {
        let trimmed = name.trim();
        self.state.learner_name = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
    }

    /// Selects a catalog quest and jumps to the variant's task step.
    pub fn select_quest(&mut self, quest_id: &str) -> Result<(), ProgressionError> {
        let quest = match self.variant.catalog().get(quest_id) {
            Some(q) => q.clone(),
            None => {
                warn!(quest_id, "select_quest: unknown quest");
                return Err(ProgressionError::UnknownQuest(quest_id.to_string()));
            }
        };
        debug!(quest_id, "quest selected");
        self.state.selected_quest = Some(quest);
        self.state.current_step = self.variant.quest_selected_step();
        Ok(())
    }

    /// Adds or removes a quest from the multi-selection.
    pub fn toggle_quest_selection(
        &mut self,
        quest_id: &str,
    ) -> Result<SelectionChange, ProgressionError> {
        if let Some(pos) = self
            .state
            .selected_quests
            .iter()
            .position(|q| q.id == quest_id)
        {
            self.state.selected_quests.remove(pos);
            return Ok(SelectionChange::Removed);
        }

        let quest = self
            .variant
            .catalog()
            .get(quest_id)
            .cloned()
            .ok_or_else(|| ProgressionError::UnknownQuest(quest_id.to_string()))?;

        if self.state.selected_quests.len() >= MAX_SELECTED_QUESTS {
            return Ok(SelectionChange::Full);
        }
        self.state.selected_quests.push(quest);
        Ok(SelectionChange::Added)
    }

    /// Completes a task of the selected quest and credits its XP. Finishing
    /// the last task also pays the quest's completion bonus.
    pub fn complete_task(
        &mut self,
        task_id: &str,
        evidence: &str,
    ) -> Result<CompletionOutcome, ProgressionError> {
        let quest = self
            .state
            .selected_quest
            .clone()
            .ok_or(ProgressionError::NoQuestSelected)?;
        let task = quest
            .task(task_id)
            .cloned()
            .ok_or_else(|| ProgressionError::UnknownTask {
                quest_id: quest.id.clone(),
                task_id: task_id.to_string(),
            })?;

        if self.state.is_task_completed(&quest.id, &task.id) {
            return Ok(CompletionOutcome::AlreadyCompleted);
        }

        self.record_completion(&quest.id, &task, evidence);

        let mut bonus = None;
        if self.state.is_quest_complete(&quest) && !self.state.awarded_bonuses.contains(&quest.id)
        {
            let pillars = quest.distinct_pillars();
            let per_pillar = quest.bonus_share();
            for pillar in &pillars {
                *self.state.earned_xp.entry(*pillar).or_insert(0) += per_pillar;
            }
            let total = quest.completion_bonus();
            let award = BonusAward {
                total,
                per_pillar,
                dropped: total - per_pillar * pillars.len() as u32,
                pillars,
            };
            info!(quest_id = %quest.id, total, dropped = award.dropped, "quest completed");
            self.state.awarded_bonuses.insert(quest.id.clone());
            bonus = Some(award);
        }

        Ok(CompletionOutcome::Completed {
            pillar: task.pillar,
            xp: task.xp,
            bonus,
        })
    }

    /// Completes one of the generated tasks. Credits its XP; no bonus.
    pub fn complete_simulated_task(
        &mut self,
        task_id: &str,
        evidence: &str,
    ) -> Result<CompletionOutcome, ProgressionError> {
        if self.state.generated_tasks.is_empty() {
            return Err(ProgressionError::NoGeneratedTasks);
        }
        let quest_id = self.state.generated_for.clone().unwrap_or_default();
        let task = self
            .state
            .generated_tasks
            .iter()
            .find(|t| t.id == task_id)
            .cloned()
            .ok_or_else(|| ProgressionError::UnknownTask {
                quest_id: quest_id.clone(),
                task_id: task_id.to_string(),
            })?;

        if self.state.is_task_completed(&quest_id, &task.id) {
            return Ok(CompletionOutcome::AlreadyCompleted);
        }
        self.record_completion(&quest_id, &task, evidence);
        Ok(CompletionOutcome::Completed {
            pillar: task.pillar,
            xp: task.xp,
            bonus: None,
        })
    }

    fn record_completion(&mut self, quest_id: &str, task: &Task, evidence: &str) {
        debug!(quest_id, task_id = %task.id, xp = task.xp, "task completed");
        let timestamp = self.now();
        self.state.completed_tasks.push(CompletedTask {
            quest_id: quest_id.to_string(),
            task_id: task.id.clone(),
            evidence: evidence.to_string(),
            timestamp,
        });
        *self.state.earned_xp.entry(task.pillar).or_insert(0) += task.xp;
    }

    /// Records submitted work and its visibility. Grants no XP.
    pub fn submit_work(
        &mut self,
        quest_id: &str,
        task_id: &str,
        work: &str,
        visibility: Visibility,
    ) -> Result<(), ProgressionError> {
        let quest = self
            .variant
            .catalog()
            .get(quest_id)
            .ok_or_else(|| ProgressionError::UnknownQuest(quest_id.to_string()))?;
        let generated = self.state.generated_for.as_deref() == Some(quest_id)
            && self.state.generated_tasks.iter().any(|t| t.id == task_id);
        if quest.task(task_id).is_none() && !generated {
            return Err(ProgressionError::UnknownTask {
                quest_id: quest_id.to_string(),
                task_id: task_id.to_string(),
            });
        }

        let timestamp = self.now();
        self.state.submitted_work.push(SubmittedWork {
            quest_id: quest_id.to_string(),
            task_id: task_id.to_string(),
            work: work.to_string(),
            visibility,
            timestamp,
        });
        self.state
            .work_visibility
            .entry(quest_id.to_string())
            .or_default()
            .insert(task_id.to_string(), visibility);
        Ok(())
    }

    /// Marks a generation request as in flight for `quest_id`. Tasks from
    /// an earlier request are discarded.
    pub fn begin_task_generation(&mut self, quest_id: &str) -> Result<(), ProgressionError> {
        if !self.variant.catalog().contains(quest_id) {
            return Err(ProgressionError::UnknownQuest(quest_id.to_string()));
        }
        self.state.is_generating_tasks = true;
        self.state.generation_error = None;
        self.state.generated_tasks.clear();
        self.state.generated_for = Some(quest_id.to_string());
        Ok(())
    }

    /// Applies the result of a generation request. Results addressed to a
    /// previous session, or arriving when nothing is pending, are dropped.
    pub fn finish_task_generation(&mut self, session_id: Uuid, outcome: GenerationOutcome) -> bool {
        if session_id != self.state.session_id || !self.state.is_generating_tasks {
            debug!("discarding stale task generation result");
            return false;
        }
        self.state.is_generating_tasks = false;
        match outcome {
            GenerationOutcome::Success {
                mut tasks,
                rate_limit_remaining,
            } => {
                let pillar_set = self.variant.pillar_set();
                let before = tasks.len();
                tasks.retain(|t| pillar_set.contains(t.pillar));
                if tasks.len() != before {
                    warn!(dropped = before - tasks.len(), "generated tasks outside pillar set");
                }
                info!(count = tasks.len(), "tasks generated");
                self.state.generated_tasks = tasks;
                self.state.rate_limit_remaining = rate_limit_remaining;
                self.state.generation_error = None;
            }
            GenerationOutcome::Failed(message) => {
                warn!(%message, "task generation failed");
                self.state.generation_error = Some(message);
            }
        }
        true
    }

    /// Builds a diploma from the current state without changing it.
    pub fn generate_diploma(&self) -> Diploma {
        let state = &self.state;
        Diploma {
            name: state
                .learner_name
                .clone()
                .unwrap_or_else(|| DEFAULT_LEARNER_NAME.to_string()),
            persona: state.persona,
            quests: state
                .diploma_quests()
                .into_iter()
                .map(|q| q.title.clone())
                .collect(),
            earned_xp: state.earned_xp.clone(),
            total_xp: state.total_xp(),
            timestamp: self.now(),
            is_accredited: self.variant.is_accredited(),
            session_id: state.session_id,
        }
    }

    pub fn next_step(&mut self) -> usize {
        self.state.current_step = (self.state.current_step + 1).min(self.variant.max_step());
        self.state.current_step
    }

    pub fn previous_step(&mut self) -> usize {
        self.state.current_step = self
            .state
            .current_step
            .saturating_sub(1)
            .min(self.variant.max_step());
        self.state.current_step
    }

    /// Discards the session and starts over from the initial state.
    pub fn reset_demo(&mut self) {
        info!(session = %self.state.session_id, "demo reset");
        self.state = ProgressionState::new();
    }

    pub fn track_interaction(&mut self, action: &str, data: serde_json::Value) {
        let timestamp = self.now();
        let step = self.state.current_step;
        self.state.interactions.push(Interaction {
            action: action.to_string(),
            data,
            timestamp,
            step,
        });
    }

    pub fn open_modal(&mut self, modal: Modal) {
        self.state.modals.set(modal, true);
    }

    pub fn close_modal(&mut self, modal: Modal) {
        self.state.modals.set(modal, false);
    }
}
