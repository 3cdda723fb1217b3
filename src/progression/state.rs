//! Demo session state.

use crate::catalog::{Pillar, Quest, Task};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;

/// Who is taking the demo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Persona {
    Parent,
    Student,
}

impl Persona {
    pub fn name(&self) -> &'static str {
        match self {
            Persona::Parent => "Parent",
            Persona::Student => "Student",
        }
    }
}

/// Whether submitted work may be shown on a public portfolio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    #[default]
    Public,
    Confidential,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedTask {
    pub quest_id: String,
    pub task_id: String,
    pub evidence: String,
    /// Unix millis
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmittedWork {
    pub quest_id: String,
    pub task_id: String,
    pub work: String,
    pub visibility: Visibility,
    pub timestamp: i64,
}

/// Analytics trail entry. Never consulted for navigation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    pub action: String,
    pub data: serde_json::Value,
    pub timestamp: i64,
    pub step: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modal {
    Pricing,
    DiplomaPreview,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ModalFlags {
    pub pricing: bool,
    pub diploma_preview: bool,
}

impl ModalFlags {
    pub fn is_open(&self, modal: Modal) -> bool {
        match modal {
            Modal::Pricing => self.pricing,
            Modal::DiplomaPreview => self.diploma_preview,
        }
    }

    pub(crate) fn set(&mut self, modal: Modal, open: bool) {
        match modal {
            Modal::Pricing => self.pricing = open,
            Modal::DiplomaPreview => self.diploma_preview = open,
        }
    }
}

/// Everything a demo session accumulates. Owned by `ProgressionStore`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressionState {
    pub session_id: Uuid,
    pub session_started_at: Option<i64>,
    pub current_step: usize,
    pub persona: Option<Persona>,
    pub learner_name: Option<String>,
    pub selected_quest: Option<Quest>,
    pub selected_quests: Vec<Quest>,
    pub completed_tasks: Vec<CompletedTask>,
    pub earned_xp: BTreeMap<Pillar, u32>,
    /// Quests whose completion bonus has been paid this pass
    pub awarded_bonuses: BTreeSet<String>,
    pub submitted_work: Vec<SubmittedWork>,
    pub work_visibility: BTreeMap<String, BTreeMap<String, Visibility>>,
    /// Quest the generated tasks belong to
    pub generated_for: Option<String>,
    pub generated_tasks: Vec<Task>,
    pub is_generating_tasks: bool,
    pub generation_error: Option<String>,
    pub rate_limit_remaining: Option<u32>,
    pub modals: ModalFlags,
    pub interactions: Vec<Interaction>,
}

impl Default for ProgressionState {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressionState {
    /// Fresh session: step 0, nothing selected, no XP.
    pub fn new() -> Self {
        Self {
            session_id: Uuid::new_v4(),
            session_started_at: None,
            current_step: 0,
            persona: None,
            learner_name: None,
            selected_quest: None,
            selected_quests: Vec::new(),
            completed_tasks: Vec::new(),
            earned_xp: BTreeMap::new(),
            awarded_bonuses: BTreeSet::new(),
            submitted_work: Vec::new(),
            work_visibility: BTreeMap::new(),
            generated_for: None,
            generated_tasks: Vec::new(),
            is_generating_tasks: false,
            generation_error: None,
            rate_limit_remaining: None,
            modals: ModalFlags::default(),
            interactions: Vec::new(),
        }
    }

    pub fn is_task_completed(&self, quest_id: &str, task_id: &str) -> bool {
        self.completed_tasks
            .iter()
            .any(|c| c.quest_id == quest_id && c.task_id == task_id)
    }

    /// True when every task of `quest` has a completion record.
    pub fn is_quest_complete(&self, quest: &Quest) -> bool {
        !quest.tasks.is_empty()
            && quest
                .tasks
                .iter()
                .all(|t| self.is_task_completed(&quest.id, &t.id))
    }

    pub fn xp_for(&self, pillar: Pillar) -> u32 {
        self.earned_xp.get(&pillar).copied().unwrap_or(0)
    }

    pub fn total_xp(&self) -> u32 {
        self.earned_xp.values().sum()
    }

    pub fn is_quest_selected(&self, quest_id: &str) -> bool {
        self.selected_quests.iter().any(|q| q.id == quest_id)
    }

    pub fn visibility_of(&self, quest_id: &str, task_id: &str) -> Option<Visibility> {
        self.work_visibility
            .get(quest_id)
            .and_then(|tasks| tasks.get(task_id))
            .copied()
    }

    /// Quests shown on the diploma: the single selection, else the multi-selection.
    pub fn diploma_quests(&self) -> Vec<&Quest> {
        match &self.selected_quest {
            Some(q) => vec![q],
            None => self.selected_quests.iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_empty() {
        let state = ProgressionState::new();
        assert_eq!(state.current_step, 0);
        assert!(state.persona.is_none());
        assert!(state.selected_quest.is_none());
        assert!(state.completed_tasks.is_empty());
        assert_eq!(state.total_xp(), 0);
        assert!(!state.modals.pricing);
    }

    #[test]
    fn test_sessions_get_distinct_ids() {
        assert_ne!(ProgressionState::new().session_id, ProgressionState::new().session_id);
    }

    #[test]
    fn test_modal_flags() {
        let mut flags = ModalFlags::default();
        flags.set(Modal::Pricing, true);
        assert!(flags.is_open(Modal::Pricing));
        assert!(!flags.is_open(Modal::DiplomaPreview));
    }

    #[test]
    fn test_visibility_lookup_missing() {
        let state = ProgressionState::new();
        assert_eq!(state.visibility_of("q", "t"), None);
    }
}
