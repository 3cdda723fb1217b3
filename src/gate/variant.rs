//! Demo variant definitions.
//!
//! A variant is the full description of one walkthrough flow: its ordered
//! screens, the rule guarding the Continue button on each screen, the quest
//! catalog it draws from and how quests are picked. The built-in flows are
//! `explorer` (5 steps), `guided` (6), `portfolio` (7) and `accredited` (8).
//! Extra flows can be loaded from JSON as `VariantSpec`s.

use crate::catalog::{catalog_for, PillarSet, QuestCatalog};
use crate::progression::ProgressionState;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Screens a walkthrough can mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreenId {
    /// Intro + persona choice
    Hero,
    QuestSelect,
    QuestMultiSelect,
    InterestCapture,
    TaskGeneration,
    TaskList,
    SimulatedTasks,
    WorkSubmission,
    Diploma,
    Pricing,
}

impl ScreenId {
    pub fn title(&self) -> &'static str {
        match self {
            ScreenId::Hero => "Welcome",
            ScreenId::QuestSelect => "Choose a Quest",
            ScreenId::QuestMultiSelect => "Build Your Quest Lineup",
            ScreenId::InterestCapture => "Tell Us About Your Interests",
            ScreenId::TaskGeneration => "Personalized Tasks",
            ScreenId::TaskList => "Complete Your Tasks",
            ScreenId::SimulatedTasks => "Try Your Tasks",
            ScreenId::WorkSubmission => "Submit Your Work",
            ScreenId::Diploma => "Your Diploma",
            ScreenId::Pricing => "Plans & Pricing",
        }
    }
}

/// Condition that must hold before Continue is enabled on a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForwardRule {
    Always,
    Never,
    QuestSelected,
    AnyQuestSelected,
    TasksGenerated,
    AnyTaskCompleted,
    AllTasksCompleted,
    WorkSubmitted,
}

impl ForwardRule {
    pub fn allows(&self, state: &ProgressionState) -> bool {
        match self {
            ForwardRule::Always => true,
            ForwardRule::Never => false,
            ForwardRule::QuestSelected => state.selected_quest.is_some(),
            ForwardRule::AnyQuestSelected => !state.selected_quests.is_empty(),
            ForwardRule::TasksGenerated => {
                !state.is_generating_tasks && !state.generated_tasks.is_empty()
            }
            ForwardRule::AnyTaskCompleted => !state.completed_tasks.is_empty(),
            ForwardRule::AllTasksCompleted => state
                .selected_quest
                .as_ref()
                .is_some_and(|q| state.is_quest_complete(q)),
            ForwardRule::WorkSubmitted => !state.submitted_work.is_empty(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepDef {
    pub screen: ScreenId,
    pub forward: ForwardRule,
}

impl StepDef {
    pub const fn new(screen: ScreenId, forward: ForwardRule) -> Self {
        Self { screen, forward }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    Single,
    /// Up to `MAX_SELECTED_QUESTS`
    Multi,
}

/// Serializable description of a variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantSpec {
    pub id: String,
    pub name: String,
    pub pillar_set: PillarSet,
    pub selection: SelectionMode,
    /// Step `select_quest` jumps to
    pub quest_selected_step: usize,
    #[serde(default)]
    pub accredited: bool,
    pub steps: Vec<StepDef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VariantError {
    #[error("variant '{0}' has no steps")]
    NoSteps(String),
    #[error("variant '{id}' jumps to step {step} but only has {len} steps")]
    JumpOutOfRange { id: String, step: usize, len: usize },
    #[error("unknown variant '{0}'")]
    Unknown(String),
}

/// A validated walkthrough flow with its catalog loaded.
#[derive(Debug, Clone)]
pub struct Variant {
    spec: VariantSpec,
    catalog: QuestCatalog,
}

impl Variant {
    pub fn from_spec(spec: VariantSpec) -> Result<Self, VariantError> {
        if spec.steps.is_empty() {
            return Err(VariantError::NoSteps(spec.id));
        }
        if spec.quest_selected_step >= spec.steps.len() {
            return Err(VariantError::JumpOutOfRange {
                id: spec.id.clone(),
                step: spec.quest_selected_step,
                len: spec.steps.len(),
            });
        }
        let catalog = catalog_for(spec.pillar_set);
        Ok(Self { spec, catalog })
    }

    pub fn id(&self) -> &str {
        &self.spec.id
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    pub fn spec(&self) -> &VariantSpec {
        &self.spec
    }

    pub fn catalog(&self) -> &QuestCatalog {
        &self.catalog
    }

    pub fn pillar_set(&self) -> PillarSet {
        self.spec.pillar_set
    }

    pub fn selection(&self) -> SelectionMode {
        self.spec.selection
    }

    pub fn is_accredited(&self) -> bool {
        self.spec.accredited
    }

    pub fn steps(&self) -> &[StepDef] {
        &self.spec.steps
    }

    /// Index of the terminal step.
    pub fn max_step(&self) -> usize {
        self.spec.steps.len() - 1
    }

    pub fn quest_selected_step(&self) -> usize {
        self.spec.quest_selected_step
    }

    pub fn explorer() -> Self {
        builtin(explorer_spec())
    }

    pub fn guided() -> Self {
        builtin(guided_spec())
    }

    pub fn portfolio() -> Self {
        builtin(portfolio_spec())
    }

    pub fn accredited() -> Self {
        builtin(accredited_spec())
    }

    pub fn builtin_ids() -> &'static [&'static str] {
        &["explorer", "guided", "portfolio", "accredited"]
    }

    /// Looks up a built-in variant, then any extra specs, by id.
    pub fn by_id(id: &str, extra: &[VariantSpec]) -> Result<Self, VariantError> {
        match id {
            "explorer" => Ok(Self::explorer()),
            "guided" => Ok(Self::guided()),
            "portfolio" => Ok(Self::portfolio()),
            "accredited" => Ok(Self::accredited()),
            other => extra
                .iter()
                .find(|s| s.id == other)
                .cloned()
                .ok_or_else(|| VariantError::Unknown(other.to_string()))
                .and_then(Self::from_spec),
        }
    }
}

fn builtin(spec: VariantSpec) -> Variant {
    Variant::from_spec(spec).expect("built-in variant is valid")
}

use ForwardRule as F;
use ScreenId as S;

fn explorer_spec() -> VariantSpec {
    VariantSpec {
        id: "explorer".into(),
        name: "Explorer".into(),
        pillar_set: PillarSet::Core,
        selection: SelectionMode::Single,
        quest_selected_step: 2,
        accredited: false,
        steps: vec![
            StepDef::new(S::Hero, F::Never),
            StepDef::new(S::QuestSelect, F::QuestSelected),
            StepDef::new(S::TaskList, F::AnyTaskCompleted),
            StepDef::new(S::Diploma, F::Always),
            StepDef::new(S::Pricing, F::Never),
        ],
    }
}

fn guided_spec() -> VariantSpec {
    VariantSpec {
        id: "guided".into(),
        name: "Guided Tour".into(),
        pillar_set: PillarSet::Core,
        selection: SelectionMode::Single,
        // Catalog quests already carry tasks, so interests are skipped
        quest_selected_step: 3,
        accredited: false,
        steps: vec![
            StepDef::new(S::Hero, F::Never),
            StepDef::new(S::QuestSelect, F::QuestSelected),
            StepDef::new(S::InterestCapture, F::Always),
            StepDef::new(S::TaskList, F::AllTasksCompleted),
            StepDef::new(S::Diploma, F::Always),
            StepDef::new(S::Pricing, F::Never),
        ],
    }
}

fn portfolio_spec() -> VariantSpec {
    VariantSpec {
        id: "portfolio".into(),
        name: "Portfolio Builder".into(),
        pillar_set: PillarSet::Diploma,
        selection: SelectionMode::Multi,
        quest_selected_step: 2,
        accredited: false,
        steps: vec![
            StepDef::new(S::Hero, F::Never),
            StepDef::new(S::QuestMultiSelect, F::AnyQuestSelected),
            StepDef::new(S::TaskGeneration, F::TasksGenerated),
            StepDef::new(S::SimulatedTasks, F::AnyTaskCompleted),
            StepDef::new(S::WorkSubmission, F::WorkSubmitted),
            StepDef::new(S::Diploma, F::Always),
            StepDef::new(S::Pricing, F::Never),
        ],
    }
}

fn accredited_spec() -> VariantSpec {
    VariantSpec {
        id: "accredited".into(),
        name: "Accredited Diploma".into(),
        pillar_set: PillarSet::Diploma,
        selection: SelectionMode::Single,
        quest_selected_step: 2,
        accredited: true,
        steps: vec![
            StepDef::new(S::Hero, F::Never),
            StepDef::new(S::QuestSelect, F::QuestSelected),
            StepDef::new(S::InterestCapture, F::Always),
            StepDef::new(S::TaskGeneration, F::TasksGenerated),
            StepDef::new(S::SimulatedTasks, F::AnyTaskCompleted),
            StepDef::new(S::WorkSubmission, F::WorkSubmitted),
            StepDef::new(S::Diploma, F::Always),
            StepDef::new(S::Pricing, F::Never),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_step_counts() {
        assert_eq!(Variant::explorer().steps().len(), 5);
        assert_eq!(Variant::guided().steps().len(), 6);
        assert_eq!(Variant::portfolio().steps().len(), 7);
        assert_eq!(Variant::accredited().steps().len(), 8);
    }

    #[test]
    fn test_builtins_start_at_hero_and_end_at_pricing() {
        for id in Variant::builtin_ids() {
            let v = Variant::by_id(id, &[]).unwrap();
            assert_eq!(v.steps()[0].screen, ScreenId::Hero, "{}", id);
            assert_eq!(v.steps()[v.max_step()].screen, ScreenId::Pricing, "{}", id);
            assert_eq!(v.catalog().pillar_set(), v.pillar_set());
        }
    }

    #[test]
    fn test_unknown_variant() {
        assert_eq!(
            Variant::by_id("nope", &[]).unwrap_err(),
            VariantError::Unknown("nope".into())
        );
    }

    #[test]
    fn test_extra_spec_lookup() {
        let mut spec = explorer_spec();
        spec.id = "short".into();
        spec.steps.truncate(3);
        let v = Variant::by_id("short", &[spec]).unwrap();
        assert_eq!(v.max_step(), 2);
    }

    #[test]
    fn test_spec_validation() {
        let mut spec = explorer_spec();
        spec.steps.clear();
        assert!(matches!(Variant::from_spec(spec), Err(VariantError::NoSteps(_))));

        let mut spec = explorer_spec();
        spec.quest_selected_step = 9;
        assert!(matches!(
            Variant::from_spec(spec),
            Err(VariantError::JumpOutOfRange { step: 9, len: 5, .. })
        ));
    }

    #[test]
    fn test_spec_json_shape() {
        let json = serde_json::to_value(explorer_spec()).unwrap();
        assert_eq!(json["steps"][1]["screen"], "quest_select");
        assert_eq!(json["steps"][1]["forward"], "quest_selected");
        assert_eq!(json["pillar_set"], "core");
    }
}
