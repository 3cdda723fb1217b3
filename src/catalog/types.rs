//! Quest, task and pillar definitions.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use thiserror::Error;

/// Skill category used to bucket XP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pillar {
    Stem,
    Wellness,
    Communication,
    Civics,
    Art,
    Creativity,
    CriticalThinking,
    PracticalSkills,
    CulturalLiteracy,
}

impl Pillar {
    pub fn name(&self) -> &'static str {
        match self {
            Pillar::Stem => "STEM",
            Pillar::Wellness => "Wellness",
            Pillar::Communication => "Communication",
            Pillar::Civics => "Civics",
            Pillar::Art => "Art",
            Pillar::Creativity => "Creativity",
            Pillar::CriticalThinking => "Critical Thinking",
            Pillar::PracticalSkills => "Practical Skills",
            Pillar::CulturalLiteracy => "Cultural Literacy",
        }
    }
}

/// The two pillar families. A session only ever uses one of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PillarSet {
    /// stem, wellness, communication, civics, art
    Core,
    /// creativity, critical thinking, practical skills, communication, cultural literacy
    Diploma,
}

impl PillarSet {
    pub fn pillars(&self) -> &'static [Pillar] {
        match self {
            PillarSet::Core => &[
                Pillar::Stem,
                Pillar::Wellness,
                Pillar::Communication,
                Pillar::Civics,
                Pillar::Art,
            ],
            PillarSet::Diploma => &[
                Pillar::Creativity,
                Pillar::CriticalThinking,
                Pillar::PracticalSkills,
                Pillar::Communication,
                Pillar::CulturalLiteracy,
            ],
        }
    }

    pub fn contains(&self, pillar: Pillar) -> bool {
        self.pillars().contains(&pillar)
    }
}

/// Atomic unit of work inside a quest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub pillar: Pillar,
    pub xp: u32,
}

impl Task {
    pub fn new(id: &str, title: &str, pillar: Pillar, xp: u32) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            pillar,
            xp,
        }
    }
}

/// Themed bundle of tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quest {
    pub id: String,
    pub title: String,
    pub description: String,
    pub tasks: Vec<Task>,
    pub total_xp: u32,
}

impl Quest {
    pub fn task(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == task_id)
    }

    /// Distinct pillars touched by this quest's tasks, in pillar order.
    pub fn distinct_pillars(&self) -> Vec<Pillar> {
        self.tasks
            .iter()
            .map(|t| t.pillar)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Bonus paid once every task is complete: half of `total_xp`, rounded.
    pub fn completion_bonus(&self) -> u32 {
        // round(x * 0.5) for non-negative integers
        self.total_xp.div_ceil(2)
    }

    /// Per-pillar share of the completion bonus. The remainder of the
    /// integer division is dropped.
    pub fn bonus_share(&self) -> u32 {
        let pillars = self.distinct_pillars().len() as u32;
        if pillars == 0 {
            return 0;
        }
        self.completion_bonus() / pillars
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("duplicate quest id '{0}'")]
    DuplicateQuest(String),
    #[error("quest '{quest_id}' has duplicate task id '{task_id}'")]
    DuplicateTask { quest_id: String, task_id: String },
    #[error("task '{task_id}' uses pillar {pillar:?} outside the {set:?} pillar set")]
    ForeignPillar {
        task_id: String,
        pillar: Pillar,
        set: PillarSet,
    },
}

/// Read-only registry of quests keyed by id.
#[derive(Debug, Clone)]
pub struct QuestCatalog {
    pillar_set: PillarSet,
    by_id: HashMap<String, Quest>,
    order: Vec<String>,
}

impl QuestCatalog {
    /// Builds a catalog, rejecting duplicate ids and pillars outside `pillar_set`.
    pub fn new(pillar_set: PillarSet, quests: Vec<Quest>) -> Result<Self, CatalogError> {
        let mut by_id = HashMap::with_capacity(quests.len());
        let mut order = Vec::with_capacity(quests.len());

        for quest in quests {
            let mut task_ids = BTreeSet::new();
            for task in &quest.tasks {
                if !pillar_set.contains(task.pillar) {
                    return Err(CatalogError::ForeignPillar {
                        task_id: task.id.clone(),
                        pillar: task.pillar,
                        set: pillar_set,
                    });
                }
                if !task_ids.insert(task.id.as_str()) {
                    return Err(CatalogError::DuplicateTask {
                        quest_id: quest.id.clone(),
                        task_id: task.id.clone(),
                    });
                }
            }
            if by_id.contains_key(&quest.id) {
                return Err(CatalogError::DuplicateQuest(quest.id));
            }
            order.push(quest.id.clone());
            by_id.insert(quest.id.clone(), quest);
        }

        Ok(Self {
            pillar_set,
            by_id,
            order,
        })
    }

    pub fn pillar_set(&self) -> PillarSet {
        self.pillar_set
    }

    pub fn get(&self, quest_id: &str) -> Option<&Quest> {
        self.by_id.get(quest_id)
    }

    pub fn contains(&self, quest_id: &str) -> bool {
        self.by_id.contains_key(quest_id)
    }

    /// Quests in definition order.
    pub fn quests(&self) -> impl Iterator<Item = &Quest> {
        self.order.iter().filter_map(|id| self.by_id.get(id))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quest(id: &str, tasks: Vec<Task>, total_xp: u32) -> Quest {
        Quest {
            id: id.to_string(),
            title: id.to_string(),
            description: String::new(),
            tasks,
            total_xp,
        }
    }

    #[test]
    fn test_completion_bonus_rounds_half_up() {
        let q = quest("q", vec![Task::new("a", "A", Pillar::Stem, 125)], 125);
        assert_eq!(q.completion_bonus(), 63);
        let q = quest("q", vec![Task::new("a", "A", Pillar::Stem, 300)], 300);
        assert_eq!(q.completion_bonus(), 150);
    }

    #[test]
    fn test_bonus_share_drops_remainder() {
        let q = quest(
            "q",
            vec![
                Task::new("a", "A", Pillar::Stem, 50),
                Task::new("b", "B", Pillar::Art, 50),
                Task::new("c", "C", Pillar::Civics, 100),
            ],
            200,
        );
        // 100 over 3 pillars -> 33 each, 1 lost
        assert_eq!(q.bonus_share(), 33);
    }

    #[test]
    fn test_distinct_pillars_deduplicates() {
        let q = quest(
            "q",
            vec![
                Task::new("a", "A", Pillar::Art, 10),
                Task::new("b", "B", Pillar::Stem, 10),
                Task::new("c", "C", Pillar::Art, 10),
            ],
            30,
        );
        assert_eq!(q.distinct_pillars(), vec![Pillar::Stem, Pillar::Art]);
    }

    #[test]
    fn test_bonus_share_without_tasks_is_zero() {
        let q = quest("empty", vec![], 100);
        assert_eq!(q.bonus_share(), 0);
    }

    #[test]
    fn test_catalog_rejects_foreign_pillar() {
        let result = QuestCatalog::new(
            PillarSet::Diploma,
            vec![quest("q", vec![Task::new("a", "A", Pillar::Stem, 10)], 10)],
        );
        assert!(matches!(result, Err(CatalogError::ForeignPillar { .. })));
    }

    #[test]
    fn test_catalog_rejects_duplicate_quest() {
        let result = QuestCatalog::new(
            PillarSet::Core,
            vec![quest("q", vec![], 0), quest("q", vec![], 0)],
        );
        assert_eq!(result.unwrap_err(), CatalogError::DuplicateQuest("q".into()));
    }

    #[test]
    fn test_catalog_rejects_duplicate_task() {
        let result = QuestCatalog::new(
            PillarSet::Core,
            vec![quest(
                "q",
                vec![
                    Task::new("a", "A", Pillar::Stem, 10),
                    Task::new("a", "A again", Pillar::Art, 10),
                ],
                20,
            )],
        );
        assert!(matches!(result, Err(CatalogError::DuplicateTask { .. })));
    }

    #[test]
    fn test_communication_shared_between_sets() {
        assert!(PillarSet::Core.contains(Pillar::Communication));
        assert!(PillarSet::Diploma.contains(Pillar::Communication));
        assert!(!PillarSet::Core.contains(Pillar::Creativity));
    }

    #[test]
    fn test_catalog_preserves_order() {
        let catalog = QuestCatalog::new(
            PillarSet::Core,
            vec![quest("b", vec![], 0), quest("a", vec![], 0)],
        )
        .unwrap();
        let ids: Vec<&str> = catalog.quests().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert!(catalog.get("a").is_some());
        assert!(catalog.get("zzz").is_none());
    }
}
