//! Built-in quest definitions.

use super::types::{Pillar, PillarSet, Quest, QuestCatalog, Task};

fn quest(id: &str, title: &str, description: &str, tasks: Vec<Task>) -> Quest {
    let total_xp = tasks.iter().map(|t| t.xp).sum();
    Quest {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        tasks,
        total_xp,
    }
}

fn core_quests() -> Vec<Quest> {
    vec![
        quest(
            "music-composition",
            "Music Composition",
            "Write, record and share an original piece of music.",
            vec![
                Task::new("mc-rhythm", "Explore rhythm as fractions", Pillar::Stem, 75),
                Task::new("mc-melody", "Compose an eight-bar melody", Pillar::Art, 100),
                Task::new("mc-record", "Record and mix your piece", Pillar::Stem, 50),
                Task::new(
                    "mc-story",
                    "Present the story behind your song",
                    Pillar::Communication,
                    75,
                ),
            ],
        ),
        quest(
            "family-recipes",
            "Family Recipes",
            "Preserve a family dish and the story that comes with it.",
            vec![
                Task::new(
                    "fr-interview",
                    "Interview a relative about a family dish",
                    Pillar::Communication,
                    80,
                ),
                Task::new("fr-scale", "Scale the recipe for twelve people", Pillar::Stem, 90),
                Task::new(
                    "fr-cook",
                    "Cook it and plan a balanced meal around it",
                    Pillar::Wellness,
                    80,
                ),
            ],
        ),
        quest(
            "community-garden",
            "Community Garden",
            "Design and pitch a garden plot for your neighborhood.",
            vec![
                Task::new("cg-soil", "Test soil samples", Pillar::Stem, 60),
                Task::new("cg-plan", "Plan a seasonal planting calendar", Pillar::Wellness, 60),
                Task::new("cg-council", "Draft a proposal for the town council", Pillar::Civics, 80),
                Task::new("cg-flyer", "Design a volunteer flyer", Pillar::Communication, 50),
            ],
        ),
        quest(
            "local-history-podcast",
            "Local History Podcast",
            "Produce a short podcast episode about a landmark in your town.",
            vec![
                Task::new("lh-research", "Research the landmark's history", Pillar::Civics, 70),
                Task::new("lh-script", "Script and record the episode", Pillar::Communication, 90),
                Task::new("lh-art", "Create cover art", Pillar::Art, 40),
            ],
        ),
        quest(
            "backyard-astronomy",
            "Backyard Astronomy",
            "Observe the night sky for a week and publish a sky journal.",
            vec![
                Task::new("ba-log", "Log moon phases for seven nights", Pillar::Stem, 100),
                Task::new("ba-sketch", "Sketch a constellation", Pillar::Art, 50),
                Task::new("ba-share", "Share your journal with the family", Pillar::Communication, 50),
            ],
        ),
    ]
}

fn diploma_quests() -> Vec<Quest> {
    vec![
        quest(
            "startup-pitch",
            "Startup Pitch",
            "Invent a product, test the idea and pitch it.",
            vec![
                Task::new("sp-idea", "Brainstorm ten product ideas", Pillar::Creativity, 75),
                Task::new(
                    "sp-research",
                    "Validate one idea with five interviews",
                    Pillar::CriticalThinking,
                    75,
                ),
                Task::new("sp-budget", "Build a launch budget", Pillar::PracticalSkills, 50),
                Task::new("sp-pitch", "Deliver a two-minute pitch", Pillar::Communication, 50),
            ],
        ),
        quest(
            "world-cuisines",
            "World Cuisines",
            "Cook your way through three food cultures.",
            vec![
                Task::new(
                    "wc-origins",
                    "Trace the origins of three dishes",
                    Pillar::CulturalLiteracy,
                    100,
                ),
                Task::new("wc-cook", "Cook one dish from each culture", Pillar::PracticalSkills, 75),
                Task::new("wc-blog", "Write a tasting blog post", Pillar::Communication, 50),
            ],
        ),
        quest(
            "game-design",
            "Game Design",
            "Design, prototype and playtest a board game.",
            vec![
                Task::new("gd-concept", "Sketch the game concept", Pillar::Creativity, 100),
                Task::new("gd-balance", "Balance the rules", Pillar::CriticalThinking, 75),
                Task::new("gd-prototype", "Build a paper prototype", Pillar::PracticalSkills, 75),
            ],
        ),
        quest(
            "mural-project",
            "Mural Project",
            "Plan a mural celebrating your community's heritage.",
            vec![
                Task::new("mp-sketch", "Sketch the mural", Pillar::Creativity, 80),
                Task::new("mp-heritage", "Research local heritage", Pillar::CulturalLiteracy, 70),
                Task::new("mp-present", "Present the design", Pillar::Communication, 50),
            ],
        ),
        quest(
            "budget-challenge",
            "Budget Challenge",
            "Run a household budget for one month.",
            vec![
                Task::new("bc-track", "Track every expense", Pillar::PracticalSkills, 100),
                Task::new("bc-analyze", "Find three savings", Pillar::CriticalThinking, 100),
            ],
        ),
    ]
}

/// Catalog used by the core-pillar variants.
pub fn core_catalog() -> QuestCatalog {
    QuestCatalog::new(PillarSet::Core, core_quests()).expect("built-in core catalog is valid")
}

/// Catalog used by the diploma-pillar variants.
pub fn diploma_catalog() -> QuestCatalog {
    QuestCatalog::new(PillarSet::Diploma, diploma_quests())
        .expect("built-in diploma catalog is valid")
}

/// Built-in catalog for a pillar family.
pub fn catalog_for(set: PillarSet) -> QuestCatalog {
    match set {
        PillarSet::Core => core_catalog(),
        PillarSet::Diploma => diploma_catalog(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalogs_build() {
        assert_eq!(core_catalog().len(), 5);
        assert_eq!(diploma_catalog().len(), 5);
    }

    #[test]
    fn test_music_composition_shape() {
        let catalog = core_catalog();
        let q = catalog.get("music-composition").unwrap();
        assert_eq!(q.tasks.len(), 4);
        assert_eq!(q.total_xp, 300);
        assert_eq!(
            q.distinct_pillars(),
            vec![Pillar::Stem, Pillar::Communication, Pillar::Art]
        );
    }

    #[test]
    fn test_total_xp_matches_task_sum() {
        for set in [PillarSet::Core, PillarSet::Diploma] {
            for q in catalog_for(set).quests() {
                let sum: u32 = q.tasks.iter().map(|t| t.xp).sum();
                assert_eq!(sum, q.total_xp, "quest {}", q.id);
            }
        }
    }

    #[test]
    fn test_catalog_for_matches_set() {
        assert_eq!(catalog_for(PillarSet::Core).pillar_set(), PillarSet::Core);
        assert_eq!(catalog_for(PillarSet::Diploma).pillar_set(), PillarSet::Diploma);
    }
}
