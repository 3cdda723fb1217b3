//! Navigation rules shared by every variant.

use super::variant::{ScreenId, Variant};
use crate::progression::ProgressionState;

/// Everything the shell needs to draw the navigation chrome.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Navigation {
    pub screen: ScreenId,
    pub can_go_back: bool,
    pub can_go_forward: bool,
    /// 0.0 ..= 1.0
    pub progress: f64,
}

/// Screen for `step`. Out-of-range steps fall back to the first screen.
pub fn screen_for(variant: &Variant, step: usize) -> ScreenId {
    let steps = variant.steps();
    steps.get(step).unwrap_or(&steps[0]).screen
}

/// Back is available strictly between the intro and the terminal step.
pub fn can_go_back(variant: &Variant, state: &ProgressionState) -> bool {
    state.current_step > 0 && state.current_step < variant.max_step()
}

/// Continue is never offered on the intro or terminal step; those advance
/// through their own call to action.
pub fn can_go_forward(variant: &Variant, state: &ProgressionState) -> bool {
    let step = state.current_step;
    if step == 0 || step >= variant.max_step() {
        return false;
    }
    variant.steps()[step].forward.allows(state)
}

pub fn progress(variant: &Variant, step: usize) -> f64 {
    let max = variant.max_step();
    if max == 0 {
        return 1.0;
    }
    (step.min(max) as f64) / (max as f64)
}

pub fn navigation(variant: &Variant, state: &ProgressionState) -> Navigation {
    Navigation {
        screen: screen_for(variant, state.current_step),
        can_go_back: can_go_back(variant, state),
        can_go_forward: can_go_forward(variant, state),
        progress: progress(variant, state.current_step),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Pillar, Task};
    use crate::progression::CompletedTask;

    fn at(step: usize) -> ProgressionState {
        ProgressionState {
            current_step: step,
            ..ProgressionState::new()
        }
    }

    #[test]
    fn test_screen_fallback_for_out_of_range() {
        let v = Variant::explorer();
        assert_eq!(screen_for(&v, 1), ScreenId::QuestSelect);
        assert_eq!(screen_for(&v, 99), ScreenId::Hero);
    }

    #[test]
    fn test_back_only_between_ends() {
        let v = Variant::guided();
        let allowed: Vec<bool> = (0..=v.max_step())
            .map(|s| can_go_back(&v, &at(s)))
            .collect();
        assert_eq!(allowed, vec![false, true, true, true, true, false]);
    }

    #[test]
    fn test_forward_never_on_intro_or_terminal() {
        for id in Variant::builtin_ids() {
            let v = Variant::by_id(id, &[]).unwrap();
            assert!(!can_go_forward(&v, &at(0)), "{}", id);
            assert!(!can_go_forward(&v, &at(v.max_step())), "{}", id);
            assert!(!can_go_forward(&v, &at(v.max_step() + 3)), "{}", id);
        }
    }

    #[test]
    fn test_forward_quest_selected() {
        let v = Variant::explorer();
        let mut state = at(1);
        assert!(!can_go_forward(&v, &state));
        state.selected_quest = v.catalog().get("music-composition").cloned();
        assert!(can_go_forward(&v, &state));
    }

    #[test]
    fn test_forward_tasks_generated_waits_for_request() {
        let v = Variant::portfolio();
        let mut state = at(2);
        assert!(!can_go_forward(&v, &state));
        state.generated_tasks = vec![Task::new("g1", "Generated", Pillar::Creativity, 20)];
        state.is_generating_tasks = true;
        assert!(!can_go_forward(&v, &state));
        state.is_generating_tasks = false;
        assert!(can_go_forward(&v, &state));
    }

    #[test]
    fn test_forward_all_tasks_completed() {
        let v = Variant::guided();
        let quest = v.catalog().get("family-recipes").cloned().unwrap();
        let mut state = at(3);
        state.selected_quest = Some(quest.clone());
        for (i, task) in quest.tasks.iter().enumerate() {
            assert!(!can_go_forward(&v, &state), "after {} tasks", i);
            state.completed_tasks.push(CompletedTask {
                quest_id: quest.id.clone(),
                task_id: task.id.clone(),
                evidence: String::new(),
                timestamp: 0,
            });
        }
        assert!(can_go_forward(&v, &state));
    }

    #[test]
    fn test_progress_fraction() {
        let v = Variant::explorer();
        assert_eq!(progress(&v, 0), 0.0);
        assert_eq!(progress(&v, 2), 0.5);
        assert_eq!(progress(&v, 4), 1.0);
        assert_eq!(progress(&v, 40), 1.0);
    }

    #[test]
    fn test_navigation_bundle() {
        let v = Variant::accredited();
        let nav = navigation(&v, &at(2));
        assert_eq!(nav.screen, ScreenId::InterestCapture);
        assert!(nav.can_go_back);
        assert!(nav.can_go_forward);
    }
}
