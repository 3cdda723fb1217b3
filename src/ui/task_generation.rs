use super::interests::InterestsScreen;
use super::throbber::{spinner_char, waiting_message};
use super::ScreenOutcome;
use crate::api::GenerateTasksRequest;
use crate::catalog::Quest;
use crate::progression::ProgressionStore;
use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Requests personalized tasks for one of the chosen quests.
pub struct TaskGenerationScreen {
    pub quest_index: usize,
}

impl Default for TaskGenerationScreen {
    fn default() -> Self {
        Self::new()
    }
}

/// Quests tasks can be generated for: the single pick, else the lineup.
fn candidates(store: &ProgressionStore) -> Vec<&Quest> {
    store.state().diploma_quests()
}

impl TaskGenerationScreen {
    pub fn new() -> Self {
        Self { quest_index: 0 }
    }

    pub fn target<'a>(&self, store: &'a ProgressionStore) -> Option<&'a Quest> {
        let quests = candidates(store);
        quests.get(self.quest_index.min(quests.len().saturating_sub(1))).copied()
    }

    pub fn build_request(
        &self,
        store: &ProgressionStore,
        interests: &InterestsScreen,
    ) -> Option<GenerateTasksRequest> {
        self.target(store).map(|quest| GenerateTasksRequest {
            quest_id: quest.id.clone(),
            quest_title: quest.title.clone(),
            interests: interests.interests(),
            custom_input: interests.custom_text(),
        })
    }

    pub fn handle_key(
        &mut self,
        key: KeyCode,
        store: &ProgressionStore,
        interests: &InterestsScreen,
    ) -> ScreenOutcome {
        match key {
            KeyCode::Up => {
                self.quest_index = self.quest_index.saturating_sub(1);
                ScreenOutcome::Handled
            }
            KeyCode::Down => {
                if self.quest_index + 1 < candidates(store).len() {
                    self.quest_index += 1;
                }
                ScreenOutcome::Handled
            }
            KeyCode::Enter | KeyCode::Char('g') => {
                if store.state().is_generating_tasks {
                    return ScreenOutcome::Handled;
                }
                match self.build_request(store, interests) {
                    Some(request) => ScreenOutcome::Generate(request),
                    None => ScreenOutcome::Handled,
                }
            }
            _ => ScreenOutcome::Ignored,
        }
    }

    pub fn draw(&self, f: &mut Frame, area: Rect, store: &ProgressionStore, now_ms: u64) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(6), Constraint::Min(4)])
            .split(area);

        let target_id = self.target(store).map(|q| q.id.as_str());
        let quest_lines: Vec<Line> = candidates(store)
            .iter()
            .map(|q| {
                if Some(q.id.as_str()) == target_id {
                    Line::from(Span::styled(
                        format!("> {}", q.title),
                        Style::default()
                            .fg(Color::Yellow)
                            .add_modifier(Modifier::BOLD),
                    ))
                } else {
                    Line::from(format!("  {}", q.title))
                }
            })
            .collect();
        let quests = Paragraph::new(quest_lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Generate tasks for [Enter] "),
        );
        f.render_widget(quests, chunks[0]);

        let state = store.state();
        let mut lines = Vec::new();
        if state.is_generating_tasks {
            lines.push(Line::from(Span::styled(
                format!("{} {}", spinner_char(now_ms), waiting_message(now_ms)),
                Style::default().fg(Color::Cyan),
            )));
        } else if let Some(error) = &state.generation_error {
            lines.push(Line::from(Span::styled(
                format!("✗ {}", error),
                Style::default().fg(Color::Red),
            )));
        }
        for task in &state.generated_tasks {
            lines.push(Line::from(format!(
                "  • {} ({} XP, {})",
                task.title,
                task.xp,
                task.pillar.name()
            )));
        }
        if let Some(remaining) = state.rate_limit_remaining {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!("{} generations left this hour", remaining),
                Style::default().fg(Color::Gray),
            )));
        }
        let results = Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title(" Your tasks "));
        f.render_widget(results, chunks[1]);
    }
}
