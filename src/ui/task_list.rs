use super::text_field::TextField;
use super::ScreenOutcome;
use crate::catalog::Task;
use crate::progression::{CompletionOutcome, ProgressionStore};
use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use serde_json::json;

const EVIDENCE_MAX: usize = 120;

/// Where the listed tasks come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskSource {
    /// Tasks of the selected catalog quest
    Quest,
    /// Tasks returned by the generation service
    Generated,
}

/// Task checklist. Enter completes the highlighted task, using whatever is
/// typed in the evidence box.
pub struct TaskListScreen {
    pub selected_index: usize,
    pub evidence: TextField,
    pub last_message: Option<String>,
}

impl Default for TaskListScreen {
    fn default() -> Self {
        Self::new()
    }
}

fn tasks(store: &ProgressionStore, source: TaskSource) -> Vec<Task> {
    match source {
        TaskSource::Quest => store
            .state()
            .selected_quest
            .as_ref()
            .map(|q| q.tasks.clone())
            .unwrap_or_default(),
        TaskSource::Generated => store.state().generated_tasks.clone(),
    }
}

fn quest_id(store: &ProgressionStore, source: TaskSource) -> String {
    let state = store.state();
    match source {
        TaskSource::Quest => state.selected_quest.as_ref().map(|q| q.id.clone()),
        TaskSource::Generated => state.generated_for.clone(),
    }
    .unwrap_or_default()
}

impl TaskListScreen {
    pub fn new() -> Self {
        Self {
            selected_index: 0,
            evidence: TextField::new(EVIDENCE_MAX),
            last_message: None,
        }
    }

    pub fn handle_key(
        &mut self,
        key: KeyCode,
        store: &mut ProgressionStore,
        source: TaskSource,
    ) -> ScreenOutcome {
        let list = tasks(store, source);
        match key {
            KeyCode::Up => {
                self.selected_index = self.selected_index.saturating_sub(1);
                ScreenOutcome::Handled
            }
            KeyCode::Down => {
                if self.selected_index + 1 < list.len() {
                    self.selected_index += 1;
                }
                ScreenOutcome::Handled
            }
            KeyCode::Enter => {
                let Some(task) = list.get(self.selected_index) else {
                    return ScreenOutcome::Handled;
                };
                let evidence = if self.evidence.is_blank() {
                    "Simulated completion".to_string()
                } else {
                    self.evidence.value().trim().to_string()
                };
                let result = match source {
                    TaskSource::Quest => store.complete_task(&task.id, &evidence),
                    TaskSource::Generated => store.complete_simulated_task(&task.id, &evidence),
                };
                self.last_message = Some(match result {
                    Ok(CompletionOutcome::Completed { xp, pillar, bonus }) => {
                        store.track_interaction("complete_task", json!({ "task_id": task.id }));
                        self.evidence.clear();
                        match bonus {
                            Some(b) => format!(
                                "+{} {} XP. Quest complete! +{} bonus XP per pillar",
                                xp,
                                pillar.name(),
                                b.per_pillar
                            ),
                            None => format!("+{} {} XP", xp, pillar.name()),
                        }
                    }
                    Ok(CompletionOutcome::AlreadyCompleted) => "Already completed".to_string(),
                    Err(e) => e.to_string(),
                });
                ScreenOutcome::Handled
            }
            other => {
                if self.evidence.handle_key(other) {
                    ScreenOutcome::Handled
                } else {
                    ScreenOutcome::Ignored
                }
            }
        }
    }

    pub fn draw(&self, f: &mut Frame, area: Rect, store: &ProgressionStore, source: TaskSource) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(5),    // Checklist
                Constraint::Length(3), // Evidence
                Constraint::Length(4), // XP summary
            ])
            .split(area);

        let state = store.state();
        let quest_id = quest_id(store, source);
        let lines: Vec<Line> = tasks(store, source)
            .iter()
            .enumerate()
            .map(|(i, task)| {
                let done = state.is_task_completed(&quest_id, &task.id);
                let mark = if done { "✓" } else { " " };
                let text = format!(
                    "[{}] {} ({} XP, {})",
                    mark,
                    task.title,
                    task.xp,
                    task.pillar.name()
                );
                let style = if i == self.selected_index {
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD)
                } else if done {
                    Style::default().fg(Color::Green)
                } else {
                    Style::default()
                };
                Line::from(Span::styled(text, style))
            })
            .collect();
        let checklist = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Tasks [Enter] complete "),
        );
        f.render_widget(checklist, chunks[0]);

        let evidence = Paragraph::new(self.evidence.display()).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Evidence (optional) "),
        );
        f.render_widget(evidence, chunks[1]);

        let mut summary: Vec<Span> = state
            .earned_xp
            .iter()
            .map(|(pillar, xp)| Span::raw(format!("{}: {}  ", pillar.name(), xp)))
            .collect();
        summary.push(Span::styled(
            format!("Total: {}", state.total_xp()),
            Style::default().add_modifier(Modifier::BOLD),
        ));
        let mut summary_lines = vec![Line::from(summary)];
        if let Some(message) = &self.last_message {
            summary_lines.push(Line::from(Span::styled(
                message.clone(),
                Style::default().fg(Color::Cyan),
            )));
        }
        let xp = Paragraph::new(summary_lines)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title(" XP "));
        f.render_widget(xp, chunks[2]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Pillar;
    use crate::gate::Variant;
    use crate::progression::GenerationOutcome;

    #[test]
    fn test_complete_with_typed_evidence() {
        let mut store = ProgressionStore::new(Variant::guided());
        store.select_quest("music-composition").unwrap();
        let mut screen = TaskListScreen::new();
        for c in "demo.wav".chars() {
            screen.handle_key(KeyCode::Char(c), &mut store, TaskSource::Quest);
        }
        screen.handle_key(KeyCode::Enter, &mut store, TaskSource::Quest);
        assert_eq!(store.state().completed_tasks[0].evidence, "demo.wav");
        assert_eq!(store.state().xp_for(Pillar::Stem), 75);
        assert!(screen.evidence.is_blank());
    }

    #[test]
    fn test_complete_generated_task() {
        let mut store = ProgressionStore::new(Variant::portfolio());
        let session = store.state().session_id;
        store.begin_task_generation("game-design").unwrap();
        store.finish_task_generation(
            session,
            GenerationOutcome::Success {
                tasks: vec![Task::new("g-1", "Playtest", Pillar::CriticalThinking, 30)],
                rate_limit_remaining: None,
            },
        );
        let mut screen = TaskListScreen::new();
        screen.handle_key(KeyCode::Enter, &mut store, TaskSource::Generated);
        assert_eq!(store.state().xp_for(Pillar::CriticalThinking), 30);
        assert_eq!(screen.last_message.as_deref(), Some("+30 Critical Thinking XP"));
        screen.handle_key(KeyCode::Enter, &mut store, TaskSource::Generated);
        assert_eq!(screen.last_message.as_deref(), Some("Already completed"));
    }
}
