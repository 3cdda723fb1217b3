use super::text_field::TextField;
use super::ScreenOutcome;
use crate::catalog::Task;
use crate::progression::{ProgressionStore, Visibility};
use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use serde_json::json;

const WORK_MAX: usize = 280;

/// Portfolio upload. Work goes against a task of the generated quest, or of
/// the selected quest when nothing was generated.
pub struct WorkSubmissionScreen {
    pub selected_index: usize,
    pub work: TextField,
    pub visibility: Visibility,
    pub notice: Option<String>,
}

impl Default for WorkSubmissionScreen {
    fn default() -> Self {
        Self::new()
    }
}

fn submission_target(store: &ProgressionStore) -> Option<(String, Vec<Task>)> {
    let state = store.state();
    match &state.generated_for {
        Some(quest_id) if !state.generated_tasks.is_empty() => {
            Some((quest_id.clone(), state.generated_tasks.clone()))
        }
        _ => state
            .selected_quest
            .as_ref()
            .map(|q| (q.id.clone(), q.tasks.clone())),
    }
}

impl WorkSubmissionScreen {
    pub fn new() -> Self {
        Self {
            selected_index: 0,
            work: TextField::new(WORK_MAX),
            visibility: Visibility::Public,
            notice: None,
        }
    }

    pub fn handle_key(&mut self, key: KeyCode, store: &mut ProgressionStore) -> ScreenOutcome {
        let Some((quest_id, tasks)) = submission_target(store) else {
            return ScreenOutcome::Ignored;
        };
        match key {
            KeyCode::Up => {
                self.selected_index = self.selected_index.saturating_sub(1);
                ScreenOutcome::Handled
            }
            KeyCode::Down => {
                if self.selected_index + 1 < tasks.len() {
                    self.selected_index += 1;
                }
                ScreenOutcome::Handled
            }
            KeyCode::Tab => {
                self.visibility = match self.visibility {
                    Visibility::Public => Visibility::Confidential,
                    Visibility::Confidential => Visibility::Public,
                };
                ScreenOutcome::Handled
            }
            KeyCode::Enter => {
                let Some(task) = tasks.get(self.selected_index) else {
                    return ScreenOutcome::Handled;
                };
                if self.work.is_blank() {
                    self.notice = Some("Describe or link your work first".to_string());
                    return ScreenOutcome::Handled;
                }
                let work = self.work.value().trim().to_string();
                match store.submit_work(&quest_id, &task.id, &work, self.visibility) {
                    Ok(()) => {
                        store.track_interaction(
                            "submit_work",
                            json!({ "task_id": task.id, "visibility": self.visibility }),
                        );
                        self.notice = Some(format!("Submitted for \"{}\"", task.title));
                        self.work.clear();
                    }
                    Err(e) => self.notice = Some(e.to_string()),
                }
                ScreenOutcome::Handled
            }
            other => {
                if self.work.handle_key(other) {
                    ScreenOutcome::Handled
                } else {
                    ScreenOutcome::Ignored
                }
            }
        }
    }

    pub fn draw(&self, f: &mut Frame, area: Rect, store: &ProgressionStore) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(4),
                Constraint::Length(3),
                Constraint::Length(3),
            ])
            .split(area);

        let state = store.state();
        let (quest_id, tasks) = submission_target(store).unwrap_or_default();
        let lines: Vec<Line> = tasks
            .iter()
            .enumerate()
            .map(|(i, task)| {
                let tag = match state.visibility_of(&quest_id, &task.id) {
                    Some(Visibility::Public) => " [shared]",
                    Some(Visibility::Confidential) => " [private]",
                    None => "",
                };
                let text = format!("{}{}", task.title, tag);
                if i == self.selected_index {
                    Line::from(Span::styled(
                        format!("> {}", text),
                        Style::default()
                            .fg(Color::Yellow)
                            .add_modifier(Modifier::BOLD),
                    ))
                } else {
                    Line::from(format!("  {}", text))
                }
            })
            .collect();
        let list = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Submit work [Enter] "),
        );
        f.render_widget(list, chunks[0]);

        let visibility = match self.visibility {
            Visibility::Public => "Public",
            Visibility::Confidential => "Confidential",
        };
        let input = Paragraph::new(self.work.display()).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Your work ({}) [Tab] visibility ", visibility)),
        );
        f.render_widget(input, chunks[1]);

        let notice = Paragraph::new(self.notice.clone().unwrap_or_default())
            .style(Style::default().fg(Color::Cyan))
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(notice, chunks[2]);
    }
}
