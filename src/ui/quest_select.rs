use super::ScreenOutcome;
use crate::catalog::Quest;
use crate::gate::SelectionMode;
use crate::progression::{ProgressionStore, SelectionChange, MAX_SELECTED_QUESTS};
use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use serde_json::json;

/// Quest browser. Enter picks a quest in single mode; Space toggles in
/// multi mode.
pub struct QuestSelectScreen {
    pub selected_index: usize,
    pub notice: Option<String>,
}

impl Default for QuestSelectScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl QuestSelectScreen {
    pub fn new() -> Self {
        Self {
            selected_index: 0,
            notice: None,
        }
    }

    fn highlighted<'a>(&self, store: &'a ProgressionStore) -> Option<&'a Quest> {
        store.variant().catalog().quests().nth(self.selected_index)
    }

    pub fn handle_key(&mut self, key: KeyCode, store: &mut ProgressionStore) -> ScreenOutcome {
        let count = store.variant().catalog().len();
        let multi = store.variant().selection() == SelectionMode::Multi;
        match key {
            KeyCode::Up => {
                self.selected_index = self.selected_index.saturating_sub(1);
                ScreenOutcome::Handled
            }
            KeyCode::Down => {
                if self.selected_index + 1 < count {
                    self.selected_index += 1;
                }
                ScreenOutcome::Handled
            }
            KeyCode::Enter if !multi => {
                let Some(id) = self.highlighted(store).map(|q| q.id.clone()) else {
                    return ScreenOutcome::Handled;
                };
                match store.select_quest(&id) {
                    Ok(()) => {
                        self.notice = None;
                        store.track_interaction("select_quest", json!({ "quest_id": id }));
                    }
                    Err(e) => self.notice = Some(e.to_string()),
                }
                ScreenOutcome::Handled
            }
            KeyCode::Char(' ') | KeyCode::Enter if multi => {
                let Some(id) = self.highlighted(store).map(|q| q.id.clone()) else {
                    return ScreenOutcome::Handled;
                };
                self.notice = match store.toggle_quest_selection(&id) {
                    Ok(SelectionChange::Full) => Some(format!(
                        "You can pick up to {} quests. Remove one first.",
                        MAX_SELECTED_QUESTS
                    )),
                    Ok(change) => {
                        let added = change == SelectionChange::Added;
                        store.track_interaction(
                            "toggle_quest",
                            json!({ "quest_id": id, "added": added }),
                        );
                        None
                    }
                    Err(e) => Some(e.to_string()),
                };
                ScreenOutcome::Handled
            }
            _ => ScreenOutcome::Ignored,
        }
    }

    pub fn draw(&self, f: &mut Frame, area: Rect, store: &ProgressionStore) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(area);

        let state = store.state();
        let multi = store.variant().selection() == SelectionMode::Multi;

        let lines: Vec<Line> = store
            .variant()
            .catalog()
            .quests()
            .enumerate()
            .map(|(i, quest)| {
                let marker = if multi {
                    if state.is_quest_selected(&quest.id) {
                        "[x] "
                    } else {
                        "[ ] "
                    }
                } else {
                    ""
                };
                let text = format!("{}{} ({} XP)", marker, quest.title, quest.total_xp);
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

        let title = if multi {
            format!(
                " Quests {}/{} [Space] toggle ",
                state.selected_quests.len(),
                MAX_SELECTED_QUESTS
            )
        } else {
            " Quests [Enter] choose ".to_string()
        };
        let list = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title));
        f.render_widget(list, chunks[0]);

        let mut details = Vec::new();
        if let Some(quest) = self.highlighted(store) {
            details.push(Line::from(Span::styled(
                quest.title.clone(),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )));
            details.push(Line::from(quest.description.clone()));
            details.push(Line::from(""));
            for task in &quest.tasks {
                details.push(Line::from(format!(
                    "  • {} ({} XP, {})",
                    task.title,
                    task.xp,
                    task.pillar.name()
                )));
            }
        }
        if let Some(notice) = &self.notice {
            details.push(Line::from(""));
            details.push(Line::from(Span::styled(
                notice.clone(),
                Style::default().fg(Color::Red),
            )));
        }
        let panel = Paragraph::new(details)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title(" Details "));
        f.render_widget(panel, chunks[1]);
    }
}
