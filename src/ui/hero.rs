use super::ScreenOutcome;
use crate::progression::{Persona, ProgressionStore};
use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use serde_json::json;

const PERSONAS: [Persona; 2] = [Persona::Parent, Persona::Student];

/// Intro screen. Picking a persona starts the walkthrough.
pub struct HeroScreen {
    pub selected_index: usize,
}

impl Default for HeroScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl HeroScreen {
    pub fn new() -> Self {
        Self { selected_index: 0 }
    }

    pub fn selected(&self) -> Persona {
        PERSONAS[self.selected_index.min(PERSONAS.len() - 1)]
    }

    pub fn handle_key(&mut self, key: KeyCode, store: &mut ProgressionStore) -> ScreenOutcome {
        match key {
            KeyCode::Up => {
                self.selected_index = self.selected_index.saturating_sub(1);
                ScreenOutcome::Handled
            }
            KeyCode::Down => {
                if self.selected_index + 1 < PERSONAS.len() {
                    self.selected_index += 1;
                }
                ScreenOutcome::Handled
            }
            KeyCode::Enter => {
                let persona = self.selected();
                store.select_persona(persona);
                store.track_interaction("select_persona", json!({ "persona": persona }));
                ScreenOutcome::Handled
            }
            _ => ScreenOutcome::Ignored,
        }
    }

    pub fn draw(&self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(4), // Pitch
                Constraint::Length(1), // Spacer
                Constraint::Min(4),    // Persona choice
            ])
            .split(area);

        let pitch = Paragraph::new(vec![
            Line::from(Span::styled(
                "Learning that counts.",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from("Turn real-world projects into quests, XP and a diploma."),
            Line::from("Take the two-minute tour to see how it works."),
        ])
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
        f.render_widget(pitch, chunks[0]);

        let lines: Vec<Line> = PERSONAS
            .iter()
            .enumerate()
            .map(|(i, persona)| {
                let label = match persona {
                    Persona::Parent => "I'm a parent exploring options for my child",
                    Persona::Student => "I'm a student ready to start learning",
                };
                if i == self.selected_index {
                    Line::from(Span::styled(
                        format!("> {}", label),
                        Style::default()
                            .fg(Color::Yellow)
                            .add_modifier(Modifier::BOLD),
                    ))
                } else {
                    Line::from(format!("  {}", label))
                }
            })
            .collect();
        let choice = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Who are you? [Enter] to begin "),
        );
        f.render_widget(choice, chunks[2]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::Variant;

    #[test]
    fn test_enter_selects_persona() {
        let mut store = ProgressionStore::new(Variant::explorer());
        let mut screen = HeroScreen::new();
        screen.handle_key(KeyCode::Down, &mut store);
        screen.handle_key(KeyCode::Down, &mut store);
        assert_eq!(screen.selected(), Persona::Student);
        screen.handle_key(KeyCode::Enter, &mut store);
        assert_eq!(store.state().persona, Some(Persona::Student));
        assert_eq!(store.state().current_step, 1);
        assert_eq!(store.state().interactions.len(), 1);
    }

    #[test]
    fn test_unrelated_keys_ignored() {
        let mut store = ProgressionStore::new(Variant::explorer());
        let mut screen = HeroScreen::new();
        assert_eq!(
            screen.handle_key(KeyCode::Right, &mut store),
            ScreenOutcome::Ignored
        );
    }
}
