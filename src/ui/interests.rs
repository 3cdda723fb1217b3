use super::text_field::TextField;
use super::ScreenOutcome;
use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub const INTEREST_OPTIONS: [&str; 8] = [
    "Music", "Cooking", "Sports", "Coding", "Art", "Nature", "History", "Games",
];

const CUSTOM_INPUT_MAX: usize = 200;

/// Interest picker plus a free-text box. Its contents feed task generation.
pub struct InterestsScreen {
    pub selected_index: usize,
    pub chosen: Vec<bool>,
    pub custom_input: TextField,
    /// Typing goes to the text box instead of the list
    pub editing: bool,
}

impl Default for InterestsScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl InterestsScreen {
    pub fn new() -> Self {
        Self {
            selected_index: 0,
            chosen: vec![false; INTEREST_OPTIONS.len()],
            custom_input: TextField::new(CUSTOM_INPUT_MAX),
            editing: false,
        }
    }

    pub fn interests(&self) -> Vec<String> {
        INTEREST_OPTIONS
            .iter()
            .zip(&self.chosen)
            .filter(|(_, chosen)| **chosen)
            .map(|(name, _)| name.to_string())
            .collect()
    }

    pub fn custom_text(&self) -> String {
        self.custom_input.value().trim().to_string()
    }

    pub fn handle_key(&mut self, key: KeyCode) -> ScreenOutcome {
        if key == KeyCode::Tab {
            self.editing = !self.editing;
            return ScreenOutcome::Handled;
        }
        if self.editing {
            return if self.custom_input.handle_key(key) {
                ScreenOutcome::Handled
            } else {
                ScreenOutcome::Ignored
            };
        }
        match key {
            KeyCode::Up => {
                self.selected_index = self.selected_index.saturating_sub(1);
                ScreenOutcome::Handled
            }
            KeyCode::Down => {
                if self.selected_index + 1 < INTEREST_OPTIONS.len() {
                    self.selected_index += 1;
                }
                ScreenOutcome::Handled
            }
            KeyCode::Char(' ') | KeyCode::Enter => {
                if let Some(flag) = self.chosen.get_mut(self.selected_index) {
                    *flag = !*flag;
                }
                ScreenOutcome::Handled
            }
            _ => ScreenOutcome::Ignored,
        }
    }

    pub fn draw(&self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(6), Constraint::Length(3)])
            .split(area);

        let lines: Vec<Line> = INTEREST_OPTIONS
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let mark = if self.chosen[i] { "[x]" } else { "[ ]" };
                let text = format!("{} {}", mark, name);
                if i == self.selected_index && !self.editing {
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
                .title(" What are you into? [Space] toggle  [Tab] write your own "),
        );
        f.render_widget(list, chunks[0]);

        let style = if self.editing {
            Style::default().fg(Color::White)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let input_text = if self.editing {
            self.custom_input.display()
        } else {
            self.custom_input.value().to_string()
        };
        let input = Paragraph::new(input_text)
            .style(style)
            .block(Block::default().borders(Borders::ALL).title(" Anything else? "));
        f.render_widget(input, chunks[1]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_interests() {
        let mut screen = InterestsScreen::new();
        screen.handle_key(KeyCode::Char(' '));
        screen.handle_key(KeyCode::Down);
        screen.handle_key(KeyCode::Down);
        screen.handle_key(KeyCode::Enter);
        assert_eq!(screen.interests(), vec!["Music", "Sports"]);
        screen.handle_key(KeyCode::Enter);
        assert_eq!(screen.interests(), vec!["Music"]);
    }

    #[test]
    fn test_tab_switches_to_text_box() {
        let mut screen = InterestsScreen::new();
        screen.handle_key(KeyCode::Tab);
        for c in " loves robots ".chars() {
            screen.handle_key(KeyCode::Char(c));
        }
        assert_eq!(screen.custom_text(), "loves robots");
        assert!(screen.interests().is_empty());
        // Arrow keys fall through to the shell while editing
        assert_eq!(screen.handle_key(KeyCode::Right), ScreenOutcome::Ignored);
    }
}
