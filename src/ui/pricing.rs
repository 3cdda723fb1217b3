use super::ScreenOutcome;
use crate::progression::{Modal, ProgressionStore};
use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use serde_json::json;

pub struct Plan {
    pub id: &'static str,
    pub name: &'static str,
    pub price: &'static str,
    pub perks: &'static [&'static str],
}

pub static PLANS: [Plan; 3] = [
    Plan {
        id: "family",
        name: "Family",
        price: "$29/mo",
        perks: &["1 learner", "Unlimited quests", "Progress reports"],
    },
    Plan {
        id: "family-plus",
        name: "Family Plus",
        price: "$49/mo",
        perks: &["Up to 4 learners", "AI task personalization", "Portfolio sharing"],
    },
    Plan {
        id: "diploma",
        name: "Diploma Track",
        price: "$129/mo",
        perks: &["Accredited transcript", "Advisor check-ins", "Everything in Plus"],
    },
];

/// Conversion panel. Enter opens the sign-up dialog for the highlighted plan.
pub struct PricingScreen {
    pub selected_index: usize,
}

impl Default for PricingScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl PricingScreen {
    pub fn new() -> Self {
        Self { selected_index: 0 }
    }

    pub fn selected(&self) -> &'static Plan {
        &PLANS[self.selected_index.min(PLANS.len() - 1)]
    }

    pub fn handle_key(&mut self, key: KeyCode, store: &mut ProgressionStore) -> ScreenOutcome {
        let modal_open = store.state().modals.is_open(Modal::Pricing);
        match key {
            KeyCode::Esc if modal_open => {
                store.close_modal(Modal::Pricing);
                ScreenOutcome::Handled
            }
            KeyCode::Enter if modal_open => {
                store.close_modal(Modal::Pricing);
                store.track_interaction("start_trial", json!({ "plan": self.selected().id }));
                ScreenOutcome::Restart
            }
            _ if modal_open => ScreenOutcome::Handled,
            KeyCode::Up => {
                self.selected_index = self.selected_index.saturating_sub(1);
                ScreenOutcome::Handled
            }
            KeyCode::Down => {
                if self.selected_index + 1 < PLANS.len() {
                    self.selected_index += 1;
                }
                ScreenOutcome::Handled
            }
            KeyCode::Enter => {
                store.open_modal(Modal::Pricing);
                store.track_interaction("view_plan", json!({ "plan": self.selected().id }));
                ScreenOutcome::Handled
            }
            _ => ScreenOutcome::Ignored,
        }
    }

    pub fn draw(&self, f: &mut Frame, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
            ])
            .split(area);

        for (i, plan) in PLANS.iter().enumerate() {
            let highlighted = i == self.selected_index;
            let border = if highlighted {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            let mut lines = vec![
                Line::from(Span::styled(
                    plan.price,
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
            ];
            lines.extend(plan.perks.iter().map(|p| Line::from(format!("✓ {}", p))));
            let card = Paragraph::new(lines)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(border)
                        .title(format!(" {} ", plan.name)),
                );
            f.render_widget(card, columns[i]);
        }
    }

    /// Sign-up dialog drawn over the whole frame.
    pub fn draw_modal(&self, f: &mut Frame) {
        let size = f.size();
        let width = 46.min(size.width.saturating_sub(4));
        let height = 9.min(size.height.saturating_sub(4));
        let dialog = Rect::new(
            size.width.saturating_sub(width) / 2,
            size.height.saturating_sub(height) / 2,
            width,
            height,
        );
        f.render_widget(Clear, dialog);

        let plan = self.selected();
        let lines = vec![
            Line::from(""),
            Line::from(format!("{} at {}", plan.name, plan.price)),
            Line::from("14-day free trial. Cancel anytime."),
            Line::from(""),
            Line::from(vec![
                Span::styled(
                    "[Enter] Start trial",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw("    "),
                Span::styled(
                    "[Esc] Back",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
            ]),
        ];
        let paragraph = Paragraph::new(lines).alignment(Alignment::Center).block(
            Block::default()
                .title(" Get started ")
                .title_alignment(Alignment::Center)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        );
        f.render_widget(paragraph, dialog);
    }
}
