use super::ScreenOutcome;
use crate::progression::{Diploma, Modal, ProgressionStore};
use crate::reveal::{schedule_reveal, RevealPhase, Timeline};
use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};
use serde_json::json;

/// Diploma with a staged reveal. The timeline lives here, so unmounting
/// the screen stops the animation.
pub struct DiplomaScreen {
    timeline: Timeline<RevealPhase>,
    revealed: Vec<RevealPhase>,
    diploma: Option<Diploma>,
}

impl Default for DiplomaScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl DiplomaScreen {
    pub fn new() -> Self {
        Self {
            timeline: Timeline::new(),
            revealed: Vec::new(),
            diploma: None,
        }
    }

    /// Snapshots the diploma and starts the reveal.
    pub fn mount(&mut self, now_ms: u64, interval_ms: u64, store: &mut ProgressionStore) {
        self.unmount();
        self.diploma = Some(store.generate_diploma());
        store.open_modal(Modal::DiplomaPreview);
        schedule_reveal(&mut self.timeline, now_ms, interval_ms);
    }

    pub fn unmount(&mut self) {
        self.timeline.cancel_all();
        self.revealed.clear();
        self.diploma = None;
    }

    pub fn tick(&mut self, now_ms: u64) {
        for phase in self.timeline.poll(now_ms) {
            self.revealed.push(phase);
        }
    }

    pub fn is_revealed(&self, phase: RevealPhase) -> bool {
        self.revealed.contains(&phase)
    }

    pub fn is_animating(&self) -> bool {
        !self.timeline.is_idle()
    }

    pub fn diploma(&self) -> Option<&Diploma> {
        self.diploma.as_ref()
    }

    pub fn handle_key(&mut self, key: KeyCode, store: &mut ProgressionStore) -> ScreenOutcome {
        match key {
            KeyCode::Enter if self.is_animating() => {
                self.timeline.cancel_all();
                self.revealed = RevealPhase::ALL.to_vec();
                store.track_interaction("skip_reveal", json!({}));
                ScreenOutcome::Handled
            }
            _ => ScreenOutcome::Ignored,
        }
    }

    pub fn draw(&self, f: &mut Frame, area: Rect) {
        let Some(diploma) = &self.diploma else {
            return;
        };
        let gold = Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD);

        let mut lines = vec![Line::from("")];
        if self.is_revealed(RevealPhase::Seal) {
            let seal = if diploma.is_accredited {
                "★ ACCREDITED DIPLOMA ★"
            } else {
                "★ CERTIFICATE OF LEARNING ★"
            };
            lines.push(Line::from(Span::styled(seal, gold)));
            lines.push(Line::from(""));
        }
        if self.is_revealed(RevealPhase::Name) {
            lines.push(Line::from("This certifies that"));
            lines.push(Line::from(Span::styled(
                diploma.name.clone(),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )));
            if !diploma.quests.is_empty() {
                lines.push(Line::from(format!("completed {}", diploma.quests.join(", "))));
            }
            lines.push(Line::from(""));
        }
        if self.is_revealed(RevealPhase::Pillars) {
            for (pillar, xp) in &diploma.earned_xp {
                lines.push(Line::from(format!("{:<20}{:>6} XP", pillar.name(), xp)));
            }
            lines.push(Line::from(""));
        }
        if self.is_revealed(RevealPhase::Total) {
            lines.push(Line::from(Span::styled(
                format!("Total: {} XP", diploma.total_xp),
                gold,
            )));
            lines.push(Line::from(""));
        }
        if self.is_revealed(RevealPhase::Signature) {
            let issued = chrono::DateTime::<chrono::Utc>::from_timestamp_millis(diploma.timestamp)
                .map(|t| t.format("%B %-d, %Y").to_string())
                .unwrap_or_default();
            lines.push(Line::from(Span::styled(
                format!("Issued {}", issued),
                Style::default().fg(Color::Gray),
            )));
        }
        if self.is_animating() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "[Enter] skip",
                Style::default().fg(Color::DarkGray),
            )));
        }

        let card = Paragraph::new(lines).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(Color::Yellow)),
        );
        f.render_widget(card, area);
    }
}
