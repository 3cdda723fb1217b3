pub mod diploma;
pub mod hero;
pub mod interests;
pub mod pricing;
pub mod quest_select;
pub mod task_generation;
pub mod task_list;
pub mod text_field;
mod throbber;
pub mod work_submission;

use crate::api::GenerateTasksRequest;
use crate::gate::ScreenId;
use crate::progression::{Modal, ProgressionStore};
use crossterm::event::KeyCode;
use diploma::DiplomaScreen;
use hero::HeroScreen;
use interests::InterestsScreen;
use pricing::PricingScreen;
use quest_select::QuestSelectScreen;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};
use task_generation::TaskGenerationScreen;
use task_list::{TaskListScreen, TaskSource};
use work_submission::WorkSubmissionScreen;

/// What a screen did with a key press.
#[derive(Debug, Clone, PartialEq)]
pub enum ScreenOutcome {
    /// Not consumed; the shell may apply its global keys
    Ignored,
    Handled,
    /// Start a task generation request
    Generate(GenerateTasksRequest),
    /// Start the demo over
    Restart,
}

/// Per-screen local state, kept across navigation so going back shows the
/// same cursor and input.
#[derive(Default)]
pub struct Screens {
    pub hero: HeroScreen,
    pub quest_select: QuestSelectScreen,
    pub interests: InterestsScreen,
    pub task_generation: TaskGenerationScreen,
    pub task_list: TaskListScreen,
    pub work_submission: WorkSubmissionScreen,
    pub diploma: DiplomaScreen,
    pub pricing: PricingScreen,
}

impl Screens {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called when `screen` becomes the active screen.
    pub fn mount(
        &mut self,
        screen: ScreenId,
        now_ms: u64,
        reveal_interval_ms: u64,
        store: &mut ProgressionStore,
    ) {
        match screen {
            ScreenId::TaskList | ScreenId::SimulatedTasks => {
                self.task_list.selected_index = 0;
                self.task_list.last_message = None;
            }
            ScreenId::Diploma => self.diploma.mount(now_ms, reveal_interval_ms, store),
            _ => {}
        }
    }

    /// Called when `screen` stops being the active screen.
    pub fn unmount(&mut self, screen: ScreenId, store: &mut ProgressionStore) {
        match screen {
            ScreenId::Diploma => {
                self.diploma.unmount();
                store.close_modal(Modal::DiplomaPreview);
            }
            ScreenId::Pricing => store.close_modal(Modal::Pricing),
            _ => {}
        }
    }

    pub fn tick(&mut self, now_ms: u64) {
        self.diploma.tick(now_ms);
    }

    pub fn handle_key(
        &mut self,
        screen: ScreenId,
        key: KeyCode,
        store: &mut ProgressionStore,
    ) -> ScreenOutcome {
        match screen {
            ScreenId::Hero => self.hero.handle_key(key, store),
            ScreenId::QuestSelect | ScreenId::QuestMultiSelect => {
                self.quest_select.handle_key(key, store)
            }
            ScreenId::InterestCapture => self.interests.handle_key(key),
            ScreenId::TaskGeneration => {
                self.task_generation
                    .handle_key(key, store, &self.interests)
            }
            ScreenId::TaskList => self.task_list.handle_key(key, store, TaskSource::Quest),
            ScreenId::SimulatedTasks => {
                self.task_list.handle_key(key, store, TaskSource::Generated)
            }
            ScreenId::WorkSubmission => self.work_submission.handle_key(key, store),
            ScreenId::Diploma => self.diploma.handle_key(key, store),
            ScreenId::Pricing => self.pricing.handle_key(key, store),
        }
    }

    fn draw_body(&self, f: &mut Frame, area: Rect, store: &ProgressionStore, now_ms: u64) {
        match store.screen() {
            ScreenId::Hero => self.hero.draw(f, area),
            ScreenId::QuestSelect | ScreenId::QuestMultiSelect => {
                self.quest_select.draw(f, area, store)
            }
            ScreenId::InterestCapture => self.interests.draw(f, area),
            ScreenId::TaskGeneration => self.task_generation.draw(f, area, store, now_ms),
            ScreenId::TaskList => self.task_list.draw(f, area, store, TaskSource::Quest),
            ScreenId::SimulatedTasks => {
                self.task_list.draw(f, area, store, TaskSource::Generated)
            }
            ScreenId::WorkSubmission => self.work_submission.draw(f, area, store),
            ScreenId::Diploma => self.diploma.draw(f, area),
            ScreenId::Pricing => self.pricing.draw(f, area),
        }
    }
}

/// Draws the whole walkthrough frame: header, progress, active screen, footer.
pub fn draw(f: &mut Frame, store: &ProgressionStore, screens: &Screens, now_ms: u64) {
    let size = f.size();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(1), // Progress
            Constraint::Min(8),    // Screen
            Constraint::Length(3), // Footer
        ])
        .split(size);

    draw_header(f, chunks[0], store);

    let nav = store.navigation();
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Green).bg(Color::Black))
        .ratio(nav.progress.clamp(0.0, 1.0))
        .label(format!(
            "Step {} of {}",
            store.state().current_step + 1,
            store.variant().max_step() + 1
        ));
    f.render_widget(gauge, chunks[1]);

    screens.draw_body(f, chunks[2], store, now_ms);
    draw_footer(f, chunks[3], nav.can_go_back, nav.can_go_forward);

    if store.state().modals.is_open(Modal::Pricing) {
        screens.pricing.draw_modal(f);
    }
}

fn draw_header(f: &mut Frame, area: Rect, store: &ProgressionStore) {
    let mut spans = vec![
        Span::styled(
            store.variant().name().to_string(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  │  "),
        Span::styled(
            store.screen().title(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
    ];
    if let Some(persona) = store.state().persona {
        spans.push(Span::raw("  │  "));
        spans.push(Span::styled(
            persona.name(),
            Style::default().fg(Color::Gray),
        ));
    }
    let header = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, area);
}

fn draw_footer(f: &mut Frame, area: Rect, can_go_back: bool, can_go_forward: bool) {
    let enabled = |on: bool, color: Color| {
        if on {
            Style::default().fg(color).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        }
    };
    let footer = Paragraph::new(Line::from(vec![
        Span::styled("[←] Back", enabled(can_go_back, Color::White)),
        Span::raw("    "),
        Span::styled("[→] Continue", enabled(can_go_forward, Color::Green)),
        Span::raw("    "),
        Span::styled("[r] Restart  [q] Quit", Style::default().fg(Color::Gray)),
    ]))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(footer, area);
}
