//! Demo Walkthrough - interactive onboarding demo for the learning platform.
//!
//! The progression engine (catalog, store, step gate) is UI-agnostic and
//! exposed here for tests; the terminal shell drives it through `App`.

pub mod api;
pub mod app;
pub mod catalog;
pub mod config;
pub mod gate;
pub mod progression;
pub mod reveal;
pub mod ui;
pub mod utils;

pub use app::{App, TaskGenerator};
pub use catalog::{Pillar, PillarSet, Quest, QuestCatalog, Task};
pub use gate::{ScreenId, Variant};
pub use progression::{ProgressionError, ProgressionState, ProgressionStore};
