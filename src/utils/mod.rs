//! Utility modules: config-directory persistence and logging setup.

pub mod logging;
pub mod persistence;
