//! Application state and main event loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete application state
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions
//! - [`App::run`]: Main event loop with rendering
//!
//! Document edits happen in [`update`]. Saving and exporting touch the
//! outside world and run afterwards as side effects.

mod effects;
mod event_loop;
mod input;
mod model;
mod update;

pub use model::{Model, PromptState, ToastLevel};
pub use update::{Message, update};

use std::path::PathBuf;
use std::time::Duration;

use crate::autosave::DEFAULT_INTERVAL;

/// Main application struct that owns the terminal and runs the event loop.
pub struct App {
    storage_path: Option<PathBuf>,
    export_dir: PathBuf,
    autosave_interval: Duration,
    config_global_path: Option<PathBuf>,
    config_local_path: Option<PathBuf>,
}

impl App {
    /// Create an application that keeps its draft at `storage_path`, or in
    /// memory only when `None`.
    pub fn new(storage_path: Option<PathBuf>) -> Self {
        Self {
            storage_path,
            export_dir: PathBuf::from("."),
            autosave_interval: DEFAULT_INTERVAL,
            config_global_path: None,
            config_local_path: None,
        }
    }

    /// Directory exported files are written to.
    pub fn with_export_dir(mut self, dir: PathBuf) -> Self {
        self.export_dir = dir;
        self
    }

    /// Time between scheduled draft saves. Zero disables autosave.
    pub const fn with_autosave_interval(mut self, interval: Duration) -> Self {
        self.autosave_interval = interval;
        self
    }

    /// Set config paths to show in help.
    pub fn with_config_paths(
        mut self,
        global_path: Option<PathBuf>,
        local_path: Option<PathBuf>,
    ) -> Self {
        self.config_global_path = global_path;
        self.config_local_path = local_path;
        self
    }
}

#[cfg(test)]
mod tests;
