//! Application state and main event loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete application state
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions
//! - [`App::run`]: Main event loop with rendering

mod effects;
mod event_loop;
mod input;
mod model;
mod update;

pub use effects::{HostEvent, host_callbacks};
pub use model::{Model, Screen, SessionOutcome, ToastLevel};
pub use update::{Message, update};

use std::path::PathBuf;

use crate::editor::EditorOptions;
use crate::posts::PostRecord;

/// Main application struct that owns the terminal and runs the event loop.
pub struct App {
    screen: Screen,
    editor_options: EditorOptions,
    posts: Vec<PostRecord>,
    config_global_path: Option<PathBuf>,
    config_local_path: Option<PathBuf>,
}

impl App {
    /// Create an application that starts on `screen`.
    pub fn new(screen: Screen) -> Self {
        Self {
            screen,
            editor_options: EditorOptions::default(),
            posts: Vec::new(),
            config_global_path: None,
            config_local_path: None,
        }
    }

    /// Configure the editor mounted at startup.
    pub fn with_editor_options(mut self, options: EditorOptions) -> Self {
        self.editor_options = options;
        self
    }

    /// Records shown on the post list screen.
    pub fn with_posts(mut self, posts: Vec<PostRecord>) -> Self {
        self.posts = posts;
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
