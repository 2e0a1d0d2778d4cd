use std::path::PathBuf;
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::editor::{EditableDocument, PostEditor};
use crate::posts::PostCard;

use super::effects::HostEvent;

/// Rows taken by the title box and the tab bar above the editor body.
const EDITOR_CHROME_ROWS: u16 = 4;
/// Rows taken by the body border and the status bar.
const FRAME_ROWS: u16 = 3;

/// Which component fills the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Editor,
    Posts,
    Login,
}

impl Screen {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Editor => "Editor",
            Self::Posts => "Posts",
            Self::Login => "Login",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
}

#[derive(Debug, Clone)]
struct Toast {
    level: ToastLevel,
    message: String,
    expires_at: Instant,
}

/// What the session asked the host to do, printed on exit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum SessionOutcome {
    Publish { title: String, content: String },
    Delete,
}

/// The complete application state.
pub struct Model {
    pub screen: Screen,
    /// The mounted post editor
    pub editor: PostEditor,
    /// Cards for the post list screen
    pub posts: Vec<PostCard>,
    /// First visible line of the preview
    pub preview_scroll: usize,
    /// First visible card of the post list
    pub posts_scroll: usize,
    pub terminal_size: (u16, u16),
    /// Whether help overlay is visible
    pub help_visible: bool,
    /// Global config path shown in help
    pub config_global_path: Option<PathBuf>,
    /// Local override path shown in help
    pub config_local_path: Option<PathBuf>,
    /// Last settled document reported through `on_change`
    pub last_settled: Option<EditableDocument>,
    /// Last publish or delete request
    pub outcome: Option<SessionOutcome>,
    toast: Option<Toast>,
    host_events: Option<Receiver<HostEvent>>,
    /// Whether the app should quit
    pub should_quit: bool,
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("screen", &self.screen)
            .field("editor", &self.editor)
            .field("posts", &self.posts.len())
            .field("help_visible", &self.help_visible)
            .field("outcome", &self.outcome)
            .finish_non_exhaustive()
    }
}

impl Model {
    pub fn new(editor: PostEditor, posts: Vec<PostCard>, terminal_size: (u16, u16)) -> Self {
        Self {
            editor,
            posts,
            terminal_size,
            ..Self::default()
        }
    }

    /// Receive host callback events from the editor.
    pub fn with_host_events(mut self, events: Receiver<HostEvent>) -> Self {
        self.host_events = Some(events);
        self
    }

    pub const fn with_screen(mut self, screen: Screen) -> Self {
        self.screen = screen;
        self
    }

    /// Preview rows visible at the current terminal size.
    pub(super) fn preview_page_rows(&self) -> usize {
        usize::from(
            self.terminal_size
                .1
                .saturating_sub(EDITOR_CHROME_ROWS + FRAME_ROWS)
                .max(1),
        )
    }

    pub(super) fn take_host_events(&mut self) -> Vec<HostEvent> {
        self.host_events
            .as_ref()
            .map(|rx| rx.try_iter().collect())
            .unwrap_or_default()
    }

    pub(super) fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(Toast {
            level,
            message: message.into(),
            expires_at: Instant::now() + Duration::from_secs(4),
        });
    }

    pub(super) fn expire_toast(&mut self, now: Instant) -> bool {
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| toast.expires_at <= now)
        {
            self.toast = None;
            return true;
        }
        false
    }

    pub fn active_toast(&self) -> Option<(&str, ToastLevel)> {
        self.toast
            .as_ref()
            .map(|toast| (toast.message.as_str(), toast.level))
    }
}

// Implement Default for Model to allow std::mem::take
impl Default for Model {
    fn default() -> Self {
        Self {
            screen: Screen::Editor,
            editor: PostEditor::default(),
            posts: Vec::new(),
            preview_scroll: 0,
            posts_scroll: 0,
            terminal_size: (80, 24),
            help_visible: false,
            config_global_path: None,
            config_local_path: None,
            last_settled: None,
            outcome: None,
            toast: None,
            host_events: None,
            should_quit: false,
        }
    }
}
