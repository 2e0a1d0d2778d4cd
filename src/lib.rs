// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. editor::EditorView)
    clippy::module_name_repetitions
)]

//! # Postdesk
//!
//! Terminal components for a small blog admin:
//! - A post editor with a title field, a markdown body, and a Write/Preview
//!   toggle, reporting edits to its host after a quiet period
//! - A static admin login form
//! - A post list with human-readable publication dates
//!
//! ## Architecture
//!
//! Postdesk uses The Elm Architecture (TEA) pattern:
//! - **Model**: Application state
//! - **Message**: Events and actions
//! - **Update**: Pure state transitions
//! - **View**: Render to terminal
//!
//! ## Modules
//!
//! - [`app`]: Main application loop and state
//! - [`editor`]: The post editor component and its debounce timers
//! - [`markdown`]: Markdown rendering for the preview
//! - [`posts`]: Post records, cards and date formatting
//! - [`ui`]: Terminal UI components
//! - [`highlight`]: Syntax highlighting
//! - [`config`]: Saved command-line defaults

pub mod app;
pub mod config;
pub mod editor;
pub mod highlight;
pub mod markdown;
pub mod posts;
pub mod ui;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model, Screen};
    pub use crate::editor::{EditableDocument, EditorCallbacks, EditorOptions, PostEditor};
    pub use crate::posts::{PostCard, PostRecord, format_post_date};
}
