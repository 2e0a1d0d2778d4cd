//! Terminal UI components.
//!
//! - [`render`]: Screen dispatch, footer bars and overlays
//! - [`style`]: Markdown line and inline styling

pub mod style;

mod editor;
mod login;
mod overlays;
mod posts;
mod render;
mod status;

pub use render::render;

/// Heading shown on the login screen.
pub const LOGIN_HEADING: &str = "Welcome To The Admin Login";
