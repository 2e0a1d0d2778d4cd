use crate::app::Model;
use crate::app::model::Screen;
use crate::editor::{EditorInput, ViewMode};

/// All possible events and actions in the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Editor
    /// Keystroke for the focused field, stamped with the loop clock
    Edit(EditorInput, u64),
    /// Move focus between title and content
    FocusNext,
    /// Switch between Write and Preview
    ToggleMode,
    /// Select a specific tab
    SelectMode(ViewMode),
    Publish,
    Delete,
    /// Clock tick for debounce settlement
    Tick(u64),

    // Navigation
    /// Switch the visible screen
    ShowScreen(Screen),
    /// Scroll up by n lines (preview) or cards (post list)
    ScrollUp(usize),
    /// Scroll down by n lines or cards
    ScrollDown(usize),
    PageUp,
    PageDown,

    /// Toggle help overlay
    ToggleHelp,
    /// Hide help overlay
    HideHelp,

    // Window
    /// Terminal resized
    Resize(u16, u16),

    // Application
    /// Quit the application
    Quit,
}

/// Pure state transition.
///
/// Editor callbacks fired from here only enqueue host events; the event loop
/// turns those into toasts and the session outcome.
pub fn update(mut model: Model, msg: Message) -> Model {
    match msg {
        Message::Edit(input, now_ms) => {
            if model.screen == Screen::Editor {
                model.editor.apply_input(input, now_ms);
            }
        }
        Message::FocusNext => model.editor.focus_next(),
        Message::ToggleMode => {
            if model.editor.toggle_mode() {
                model.preview_scroll = 0;
            }
        }
        Message::SelectMode(mode) => {
            if model.editor.select_mode(mode) {
                model.preview_scroll = 0;
            }
        }
        Message::Publish => {
            model.editor.publish();
        }
        Message::Delete => {
            model.editor.delete();
        }
        Message::Tick(now_ms) => {
            model.editor.tick(now_ms);
        }

        Message::ShowScreen(screen) => {
            model.screen = screen;
            model.help_visible = false;
        }
        Message::ScrollUp(n) => scroll_by(&mut model, -isize_from(n)),
        Message::ScrollDown(n) => scroll_by(&mut model, isize_from(n)),
        Message::PageUp => {
            let page = page_size(&model);
            scroll_by(&mut model, -isize_from(page));
        }
        Message::PageDown => {
            let page = page_size(&model);
            scroll_by(&mut model, isize_from(page));
        }

        Message::ToggleHelp => {
            model.help_visible = !model.help_visible;
        }
        Message::HideHelp => {
            model.help_visible = false;
        }
        Message::Resize(width, height) => {
            model.terminal_size = (width, height);
        }
        Message::Quit => {
            model.editor.unmount();
            model.should_quit = true;
        }
    }
    model
}

fn isize_from(n: usize) -> isize {
    isize::try_from(n).unwrap_or(isize::MAX)
}

fn page_size(model: &Model) -> usize {
    match model.screen {
        Screen::Posts => 3,
        Screen::Editor | Screen::Login => model.preview_page_rows(),
    }
}

fn scroll_by(model: &mut Model, delta: isize) {
    match model.screen {
        Screen::Editor if model.editor.mode() == ViewMode::Preview => {
            // Upper bound is clamped at render time, once the line count is known.
            model.preview_scroll = model.preview_scroll.saturating_add_signed(delta);
        }
        Screen::Posts => {
            let max = model.posts.len().saturating_sub(1);
            model.posts_scroll = model.posts_scroll.saturating_add_signed(delta).min(max);
        }
        Screen::Editor | Screen::Login => {}
    }
}
