//! The post editor state container.
//!
//! [`PostEditor`] owns the live title and content, the Write/Preview mode, and
//! one [`Debouncer`] per field. Keystrokes update the live values and re-arm
//! that field's timer; [`PostEditor::tick`] releases settled values and, when
//! the settled pair changes, calls `on_change` with it.
//!
//! Time is passed in as a monotonic millisecond counter so the debounce
//! behavior is deterministic in tests.

mod debounce;
mod preview;
mod text;
mod view;

pub use debounce::Debouncer;
pub use preview::Preview;
pub use text::{Cursor, Direction, TextArea};
pub use view::{ActionView, EditorBody, EditorView, TabView, TitleView, describe};

use serde::{Deserialize, Serialize};

use crate::markdown::{ComrakRenderer, MarkdownRenderer};
use preview::PreviewCache;

/// Hard cap on title length, in characters.
pub const TITLE_MAX_CHARS: usize = 150;
/// Default quiet period before an edit settles.
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;
pub const PREVIEW_PLACEHOLDER: &str = "Nothing to preview yet....";
pub const TITLE_PLACEHOLDER: &str = "Title....";
pub const CONTENT_PLACEHOLDER: &str = "Tell your story...";

/// Title and content of a post.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditableDocument {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

impl EditableDocument {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Write,
    Preview,
}

impl ViewMode {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Write => "Write",
            Self::Preview => "Preview",
        }
    }

    pub const fn toggled(self) -> Self {
        match self {
            Self::Write => Self::Preview,
            Self::Preview => Self::Write,
        }
    }
}

/// Which input has keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Field {
    #[default]
    Title,
    Content,
}

/// Editor configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorOptions {
    pub initial_data: Option<EditableDocument>,
    pub show_delete_button: bool,
    pub show_publish_button: bool,
    pub disabled: bool,
    pub debounce_delay_ms: u64,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            initial_data: None,
            show_delete_button: false,
            show_publish_button: false,
            disabled: false,
            debounce_delay_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

impl EditorOptions {
    pub fn with_initial_data(mut self, data: EditableDocument) -> Self {
        self.initial_data = Some(data);
        self
    }

    pub const fn with_publish_button(mut self, show: bool) -> Self {
        self.show_publish_button = show;
        self
    }

    pub const fn with_delete_button(mut self, show: bool) -> Self {
        self.show_delete_button = show;
        self
    }

    pub const fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub const fn with_debounce_ms(mut self, delay_ms: u64) -> Self {
        self.debounce_delay_ms = delay_ms;
        self
    }
}

type PairCallback = Box<dyn FnMut(&str, &str)>;
type ActionCallback = Box<dyn FnMut()>;

/// Host hooks. Unset hooks are no-ops.
#[derive(Default)]
pub struct EditorCallbacks {
    on_change: Option<PairCallback>,
    on_publish: Option<PairCallback>,
    on_delete: Option<ActionCallback>,
}

impl std::fmt::Debug for EditorCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorCallbacks")
            .field("on_change", &self.on_change.is_some())
            .field("on_publish", &self.on_publish.is_some())
            .field("on_delete", &self.on_delete.is_some())
            .finish()
    }
}

impl EditorCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called with the settled (title, content) pair.
    pub fn on_change(mut self, callback: impl FnMut(&str, &str) + 'static) -> Self {
        self.on_change = Some(Box::new(callback));
        self
    }

    /// Called with the live (title, content) pair.
    pub fn on_publish(mut self, callback: impl FnMut(&str, &str) + 'static) -> Self {
        self.on_publish = Some(Box::new(callback));
        self
    }

    pub fn on_delete(mut self, callback: impl FnMut() + 'static) -> Self {
        self.on_delete = Some(Box::new(callback));
        self
    }
}

/// Keyboard-level edits to the focused field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorInput {
    Char(char),
    Paste(String),
    Newline,
    DeleteBack,
    DeleteForward,
    Move(Direction),
    Home,
    End,
}

/// A mounted post editor.
pub struct PostEditor {
    options: EditorOptions,
    callbacks: EditorCallbacks,
    title: TextArea,
    content: TextArea,
    mode: ViewMode,
    focus: Field,
    title_timer: Debouncer<String>,
    content_timer: Debouncer<String>,
    debounced: EditableDocument,
    suppress_next_emission: bool,
    mounted: bool,
    renderer: Box<dyn MarkdownRenderer>,
    preview: PreviewCache,
}

impl std::fmt::Debug for PostEditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostEditor")
            .field("options", &self.options)
            .field("mode", &self.mode)
            .field("focus", &self.focus)
            .field("debounced", &self.debounced)
            .field("mounted", &self.mounted)
            .finish_non_exhaustive()
    }
}

impl Default for PostEditor {
    /// An unmounted, inert editor.
    fn default() -> Self {
        Self {
            options: EditorOptions::default(),
            callbacks: EditorCallbacks::default(),
            title: TextArea::single_line("", TITLE_MAX_CHARS),
            content: TextArea::multi_line(""),
            mode: ViewMode::Write,
            focus: Field::Title,
            title_timer: Debouncer::new(DEFAULT_DEBOUNCE_MS),
            content_timer: Debouncer::new(DEFAULT_DEBOUNCE_MS),
            debounced: EditableDocument::default(),
            suppress_next_emission: true,
            mounted: false,
            renderer: Box::new(ComrakRenderer),
            preview: PreviewCache::default(),
        }
    }
}

impl PostEditor {
    /// Create the editor and run its mount effect.
    ///
    /// The debounced values start equal to the initial values, and the first
    /// change notification (the one the mount itself would trigger) is
    /// swallowed.
    pub fn mount(options: EditorOptions, callbacks: EditorCallbacks) -> Self {
        let initial = options.initial_data.clone().unwrap_or_default();
        let delay = options.debounce_delay_ms;
        let mut editor = Self {
            title: TextArea::single_line(&initial.title, TITLE_MAX_CHARS),
            content: TextArea::multi_line(&initial.content),
            title_timer: Debouncer::new(delay),
            content_timer: Debouncer::new(delay),
            options,
            callbacks,
            mounted: true,
            ..Self::default()
        };
        editor.debounced = editor.document();
        tracing::debug!(
            title_chars = editor.title.len_chars(),
            content_chars = editor.content.len_chars(),
            delay_ms = delay,
            "editor mounted"
        );
        editor.run_change_effect();
        editor
    }

    /// Swap the markdown renderer used by the Preview tab.
    pub fn with_renderer(mut self, renderer: impl MarkdownRenderer + 'static) -> Self {
        self.renderer = Box::new(renderer);
        self.preview.clear();
        self
    }

    pub const fn options(&self) -> &EditorOptions {
        &self.options
    }

    pub const fn mode(&self) -> ViewMode {
        self.mode
    }

    pub const fn focus(&self) -> Field {
        self.focus
    }

    pub const fn is_mounted(&self) -> bool {
        self.mounted
    }

    const fn is_interactive(&self) -> bool {
        self.mounted && !self.options.disabled
    }

    pub fn title(&self) -> String {
        self.title.text()
    }

    pub fn content(&self) -> String {
        self.content.text()
    }

    pub const fn title_area(&self) -> &TextArea {
        &self.title
    }

    pub const fn content_area(&self) -> &TextArea {
        &self.content
    }

    /// Live title and content.
    pub fn document(&self) -> EditableDocument {
        EditableDocument::new(self.title(), self.content())
    }

    /// Last settled title and content.
    pub const fn debounced(&self) -> &EditableDocument {
        &self.debounced
    }

    /// Apply a keystroke to the focused field.
    ///
    /// Returns `true` if the live document changed. Inert when disabled,
    /// unmounted, or when the content field is focused in Preview mode.
    pub fn apply_input(&mut self, input: EditorInput, now_ms: u64) -> bool {
        if !self.is_interactive() {
            return false;
        }
        match self.focus {
            Field::Title => {
                if input == EditorInput::Newline {
                    self.focus = Field::Content;
                    return false;
                }
                let changed = apply_to_area(&mut self.title, input);
                if changed {
                    self.title_timer.queue(self.title.text(), now_ms);
                }
                changed
            }
            Field::Content => {
                if self.mode == ViewMode::Preview {
                    return false;
                }
                let changed = apply_to_area(&mut self.content, input);
                if changed {
                    self.content_timer.queue(self.content.text(), now_ms);
                }
                changed
            }
        }
    }

    /// Select a tab. Returns `true` if the mode changed.
    pub fn select_mode(&mut self, mode: ViewMode) -> bool {
        if !self.is_interactive() || self.mode == mode {
            return false;
        }
        tracing::debug!(mode = mode.label(), "editor mode selected");
        self.mode = mode;
        true
    }

    pub fn toggle_mode(&mut self) -> bool {
        self.select_mode(self.mode.toggled())
    }

    pub fn set_focus(&mut self, field: Field) {
        if self.is_interactive() {
            self.focus = field;
        }
    }

    pub fn focus_next(&mut self) {
        let next = match self.focus {
            Field::Title => Field::Content,
            Field::Content => Field::Title,
        };
        self.set_focus(next);
    }

    /// Release settled fields and notify `on_change` if the settled pair moved.
    ///
    /// Returns `true` if `on_change` fired. A no-op once unmounted.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        if !self.mounted {
            return false;
        }
        let mut next = self.debounced.clone();
        if let Some(title) = self.title_timer.take_ready(now_ms) {
            next.title = title;
        }
        if let Some(content) = self.content_timer.take_ready(now_ms) {
            next.content = content;
        }
        if next == self.debounced {
            return false;
        }
        self.debounced = next;
        self.run_change_effect()
    }

    /// Earliest pending debounce deadline.
    pub fn next_deadline(&self) -> Option<u64> {
        match (self.title_timer.deadline(), self.content_timer.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Send the live document to `on_publish`.
    ///
    /// Returns `true` if the callback ran.
    pub fn publish(&mut self) -> bool {
        if !self.is_interactive() || !self.options.show_publish_button {
            return false;
        }
        let (title, content) = (self.title(), self.content());
        tracing::info!(
            title = %title,
            content_chars = content.chars().count(),
            "publish requested"
        );
        if let Some(callback) = self.callbacks.on_publish.as_mut() {
            callback(&title, &content);
        }
        true
    }

    /// Fire `on_delete`. Returns `true` if the callback ran.
    pub fn delete(&mut self) -> bool {
        if !self.is_interactive() || !self.options.show_delete_button {
            return false;
        }
        tracing::info!("delete requested");
        if let Some(callback) = self.callbacks.on_delete.as_mut() {
            callback();
        }
        true
    }

    /// Cancel pending timers. No callback fires after this.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.title_timer.cancel();
        self.content_timer.cancel();
        self.mounted = false;
        tracing::debug!("editor unmounted");
    }

    /// The preview for the live content at `width` columns.
    ///
    /// The renderer only runs when the (content, width) pair changes.
    pub fn preview(&mut self, width: u16) -> &Preview {
        let content = self.content.text();
        self.preview.get(self.renderer.as_ref(), &content, width)
    }

    fn run_change_effect(&mut self) -> bool {
        if self.suppress_next_emission {
            self.suppress_next_emission = false;
            return false;
        }
        tracing::debug!(
            title = %self.debounced.title,
            content_chars = self.debounced.content.chars().count(),
            "edit settled"
        );
        if let Some(callback) = self.callbacks.on_change.as_mut() {
            callback(&self.debounced.title, &self.debounced.content);
        }
        true
    }
}

fn apply_to_area(area: &mut TextArea, input: EditorInput) -> bool {
    match input {
        EditorInput::Char(ch) => area.insert_char(ch),
        EditorInput::Paste(text) => area.insert_str(&text),
        EditorInput::Newline => area.split_line(),
        EditorInput::DeleteBack => area.delete_back(),
        EditorInput::DeleteForward => area.delete_forward(),
        EditorInput::Move(direction) => {
            area.move_cursor(direction);
            false
        }
        EditorInput::Home => {
            area.move_home();
            false
        }
        EditorInput::End => {
            area.move_end();
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use super::*;
    use crate::markdown::{RenderError, RenderedMarkdown};

    type Log = Rc<RefCell<Vec<(String, String)>>>;

    fn recording(options: EditorOptions) -> (PostEditor, Log) {
        let log: Log = Rc::default();
        let sink = Rc::clone(&log);
        let callbacks = EditorCallbacks::new()
            .on_change(move |t, c| sink.borrow_mut().push((t.to_string(), c.to_string())));
        (PostEditor::mount(options, callbacks), log)
    }

    fn type_str(editor: &mut PostEditor, text: &str, start_ms: u64, step_ms: u64) -> u64 {
        let mut now = start_ms;
        for ch in text.chars() {
            editor.apply_input(EditorInput::Char(ch), now);
            editor.tick(now);
            now += step_ms;
        }
        now - step_ms
    }

    struct Counting(Rc<Cell<usize>>);

    impl MarkdownRenderer for Counting {
        fn render(&self, source: &str, width: u16) -> Result<RenderedMarkdown, RenderError> {
            self.0.set(self.0.get() + 1);
            ComrakRenderer.render(source, width)
        }
    }

    // --- Mount ---

    #[test]
    fn test_mount_seeds_live_and_debounced_values() {
        let options = EditorOptions::default().with_initial_data(EditableDocument::new("T", "C"));
        let (editor, log) = recording(options);
        assert_eq!(editor.title(), "T");
        assert_eq!(editor.content(), "C");
        assert_eq!(editor.debounced(), &EditableDocument::new("T", "C"));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_mount_without_initial_data_is_empty_write_mode() {
        let (editor, _) = recording(EditorOptions::default());
        assert_eq!(editor.document(), EditableDocument::default());
        assert_eq!(editor.mode(), ViewMode::Write);
        assert_eq!(editor.focus(), Field::Title);
    }

    #[test]
    fn test_mount_does_not_emit_within_window() {
        let options = EditorOptions::default().with_initial_data(EditableDocument::new("T", "C"));
        let (mut editor, log) = recording(options);
        for now in (0..=1_000).step_by(50) {
            editor.tick(now);
        }
        assert!(log.borrow().is_empty());
    }

    // --- Debounce ---

    #[test]
    fn test_burst_emits_once_with_final_value() {
        let (mut editor, log) = recording(EditorOptions::default().with_debounce_ms(500));
        editor.set_focus(Field::Content);
        let last = type_str(&mut editor, "hello", 0, 100);
        assert!(!editor.tick(last + 499));
        assert!(editor.tick(last + 500));
        assert_eq!(*log.borrow(), vec![(String::new(), "hello".to_string())]);
        assert!(!editor.tick(last + 5_000));
    }

    #[test]
    fn test_title_and_content_settle_independently() {
        let (mut editor, log) = recording(EditorOptions::default().with_debounce_ms(100));
        editor.apply_input(EditorInput::Char('T'), 0);
        editor.set_focus(Field::Content);
        editor.apply_input(EditorInput::Char('c'), 50);
        editor.tick(100);
        editor.tick(150);
        assert_eq!(
            *log.borrow(),
            vec![
                ("T".to_string(), String::new()),
                ("T".to_string(), "c".to_string()),
            ]
        );
    }

    #[test]
    fn test_revert_within_window_does_not_emit() {
        let (mut editor, log) = recording(EditorOptions::default().with_debounce_ms(100));
        editor.apply_input(EditorInput::Char('x'), 0);
        editor.apply_input(EditorInput::DeleteBack, 10);
        assert!(!editor.tick(200));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_next_deadline_tracks_earliest_timer() {
        let (mut editor, _) = recording(EditorOptions::default().with_debounce_ms(100));
        assert_eq!(editor.next_deadline(), None);
        editor.apply_input(EditorInput::Char('a'), 10);
        editor.set_focus(Field::Content);
        editor.apply_input(EditorInput::Char('b'), 40);
        assert_eq!(editor.next_deadline(), Some(110));
    }

    // --- Title ---

    #[test]
    fn test_title_is_capped() {
        let (mut editor, _) = recording(EditorOptions::default());
        editor.apply_input(EditorInput::Paste("x".repeat(200)), 0);
        assert_eq!(editor.title().chars().count(), TITLE_MAX_CHARS);
        assert!(!editor.apply_input(EditorInput::Char('y'), 1));
    }

    #[test]
    fn test_enter_in_title_moves_focus_to_content() {
        let (mut editor, _) = recording(EditorOptions::default());
        editor.apply_input(EditorInput::Newline, 0);
        assert_eq!(editor.focus(), Field::Content);
        assert_eq!(editor.title(), "");
    }

    // --- Modes ---

    #[test]
    fn test_content_keys_ignored_in_preview() {
        let (mut editor, _) = recording(EditorOptions::default());
        editor.set_focus(Field::Content);
        assert!(editor.toggle_mode());
        assert!(!editor.apply_input(EditorInput::Char('a'), 0));
        assert_eq!(editor.content(), "");
    }

    #[test]
    fn test_disabled_editor_is_inert() {
        let options = EditorOptions::default()
            .with_disabled(true)
            .with_publish_button(true)
            .with_delete_button(true);
        let calls = Rc::new(Cell::new(0));
        let (a, b) = (Rc::clone(&calls), Rc::clone(&calls));
        let callbacks = EditorCallbacks::new()
            .on_publish(move |_, _| a.set(a.get() + 1))
            .on_delete(move || b.set(b.get() + 1));
        let mut editor = PostEditor::mount(options, callbacks);
        assert!(!editor.apply_input(EditorInput::Char('a'), 0));
        assert!(!editor.select_mode(ViewMode::Preview));
        assert!(!editor.publish());
        assert!(!editor.delete());
        assert_eq!(calls.get(), 0);
    }

    // --- Actions ---

    #[test]
    fn test_publish_sends_live_values() {
        let published: Log = Rc::default();
        let sink = Rc::clone(&published);
        let callbacks = EditorCallbacks::new()
            .on_publish(move |t, c| sink.borrow_mut().push((t.to_string(), c.to_string())));
        let mut editor = PostEditor::mount(
            EditorOptions::default().with_publish_button(true),
            callbacks,
        );
        editor.apply_input(EditorInput::Char('A'), 0);
        assert!(editor.publish());
        assert_eq!(*published.borrow(), vec![("A".to_string(), String::new())]);
    }

    #[test]
    fn test_hidden_actions_do_not_fire() {
        let (mut editor, _) = recording(EditorOptions::default());
        assert!(!editor.publish());
        assert!(!editor.delete());
    }

    // --- Unmount ---

    #[test]
    fn test_unmount_cancels_pending_settlement() {
        let (mut editor, log) = recording(EditorOptions::default().with_debounce_ms(100));
        editor.apply_input(EditorInput::Char('a'), 0);
        editor.unmount();
        assert!(!editor.tick(1_000));
        assert!(log.borrow().is_empty());
        assert!(!editor.is_mounted());
        assert_eq!(editor.next_deadline(), None);
    }

    // --- Preview ---

    #[test]
    fn test_empty_preview_skips_renderer() {
        let count = Rc::new(Cell::new(0));
        let mut editor = PostEditor::mount(EditorOptions::default(), EditorCallbacks::new())
            .with_renderer(Counting(Rc::clone(&count)));
        assert_eq!(editor.preview(40), &Preview::Placeholder);
        assert_eq!(editor.preview(40).plain_text(), PREVIEW_PLACEHOLDER);
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_preview_renders_once_per_content_and_width() {
        let count = Rc::new(Cell::new(0));
        let options = EditorOptions::default().with_initial_data(EditableDocument::new("", "# Hi"));
        let mut editor = PostEditor::mount(options, EditorCallbacks::new())
            .with_renderer(Counting(Rc::clone(&count)));
        assert!(editor.preview(40).plain_text().contains("# Hi"));
        editor.preview(40);
        assert_eq!(count.get(), 1);
        editor.preview(60);
        assert_eq!(count.get(), 2);
        editor.set_focus(Field::Content);
        editor.apply_input(EditorInput::Char('!'), 0);
        editor.preview(60);
        assert_eq!(count.get(), 3);
    }
}
