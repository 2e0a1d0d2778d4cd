//! Host-facing behavior of the post editor, driven through the public API.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use proptest::prelude::*;

use postdesk::editor::{
    EditableDocument, EditorCallbacks, EditorInput, EditorOptions, Field, PREVIEW_PLACEHOLDER,
    PostEditor, Preview, TITLE_MAX_CHARS, ViewMode, describe,
};
use postdesk::markdown::{ComrakRenderer, MarkdownRenderer, RenderError, RenderedMarkdown};

type Log = Rc<RefCell<Vec<String>>>;

fn logging_callbacks(log: &Log) -> EditorCallbacks {
    let (changes, publishes, deletes) = (Rc::clone(log), Rc::clone(log), Rc::clone(log));
    EditorCallbacks::new()
        .on_change(move |title, content| {
            changes.borrow_mut().push(format!("change {title}|{content}"));
        })
        .on_publish(move |title, content| {
            publishes.borrow_mut().push(format!("publish {title}|{content}"));
        })
        .on_delete(move || deletes.borrow_mut().push("delete".to_string()))
}

fn mount(options: EditorOptions) -> (PostEditor, Log) {
    let log = Log::default();
    let editor = PostEditor::mount(options, logging_callbacks(&log));
    (editor, log)
}

fn type_text(editor: &mut PostEditor, text: &str, start_ms: u64, step_ms: u64) -> u64 {
    let mut now = start_ms;
    for c in text.chars() {
        editor.apply_input(EditorInput::Char(c), now);
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

struct Broken;

impl MarkdownRenderer for Broken {
    fn render(&self, _source: &str, _width: u16) -> Result<RenderedMarkdown, RenderError> {
        Err(RenderError::Failed("unsupported syntax".to_string()))
    }
}

struct Exploding;

impl MarkdownRenderer for Exploding {
    fn render(&self, _source: &str, _width: u16) -> Result<RenderedMarkdown, RenderError> {
        panic!("renderer bug");
    }
}

fn previewing(renderer: impl MarkdownRenderer + 'static) -> PostEditor {
    let options = EditorOptions::default().with_initial_data(EditableDocument::new("", "# Hi"));
    let (editor, _) = mount(options);
    let mut editor = editor.with_renderer(renderer);
    editor.select_mode(ViewMode::Preview);
    editor
}

#[test]
fn test_mount_with_initial_data_stays_silent() {
    let options = EditorOptions::default()
        .with_debounce_ms(100)
        .with_initial_data(EditableDocument::new("T", "C"));
    let (mut editor, log) = mount(options);
    for now in [0, 50, 100, 250] {
        editor.tick(now);
    }
    assert!(log.borrow().is_empty());
}

#[test]
fn test_content_burst_settles_once_with_final_value() {
    let (mut editor, log) = mount(EditorOptions::default().with_debounce_ms(100));
    editor.set_focus(Field::Content);
    let last = type_text(&mut editor, "hello", 0, 30);

    assert!(!editor.tick(last + 99));
    assert!(log.borrow().is_empty());

    assert!(editor.tick(last + 100));
    assert_eq!(*log.borrow(), vec!["change |hello".to_string()]);

    editor.tick(last + 1_000);
    assert_eq!(log.borrow().len(), 1);
}

#[test]
fn test_title_and_content_timers_run_independently() {
    let (mut editor, log) = mount(EditorOptions::default().with_debounce_ms(100));
    editor.apply_input(EditorInput::Char('T'), 0);
    editor.set_focus(Field::Content);
    editor.apply_input(EditorInput::Char('c'), 80);

    editor.tick(100);
    assert_eq!(*log.borrow(), vec!["change T|".to_string()]);
    editor.tick(180);
    assert_eq!(log.borrow().last().map(String::as_str), Some("change T|c"));
}

#[test]
fn test_empty_preview_shows_placeholder_without_rendering() {
    let calls = Rc::new(Cell::new(0));
    let (editor, _) = mount(EditorOptions::default());
    let mut editor = editor.with_renderer(Counting(Rc::clone(&calls)));
    editor.select_mode(ViewMode::Preview);

    let preview = editor.preview(60);
    assert_eq!(preview, &Preview::Placeholder);
    assert_eq!(preview.plain_text(), PREVIEW_PLACEHOLDER);
    assert_eq!(calls.get(), 0);
}

#[test]
fn test_preview_renders_once_per_content_change() {
    let calls = Rc::new(Cell::new(0));
    let options =
        EditorOptions::default().with_initial_data(EditableDocument::new("", "**bold** words"));
    let (editor, _) = mount(options);
    let mut editor = editor.with_renderer(Counting(Rc::clone(&calls)));
    editor.select_mode(ViewMode::Preview);

    assert!(editor.preview(60).plain_text().contains("bold words"));
    editor.preview(60);
    assert_eq!(calls.get(), 1);

    editor.select_mode(ViewMode::Write);
    editor.set_focus(Field::Content);
    editor.apply_input(EditorInput::End, 0);
    editor.apply_input(EditorInput::Char('!'), 0);
    editor.select_mode(ViewMode::Preview);
    assert!(editor.preview(60).plain_text().contains("words!"));
    assert_eq!(calls.get(), 2);
}

#[test]
fn test_failing_renderer_yields_fallback_line() {
    let mut editor = previewing(Broken);
    let preview = editor.preview(60);
    assert_eq!(preview, &Preview::Failed("unsupported syntax".to_string()));
    assert_eq!(preview.plain_text(), "Unable to render preview: unsupported syntax");
}

#[test]
fn test_panicking_renderer_yields_fallback_line() {
    let mut editor = previewing(Exploding);
    let preview = editor.preview(60);
    assert!(matches!(preview, Preview::Failed(_)));
    assert_eq!(preview.plain_text(), "Unable to render preview: renderer bug");
}

#[test]
fn test_disabled_actions_are_shown_but_inert() {
    let options = EditorOptions::default()
        .with_publish_button(true)
        .with_delete_button(true)
        .with_disabled(true);
    let (mut editor, log) = mount(options);

    let view = describe(&editor);
    assert!(view.publish.is_some_and(|action| !action.enabled));
    assert!(view.delete.is_some_and(|action| !action.enabled));

    assert!(!editor.publish());
    assert!(!editor.delete());
    assert!(log.borrow().is_empty());
}

#[test]
fn test_enabled_actions_reach_callbacks() {
    let options = EditorOptions::default()
        .with_publish_button(true)
        .with_delete_button(true)
        .with_initial_data(EditableDocument::new("Title", "Body"));
    let (mut editor, log) = mount(options);

    assert!(editor.publish());
    assert!(editor.delete());
    assert_eq!(
        *log.borrow(),
        vec!["publish Title|Body".to_string(), "delete".to_string()]
    );
}

#[test]
fn test_unmount_cancels_pending_change() {
    let (mut editor, log) = mount(EditorOptions::default().with_debounce_ms(100));
    editor.apply_input(EditorInput::Char('x'), 0);
    editor.unmount();

    assert!(!editor.tick(100));
    assert!(!editor.tick(10_000));
    assert!(log.borrow().is_empty());
    assert_eq!(editor.next_deadline(), None);
}

fn title_input() -> impl Strategy<Value = EditorInput> {
    prop_oneof![
        4 => any::<char>().prop_map(EditorInput::Char),
        1 => "[a-zA-Z0-9 ]{0,80}".prop_map(EditorInput::Paste),
        1 => Just(EditorInput::DeleteBack),
        1 => Just(EditorInput::Home),
        1 => Just(EditorInput::End),
    ]
}

proptest! {
    #[test]
    fn test_title_never_exceeds_cap(inputs in prop::collection::vec(title_input(), 0..400)) {
        let (mut editor, _) = mount(EditorOptions::default());
        for (now, input) in (0u64..).zip(inputs) {
            editor.apply_input(input, now);
            prop_assert!(editor.title().chars().count() <= TITLE_MAX_CHARS);
        }
    }
}
