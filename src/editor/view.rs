//! Pure view description of the editor.
//!
//! [`describe`] turns editor state into plain data; the terminal renderer
//! draws from that, and tests can assert on it without a backend.

use super::{CONTENT_PLACEHOLDER, Field, PostEditor, TITLE_PLACEHOLDER, ViewMode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleView {
    /// The title, or the placeholder when empty.
    pub text: String,
    pub is_placeholder: bool,
    pub focused: bool,
    pub cursor_col: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabView {
    pub mode: ViewMode,
    pub label: &'static str,
    pub active: bool,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionView {
    pub label: &'static str,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorBody {
    /// The content text area.
    Write {
        lines: Vec<String>,
        is_placeholder: bool,
        focused: bool,
        /// (line, column) when the content field has focus.
        cursor: Option<(usize, usize)>,
    },
    /// Rendered markdown; drawn from [`PostEditor::preview`].
    Preview,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorView {
    pub title: TitleView,
    pub tabs: [TabView; 2],
    pub publish: Option<ActionView>,
    pub delete: Option<ActionView>,
    pub body: EditorBody,
    pub disabled: bool,
}

pub fn describe(editor: &PostEditor) -> EditorView {
    let options = editor.options();
    let enabled = editor.is_mounted() && !options.disabled;
    let title_focused = enabled && editor.focus() == Field::Title;
    let content_focused = enabled && editor.focus() == Field::Content;

    let title_text = editor.title();
    let title = TitleView {
        is_placeholder: title_text.is_empty(),
        text: if title_text.is_empty() {
            TITLE_PLACEHOLDER.to_string()
        } else {
            title_text
        },
        focused: title_focused,
        cursor_col: title_focused.then(|| editor.title_area().cursor().col),
    };

    let tab = |mode: ViewMode| TabView {
        mode,
        label: mode.label(),
        active: editor.mode() == mode,
        enabled,
    };

    let body = match editor.mode() {
        ViewMode::Preview => EditorBody::Preview,
        ViewMode::Write => {
            let area = editor.content_area();
            let is_placeholder = area.is_empty();
            let lines = if is_placeholder {
                vec![CONTENT_PLACEHOLDER.to_string()]
            } else {
                (0..area.line_count())
                    .filter_map(|idx| area.line_at(idx))
                    .collect()
            };
            let cursor = area.cursor();
            EditorBody::Write {
                lines,
                is_placeholder,
                focused: content_focused,
                cursor: content_focused.then_some((cursor.line, cursor.col)),
            }
        }
    };

    EditorView {
        title,
        tabs: [tab(ViewMode::Write), tab(ViewMode::Preview)],
        publish: options
            .show_publish_button
            .then_some(ActionView {
                label: "Publish",
                enabled,
            }),
        delete: options.show_delete_button.then_some(ActionView {
            label: "Delete",
            enabled,
        }),
        body,
        disabled: options.disabled,
    }
}
