use std::sync::mpsc::{self, Receiver};

use crate::app::{App, Message, Model, SessionOutcome, ToastLevel};
use crate::editor::{EditableDocument, EditorCallbacks};

/// A callback invocation from the editor, queued for the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    Changed(EditableDocument),
    Published(EditableDocument),
    DeleteRequested,
}

/// Editor callbacks that forward every invocation to the returned receiver.
pub fn host_callbacks() -> (EditorCallbacks, Receiver<HostEvent>) {
    let (tx, rx) = mpsc::channel();
    let (change_tx, publish_tx, delete_tx) = (tx.clone(), tx.clone(), tx);
    let callbacks = EditorCallbacks::new()
        .on_change(move |title, content| {
            let _ = change_tx.send(HostEvent::Changed(EditableDocument::new(title, content)));
        })
        .on_publish(move |title, content| {
            let _ = publish_tx.send(HostEvent::Published(EditableDocument::new(title, content)));
        })
        .on_delete(move || {
            let _ = delete_tx.send(HostEvent::DeleteRequested);
        });
    (callbacks, rx)
}

impl App {
    pub(super) fn handle_message_side_effects(model: &mut Model, msg: &Message) {
        let events = model.take_host_events();
        let acted = events
            .iter()
            .any(|event| !matches!(event, HostEvent::Changed(_)));
        for event in events {
            apply_host_event(model, event);
        }

        match msg {
            Message::Publish if !acted => {
                model.show_toast(ToastLevel::Warning, unavailable_reason(model, "Publish"));
            }
            Message::Delete if !acted => {
                model.show_toast(ToastLevel::Warning, unavailable_reason(model, "Delete"));
            }
            _ => {}
        }
    }
}

fn apply_host_event(model: &mut Model, event: HostEvent) {
    match event {
        HostEvent::Changed(doc) => {
            tracing::debug!(title = %doc.title, "host received settled change");
            model.last_settled = Some(doc);
        }
        HostEvent::Published(doc) => {
            let label = if doc.title.is_empty() {
                "untitled post".to_string()
            } else {
                format!("\"{}\"", doc.title)
            };
            model.show_toast(ToastLevel::Info, format!("Published {label}"));
            model.outcome = Some(SessionOutcome::Publish {
                title: doc.title,
                content: doc.content,
            });
        }
        HostEvent::DeleteRequested => {
            model.show_toast(ToastLevel::Warning, "Delete requested");
            model.outcome = Some(SessionOutcome::Delete);
        }
    }
}

fn unavailable_reason(model: &Model, action: &str) -> String {
    let options = model.editor.options();
    let visible = match action {
        "Publish" => options.show_publish_button,
        _ => options.show_delete_button,
    };
    if !visible {
        format!("{action} is not enabled for this session")
    } else if options.disabled {
        format!("{action} unavailable: editor is disabled")
    } else {
        format!("{action} unavailable")
    }
}
