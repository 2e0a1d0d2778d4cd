use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::{Model, Screen, ToastLevel};
use crate::editor::TITLE_MAX_CHARS;

pub fn render_status_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let detail = match model.screen {
        Screen::Editor => {
            let editor = &model.editor;
            let sync = if editor.next_deadline().is_some() {
                "[editing]"
            } else {
                "[synced]"
            };
            let disabled = if editor.options().disabled {
                " [disabled]"
            } else {
                ""
            };
            format!(
                "{}  Title {}/{}  {}{}",
                editor.mode().label(),
                editor.title_area().len_chars(),
                TITLE_MAX_CHARS,
                sync,
                disabled
            )
        }
        Screen::Posts if model.posts.is_empty() => "0 posts".to_string(),
        Screen::Posts => format!(
            "Card {}/{}",
            model.posts_scroll.min(model.posts.len() - 1) + 1,
            model.posts.len()
        ),
        Screen::Login => String::new(),
    };

    let status = format!(" {}  {}  F1:help", model.screen.label(), detail);
    let status_bar =
        Paragraph::new(status).style(Style::default().bg(Color::DarkGray).fg(Color::White));
    frame.render_widget(status_bar, area);
}

pub fn render_toast_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let Some((message, level)) = model.active_toast() else {
        return;
    };
    let (prefix, style) = match level {
        ToastLevel::Info => (
            "[info]",
            Style::default().bg(Color::DarkGray).fg(Color::White),
        ),
        ToastLevel::Warning => (
            "[warn]",
            Style::default().bg(Color::Yellow).fg(Color::Black),
        ),
    };
    frame.render_widget(Paragraph::new(format!("{prefix} {message}")).style(style), area);
}
