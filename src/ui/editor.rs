use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Padding, Paragraph};

use crate::app::Model;
use crate::editor::{EditorBody, EditorView, Preview, TabView, TitleView, describe};
use crate::markdown::RenderedLine;

use super::style::{border_style, placeholder_style, style_for_inline, style_for_line_type};

pub(super) fn render_editor(model: &mut Model, frame: &mut Frame, area: Rect) {
    let view = describe(&model.editor);
    let [title_area, bar_area, body_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(1),
        Constraint::Min(3),
    ])
    .areas(area);

    render_title(&view.title, view.disabled, frame, title_area);
    render_tab_bar(&view, frame, bar_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .padding(Padding::horizontal(1))
        .border_style(border_style(
            matches!(view.body, EditorBody::Write { focused: true, .. }),
            view.disabled,
        ));
    let inner = block.inner(body_area);
    frame.render_widget(block, body_area);

    match view.body {
        EditorBody::Write {
            lines,
            is_placeholder,
            cursor,
            ..
        } => render_write_body(&lines, is_placeholder, cursor, frame, inner),
        EditorBody::Preview => render_preview_body(model, frame, inner),
    }
}

fn render_title(title: &TitleView, disabled: bool, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .title(" Title ")
        .borders(Borders::ALL)
        .border_style(border_style(title.focused, disabled));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Scroll horizontally so the cursor stays inside the box.
    let width = usize::from(inner.width.max(1));
    let skip = title
        .cursor_col
        .map_or(0, |col| col.saturating_sub(width - 1));
    let visible: String = title.text.chars().skip(skip).collect();
    let style = if title.is_placeholder {
        placeholder_style()
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };
    frame.render_widget(Paragraph::new(Line::styled(visible, style)), inner);

    if let Some(col) = title.cursor_col {
        let offset = u16::try_from(col - skip).unwrap_or(u16::MAX);
        frame.set_cursor_position((inner.x.saturating_add(offset), inner.y));
    }
}

fn tab_span(tab: &TabView) -> Span<'static> {
    let mut style = Style::default().fg(Color::White);
    if tab.active {
        style = style.fg(Color::LightBlue).add_modifier(Modifier::BOLD);
    }
    if !tab.enabled {
        style = style.add_modifier(Modifier::DIM);
    }
    let marker = if tab.active { "▸" } else { " " };
    Span::styled(format!("{marker}{} ", tab.label), style)
}

fn render_tab_bar(view: &EditorView, frame: &mut Frame, area: Rect) {
    let bar_style = Style::default().bg(Color::Indexed(236));
    frame.render_widget(Paragraph::new("").style(bar_style), area);

    let mut tabs = vec![Span::raw(" ")];
    for tab in &view.tabs {
        tabs.push(tab_span(tab));
        tabs.push(Span::raw(" "));
    }
    frame.render_widget(Paragraph::new(Line::from(tabs)).style(bar_style), area);

    let actions: Vec<Span> = [
        view.publish.as_ref().map(|a| (a, "^S")),
        view.delete.as_ref().map(|a| (a, "^D")),
    ]
    .into_iter()
    .flatten()
    .flat_map(|(action, hint)| {
        let style = if action.enabled {
            Style::default().fg(Color::White)
        } else {
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM)
        };
        [
            Span::styled(format!("[{}]", action.label), style),
            Span::styled(format!(" {hint}  "), Style::default().fg(Color::DarkGray)),
        ]
    })
    .collect();
    if !actions.is_empty() {
        frame.render_widget(
            Paragraph::new(Line::from(actions))
                .alignment(Alignment::Right)
                .style(bar_style),
            area,
        );
    }
}

fn render_write_body(
    lines: &[String],
    is_placeholder: bool,
    cursor: Option<(usize, usize)>,
    frame: &mut Frame,
    area: Rect,
) {
    let height = usize::from(area.height.max(1));
    let width = usize::from(area.width.max(1));
    let (cursor_line, cursor_col) = cursor.unwrap_or((0, 0));
    let top = cursor_line.saturating_sub(height - 1);
    let left = cursor_col.saturating_sub(width - 1);

    let style = if is_placeholder {
        placeholder_style()
    } else {
        Style::default()
    };
    let visible: Vec<Line> = lines
        .iter()
        .skip(top)
        .take(height)
        .map(|line| Line::styled(line.chars().skip(left).collect::<String>(), style))
        .collect();
    frame.render_widget(Paragraph::new(visible), area);

    if let Some((line, col)) = cursor {
        let x = u16::try_from(col - left).unwrap_or(u16::MAX);
        let y = u16::try_from(line - top).unwrap_or(u16::MAX);
        frame.set_cursor_position((area.x.saturating_add(x), area.y.saturating_add(y)));
    }
}

fn render_preview_body(model: &mut Model, frame: &mut Frame, area: Rect) {
    let height = usize::from(area.height);
    let lines: Vec<Line> = match model.editor.preview(area.width) {
        Preview::Placeholder => vec![Line::styled(
            crate::editor::PREVIEW_PLACEHOLDER,
            placeholder_style(),
        )],
        Preview::Failed(reason) => vec![Line::styled(
            Preview::failure_message(reason),
            Style::default().fg(Color::Red),
        )],
        Preview::Rendered(doc) => {
            let max_scroll = doc.line_count().saturating_sub(height);
            model.preview_scroll = model.preview_scroll.min(max_scroll);
            doc.visible_lines(model.preview_scroll, height)
                .iter()
                .map(styled_line)
                .collect()
        }
    };
    frame.render_widget(Paragraph::new(lines), area);
}

fn styled_line(line: &RenderedLine) -> Line<'static> {
    let base = style_for_line_type(line.line_type());
    line.spans().map_or_else(
        || Line::styled(line.content().to_string(), base),
        |spans| {
            Line::from(
                spans
                    .iter()
                    .map(|span| {
                        Span::styled(span.text().to_string(), style_for_inline(base, span.style()))
                    })
                    .collect::<Vec<_>>(),
            )
        },
    )
}

