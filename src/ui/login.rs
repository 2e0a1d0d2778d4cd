use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use super::LOGIN_HEADING;
use super::overlays::centered_popup_rect;
use super::style::placeholder_style;

const FORM_WIDTH: u16 = 44;
const FORM_HEIGHT: u16 = 14;

/// Draw the static admin login form. It holds no state and submits nothing.
pub(super) fn render_login(frame: &mut Frame, area: Rect) {
    let form = centered_popup_rect(FORM_WIDTH, FORM_HEIGHT, area);
    frame.render_widget(Clear, form);
    let outer = Block::default().borders(Borders::ALL);
    let inner = outer.inner(form);
    frame.render_widget(outer, form);

    let [heading, _, email, password, _, button] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(4),
        Constraint::Length(4),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .horizontal_margin(1)
    .areas(inner);

    frame.render_widget(
        Paragraph::new(Line::styled(
            LOGIN_HEADING,
            Style::default().add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center),
        heading,
    );
    render_field("Email", "you@example.com", frame, email);
    render_field("Password", "••••••••", frame, password);
    frame.render_widget(
        Paragraph::new(Line::styled(
            "[ Login ]",
            Style::default().fg(Color::Black).bg(Color::LightBlue),
        ))
        .alignment(Alignment::Center),
        button,
    );
}

fn render_field(label: &str, hint: &str, frame: &mut Frame, area: Rect) {
    let [label_area, box_area] =
        Layout::vertical([Constraint::Length(1), Constraint::Length(3)]).areas(area);
    frame.render_widget(Paragraph::new(label), label_area);
    frame.render_widget(
        Paragraph::new(Line::styled(hint, placeholder_style()))
            .block(Block::default().borders(Borders::ALL)),
        box_area,
    );
}
