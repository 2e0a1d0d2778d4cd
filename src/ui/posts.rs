use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Padding, Paragraph, Wrap};
use unicode_width::UnicodeWidthStr;

use crate::app::Model;
use crate::posts::PostCard;

use super::style::placeholder_style;

pub(super) fn render_posts(model: &Model, frame: &mut Frame, area: Rect) {
    if model.posts.is_empty() {
        let empty = Paragraph::new(Line::styled("No posts yet.", placeholder_style()))
            .alignment(Alignment::Center)
            .block(Block::default().padding(Padding::top(area.height / 2)));
        frame.render_widget(empty, area);
        return;
    }

    let inner_width = area.width.saturating_sub(4).max(1);
    let mut y = area.y;
    for card in model.posts.iter().skip(model.posts_scroll) {
        let remaining = area.bottom().saturating_sub(y);
        if remaining < 3 {
            break;
        }
        let height = card_height(card, inner_width).min(remaining);
        render_card(card, frame, Rect::new(area.x, y, area.width, height));
        y += height;
    }
}

/// Rows a card needs: borders, date, wrapped excerpt, optional image line.
fn card_height(card: &PostCard, inner_width: u16) -> u16 {
    let excerpt_rows = wrapped_rows(&card.excerpt, usize::from(inner_width));
    let rows = 2 + 1 + excerpt_rows + usize::from(card.image.is_some());
    u16::try_from(rows).unwrap_or(u16::MAX)
}

fn wrapped_rows(text: &str, width: usize) -> usize {
    if text.is_empty() {
        return 0;
    }
    let mut rows = 1;
    let mut used = 0;
    for word in text.split_whitespace() {
        let word_width = word.width();
        let needed = if used == 0 { word_width } else { used + 1 + word_width };
        if needed > width && used > 0 {
            rows += 1;
            used = word_width;
        } else {
            used = needed;
        }
    }
    rows
}

fn render_card(card: &PostCard, frame: &mut Frame, area: Rect) {
    let mut lines = vec![Line::styled(
        card.date.clone(),
        Style::default().fg(Color::DarkGray),
    )];
    if !card.excerpt.is_empty() {
        lines.push(Line::raw(card.excerpt.clone()));
    }
    if let Some(image) = &card.image {
        lines.push(Line::styled(
            format!("[Image: {image}]"),
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::ITALIC),
        ));
    }

    let title = if card.title.is_empty() {
        "(untitled)"
    } else {
        card.title.as_str()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .padding(Padding::horizontal(1))
        .title(Span::styled(
            format!(" {title} "),
            Style::default().add_modifier(Modifier::BOLD),
        ))
        .title_bottom(
            Line::styled(format!(" #{} ", card.id), Style::default().fg(Color::DarkGray))
                .right_aligned(),
        );
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(block),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrapped_rows_counts_word_wrap() {
        assert_eq!(wrapped_rows("", 10), 0);
        assert_eq!(wrapped_rows("short", 10), 1);
        assert_eq!(wrapped_rows("aaaa bbbb cccc", 9), 2);
    }
}
