//! Markdown to display lines with comrak.

use comrak::nodes::{AstNode, ListDelimType, ListType, NodeValue, TableAlignment};
use comrak::{Arena, Options, parse_document};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::types::{InlineSpan, InlineStyle, LineType, RenderedLine};

const CODE_RIGHT_PADDING: usize = 3;

/// Render markdown source into wrapped display lines.
pub(super) fn render_lines(source: &str, width: usize) -> Vec<RenderedLine> {
    let arena = Arena::new();
    let root = parse_document(&arena, source, &create_options());
    let mut renderer = LineRenderer {
        lines: Vec::new(),
        width: width.max(1),
    };
    renderer.children(root, 0);
    while renderer
        .lines
        .last()
        .is_some_and(|line| *line.line_type() == LineType::Empty)
    {
        renderer.lines.pop();
    }
    renderer.lines
}

fn create_options() -> Options {
    let mut options = Options::default();
    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;
    options.extension.footnotes = true;
    options
}

struct LineRenderer {
    lines: Vec<RenderedLine>,
    width: usize,
}

impl LineRenderer {
    fn children<'a>(&mut self, node: &'a AstNode<'a>, depth: usize) {
        for child in node.children() {
            self.block(child, depth);
        }
    }

    fn block<'a>(&mut self, node: &'a AstNode<'a>, depth: usize) {
        let value = node.data.borrow().value.clone();
        match value {
            NodeValue::Heading(heading) => {
                if !self.lines.is_empty() {
                    self.ensure_blank_lines(2);
                }
                let text = extract_text(node);
                self.lines.push(RenderedLine::new(
                    format!("{} {}", "#".repeat(usize::from(heading.level)), text),
                    LineType::Heading(heading.level),
                ));
                self.blank();
            }
            NodeValue::Paragraph => {
                self.paragraph(node, LineType::Paragraph, "", "");
                self.blank();
            }
            NodeValue::CodeBlock(code) => {
                let language = code.info.split_whitespace().next().map(str::to_string);
                self.code_block(language.as_deref(), &code.literal);
                self.blank();
            }
            NodeValue::List(list) => {
                self.list(node, list.list_type, list.start, list.delimiter, depth + 1);
                if depth == 0 {
                    self.blank();
                }
            }
            NodeValue::BlockQuote => {
                self.blockquote(node, 1);
                self.blank();
            }
            NodeValue::ThematicBreak => {
                let rule = "─".repeat(self.width.min(40));
                self.lines
                    .push(RenderedLine::new(rule, LineType::HorizontalRule));
                self.blank();
            }
            NodeValue::Table(table) => {
                for row in render_table(node, &table.alignments, self.width) {
                    self.lines.push(RenderedLine::new(row, LineType::Table));
                }
                self.blank();
            }
            NodeValue::HtmlBlock(html) => {
                for raw in html.literal.lines() {
                    self.lines
                        .push(RenderedLine::new(raw.to_string(), LineType::Paragraph));
                }
                self.blank();
            }
            NodeValue::FootnoteDefinition(def) => {
                let label = format!("[^{}]: ", def.name);
                let continuation = " ".repeat(label.width());
                for child in node.children() {
                    self.paragraph(child, LineType::Paragraph, &label, &continuation);
                }
                self.blank();
            }
            _ => self.children(node, depth),
        }
    }

    fn paragraph<'a>(
        &mut self,
        node: &'a AstNode<'a>,
        line_type: LineType,
        prefix_first: &str,
        prefix_next: &str,
    ) {
        let images = standalone_images(node);
        if !images.is_empty() && prefix_first.is_empty() {
            for (alt, src) in images {
                let label = if alt.is_empty() { src } else { alt };
                self.lines
                    .push(RenderedLine::new(format!("[Image: {label}]"), LineType::Image));
            }
            return;
        }
        let spans = collect_inline_spans(node);
        for line_spans in wrap_spans(&spans, self.width, prefix_first, prefix_next) {
            let content = spans_to_string(&line_spans);
            self.lines
                .push(RenderedLine::with_spans(content, line_type, line_spans));
        }
    }

    fn code_block(&mut self, language: Option<&str>, literal: &str) {
        let inner_width = literal
            .lines()
            .map(UnicodeWidthStr::width)
            .max()
            .unwrap_or(0)
            .min(self.width.saturating_sub(4 + CODE_RIGHT_PADDING).max(1));
        let frame_width = inner_width + 1 + CODE_RIGHT_PADDING;
        let label: String = format!(" {} ", language.unwrap_or("code"))
            .chars()
            .take(frame_width)
            .collect();
        self.lines.push(RenderedLine::new(
            format!("┌{label}{}┐", "─".repeat(frame_width.saturating_sub(label.width()))),
            LineType::CodeBlock,
        ));

        for highlighted in crate::highlight::highlight_code(language, literal) {
            let body = truncate_spans(&highlighted, inner_width);
            let used = spans_to_string(&body).width();
            let mut spans = vec![InlineSpan::new("│ ".to_string(), InlineStyle::default())];
            spans.extend(body);
            spans.push(InlineSpan::new(
                format!(
                    "{}│",
                    " ".repeat(inner_width.saturating_sub(used) + CODE_RIGHT_PADDING)
                ),
                InlineStyle::default(),
            ));
            let content = spans_to_string(&spans);
            self.lines
                .push(RenderedLine::with_spans(content, LineType::CodeBlock, spans));
        }

        self.lines.push(RenderedLine::new(
            format!("└{}┘", "─".repeat(frame_width)),
            LineType::CodeBlock,
        ));
    }

    fn list<'a>(
        &mut self,
        node: &'a AstNode<'a>,
        list_type: ListType,
        start: usize,
        delimiter: ListDelimType,
        depth: usize,
    ) {
        let delimiter = match delimiter {
            ListDelimType::Paren => ')',
            ListDelimType::Period => '.',
        };
        let last_number = start + node.children().count().saturating_sub(1);
        let number_width = last_number.to_string().len();

        for (index, item) in node.children().enumerate() {
            let marker = match &item.data.borrow().value {
                NodeValue::TaskItem(checked) => {
                    if checked.is_some() { "✓" } else { "□" }.to_string()
                }
                _ => match list_type {
                    ListType::Bullet => "•".to_string(),
                    ListType::Ordered => {
                        format!("{:>number_width$}{delimiter}", start + index)
                    }
                },
            };
            self.item(item, &marker, depth);
        }
    }

    fn item<'a>(&mut self, node: &'a AstNode<'a>, marker: &str, depth: usize) {
        let indent = "  ".repeat(depth.saturating_sub(1));
        let prefix_first = format!("{indent}{marker} ");
        let prefix_next = format!("{indent}{}", " ".repeat(marker.width() + 1));
        let mut paragraphs = 0usize;

        for child in node.children() {
            let value = child.data.borrow().value.clone();
            match value {
                NodeValue::Paragraph => {
                    if paragraphs > 0 {
                        self.lines
                            .push(RenderedLine::new(String::new(), LineType::ListItem(depth)));
                    }
                    let prefix = if paragraphs == 0 {
                        &prefix_first
                    } else {
                        &prefix_next
                    };
                    self.paragraph(child, LineType::ListItem(depth), prefix, &prefix_next);
                    paragraphs += 1;
                }
                NodeValue::List(list) => {
                    self.list(child, list.list_type, list.start, list.delimiter, depth + 1);
                }
                _ => self.block(child, depth),
            }
        }

        if paragraphs == 0 {
            self.lines.push(RenderedLine::new(
                prefix_first.trim_end().to_string(),
                LineType::ListItem(depth),
            ));
        }
    }

    fn blockquote<'a>(&mut self, node: &'a AstNode<'a>, quote_depth: usize) {
        let prefix = format!("  {}", "│ ".repeat(quote_depth));
        for child in node.children() {
            let is_quote = matches!(child.data.borrow().value, NodeValue::BlockQuote);
            if is_quote {
                self.blockquote(child, quote_depth + 1);
                continue;
            }
            let spans = collect_inline_spans(child);
            for line_spans in wrap_spans(&spans, self.width, &prefix, &prefix) {
                let content = spans_to_string(&line_spans);
                self.lines
                    .push(RenderedLine::with_spans(content, LineType::BlockQuote, line_spans));
            }
        }
    }

    fn blank(&mut self) {
        self.lines.push(RenderedLine::empty());
    }

    fn ensure_blank_lines(&mut self, count: usize) {
        let existing = self
            .lines
            .iter()
            .rev()
            .take_while(|line| *line.line_type() == LineType::Empty)
            .count();
        for _ in existing..count {
            self.blank();
        }
    }
}

/// Images of a paragraph that contains nothing but images and whitespace.
fn standalone_images<'a>(node: &'a AstNode<'a>) -> Vec<(String, String)> {
    let mut images = Vec::new();
    for child in node.children() {
        match &child.data.borrow().value {
            NodeValue::Image(link) => images.push((extract_text(child), link.url.clone())),
            NodeValue::Text(text) if text.trim().is_empty() => {}
            NodeValue::SoftBreak | NodeValue::LineBreak => {}
            _ => return Vec::new(),
        }
    }
    images
}

fn extract_text<'a>(node: &'a AstNode<'a>) -> String {
    let mut text = String::new();
    extract_text_into(node, &mut text);
    text
}

fn extract_text_into<'a>(node: &'a AstNode<'a>, text: &mut String) {
    match &node.data.borrow().value {
        NodeValue::Text(t) => text.push_str(t),
        NodeValue::Code(code) => text.push_str(&code.literal),
        NodeValue::SoftBreak | NodeValue::LineBreak => text.push(' '),
        _ => {
            for child in node.children() {
                extract_text_into(child, text);
            }
        }
    }
}

fn collect_inline_spans<'a>(node: &'a AstNode<'a>) -> Vec<InlineSpan> {
    let mut spans = Vec::new();
    collect_inline_into(node, InlineStyle::default(), &mut spans);
    spans
}

fn collect_inline_into<'a>(node: &'a AstNode<'a>, style: InlineStyle, spans: &mut Vec<InlineSpan>) {
    let mut next = style;
    match &node.data.borrow().value {
        NodeValue::List(_) | NodeValue::Item(_) | NodeValue::TaskItem(_) => return,
        NodeValue::Text(t) => {
            spans.push(InlineSpan::new(t.clone(), style));
            return;
        }
        NodeValue::Code(code) => {
            let code_style = InlineStyle {
                code: true,
                ..InlineStyle::default()
            };
            spans.push(InlineSpan::new(code.literal.clone(), code_style));
            return;
        }
        NodeValue::HtmlInline(html) => {
            spans.push(InlineSpan::new(html.clone(), style));
            return;
        }
        NodeValue::Image(link) => {
            let alt = extract_text(node);
            let label = if alt.is_empty() { link.url.clone() } else { alt };
            spans.push(InlineSpan::new(format!("[Image: {label}]"), style));
            return;
        }
        NodeValue::FootnoteReference(reference) => {
            spans.push(InlineSpan::new(format!("[^{}]", reference.name), style));
            return;
        }
        NodeValue::SoftBreak | NodeValue::LineBreak => {
            spans.push(InlineSpan::new(" ".to_string(), style));
            return;
        }
        NodeValue::Emph => next.emphasis = true,
        NodeValue::Strong => next.strong = true,
        NodeValue::Strikethrough => next.strikethrough = true,
        NodeValue::Link(_) => next.link = true,
        _ => {}
    }
    for child in node.children() {
        collect_inline_into(child, next, spans);
    }
}

/// Greedy word wrap of styled spans with hanging prefixes.
fn wrap_spans(
    spans: &[InlineSpan],
    width: usize,
    prefix_first: &str,
    prefix_next: &str,
) -> Vec<Vec<InlineSpan>> {
    let start_line = |prefix: &str| -> (Vec<InlineSpan>, usize) {
        if prefix.is_empty() {
            (Vec::new(), 0)
        } else {
            (
                vec![InlineSpan::new(prefix.to_string(), InlineStyle::default())],
                prefix.width(),
            )
        }
    };

    let mut lines = Vec::new();
    let (mut current, mut used) = start_line(prefix_first);
    let mut has_word = false;

    for token in spans.iter().flat_map(split_words) {
        let token_width = token.text().width();
        let is_space = token.text().chars().all(char::is_whitespace);
        if has_word && used + token_width > width {
            trim_trailing_space(&mut current);
            lines.push(std::mem::take(&mut current));
            (current, used) = start_line(prefix_next);
            has_word = false;
        }
        if is_space && !has_word {
            continue;
        }
        used += token_width;
        current.push(token);
        has_word = true;
    }

    if has_word {
        trim_trailing_space(&mut current);
    }
    lines.push(current);
    lines
}

fn trim_trailing_space(line: &mut Vec<InlineSpan>) {
    if line
        .last()
        .is_some_and(|span| span.text().chars().all(char::is_whitespace))
    {
        line.pop();
    }
}

/// Split a span into alternating word and whitespace runs.
fn split_words(span: &InlineSpan) -> Vec<InlineSpan> {
    let mut out = Vec::new();
    let mut buf = String::new();
    let mut in_space = None;
    for ch in span.text().chars() {
        let is_space = ch.is_whitespace();
        if in_space.is_some_and(|state| state != is_space) {
            out.push(InlineSpan::new(std::mem::take(&mut buf), span.style()));
        }
        in_space = Some(is_space);
        buf.push(ch);
    }
    if !buf.is_empty() {
        out.push(InlineSpan::new(buf, span.style()));
    }
    out
}

fn spans_to_string(spans: &[InlineSpan]) -> String {
    spans.iter().map(InlineSpan::text).collect()
}

fn truncate_spans(spans: &[InlineSpan], max_width: usize) -> Vec<InlineSpan> {
    let mut out = Vec::new();
    let mut remaining = max_width;
    for span in spans {
        let taken = truncate_text(span.text(), remaining);
        if taken.is_empty() {
            break;
        }
        remaining -= taken.width();
        out.push(InlineSpan::new(taken, span.style()));
    }
    out
}

fn truncate_text(text: &str, max_width: usize) -> String {
    let mut out = String::new();
    let mut used = 0usize;
    for ch in text.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if used + ch_width > max_width {
            break;
        }
        used += ch_width;
        out.push(ch);
    }
    out
}

fn render_table<'a>(
    node: &'a AstNode<'a>,
    alignments: &[TableAlignment],
    width: usize,
) -> Vec<String> {
    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut has_header = false;
    for row in node.children() {
        let NodeValue::TableRow(header) = row.data.borrow().value else {
            continue;
        };
        has_header |= header;
        rows.push(
            row.children()
                .map(|cell| extract_text(cell).split_whitespace().collect::<Vec<_>>().join(" "))
                .collect(),
        );
    }
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    if columns == 0 {
        return Vec::new();
    }

    let mut widths = vec![1usize; columns];
    for row in &rows {
        for (idx, cell) in row.iter().enumerate() {
            widths[idx] = widths[idx].max(cell.width());
        }
    }
    // Row width is 1 + sum(width + 3); shrink the widest column until it fits.
    while 1 + widths.iter().sum::<usize>() + 3 * columns > width.max(4) {
        let Some(widest) = (0..columns).max_by_key(|&idx| widths[idx]) else {
            break;
        };
        if widths[widest] <= 1 {
            break;
        }
        widths[widest] -= 1;
    }

    let border = |left: char, mid: char, right: char| {
        let inner: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
        format!("{left}{}{right}", inner.join(&mid.to_string()))
    };

    let mut out = vec![border('┌', '┬', '┐')];
    for (row_idx, row) in rows.iter().enumerate() {
        let mut line = String::from("│");
        for (idx, col_width) in widths.iter().enumerate() {
            let cell = truncate_text(row.get(idx).map_or("", String::as_str), *col_width);
            let pad = col_width.saturating_sub(cell.width());
            let (left, right) = match alignments.get(idx).copied().unwrap_or(TableAlignment::None) {
                TableAlignment::Right => (pad, 0),
                TableAlignment::Center => (pad / 2, pad - pad / 2),
                TableAlignment::Left | TableAlignment::None => (0, pad),
            };
            line.push_str(&format!(" {}{cell}{} │", " ".repeat(left), " ".repeat(right)));
        }
        out.push(line);
        if has_header && row_idx == 0 {
            out.push(border('├', '┼', '┤'));
        }
    }
    out.push(border('└', '┴', '┘'));
    out
}
