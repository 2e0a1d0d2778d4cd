//! Rendered markdown types.

/// A markdown document rendered into display lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedMarkdown {
    lines: Vec<RenderedLine>,
}

impl RenderedMarkdown {
    pub(crate) const fn from_lines(lines: Vec<RenderedLine>) -> Self {
        Self { lines }
    }

    /// Number of rendered lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// All rendered lines.
    pub fn lines(&self) -> &[RenderedLine] {
        &self.lines
    }

    /// Lines in `offset..offset + count`, clamped to the document.
    pub fn visible_lines(&self, offset: usize, count: usize) -> &[RenderedLine] {
        let start = offset.min(self.lines.len());
        let end = offset.saturating_add(count).min(self.lines.len());
        &self.lines[start..end]
    }

    /// Plain text of every line joined with newlines.
    pub fn plain_text(&self) -> String {
        self.lines
            .iter()
            .map(RenderedLine::content)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Type of rendered line, used for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineType {
    /// Heading with level (1-6)
    Heading(u8),
    Paragraph,
    CodeBlock,
    BlockQuote,
    /// List item with nesting depth
    ListItem(usize),
    Table,
    HorizontalRule,
    /// Image placeholder (`[Image: alt]`)
    Image,
    Empty,
}

/// A single rendered line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLine {
    content: String,
    line_type: LineType,
    spans: Vec<InlineSpan>,
}

impl RenderedLine {
    pub const fn new(content: String, line_type: LineType) -> Self {
        Self {
            content,
            line_type,
            spans: Vec::new(),
        }
    }

    pub const fn with_spans(content: String, line_type: LineType, spans: Vec<InlineSpan>) -> Self {
        Self {
            content,
            line_type,
            spans,
        }
    }

    pub(crate) fn empty() -> Self {
        Self::new(String::new(), LineType::Empty)
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub const fn line_type(&self) -> &LineType {
        &self.line_type
    }

    /// Inline spans, if the line carries inline styling.
    pub fn spans(&self) -> Option<&[InlineSpan]> {
        if self.spans.is_empty() {
            None
        } else {
            Some(&self.spans)
        }
    }
}

/// Inline style flags for a text span.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InlineStyle {
    pub emphasis: bool,
    pub strong: bool,
    pub code: bool,
    pub strikethrough: bool,
    pub link: bool,
    pub fg: Option<InlineColor>,
}

/// RGB color for inline styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InlineColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// A styled inline span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineSpan {
    text: String,
    style: InlineStyle,
}

impl InlineSpan {
    pub const fn new(text: String, style: InlineStyle) -> Self {
        Self { text, style }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub const fn style(&self) -> InlineStyle {
        self.style
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RenderedMarkdown {
        RenderedMarkdown::from_lines(vec![
            RenderedLine::new("# Title".to_string(), LineType::Heading(1)),
            RenderedLine::empty(),
            RenderedLine::new("Body".to_string(), LineType::Paragraph),
        ])
    }

    #[test]
    fn test_visible_lines_clamps_to_document() {
        let doc = sample();
        assert_eq!(doc.visible_lines(1, 10).len(), 2);
        assert!(doc.visible_lines(10, 5).is_empty());
    }

    #[test]
    fn test_plain_text_joins_lines() {
        assert_eq!(sample().plain_text(), "# Title\n\nBody");
    }

    #[test]
    fn test_line_without_spans_reports_none() {
        let line = RenderedLine::new("x".to_string(), LineType::Paragraph);
        assert!(line.spans().is_none());
    }
}
