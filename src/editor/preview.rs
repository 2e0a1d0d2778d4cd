use crate::markdown::{MarkdownRenderer, RenderedMarkdown, render_safely};

use super::PREVIEW_PLACEHOLDER;

/// What the Preview tab shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preview {
    /// Content is empty; the renderer was not called.
    Placeholder,
    Rendered(RenderedMarkdown),
    /// The renderer failed; carries the reason.
    Failed(String),
}

impl Preview {
    /// The fallback line for a failed render.
    pub fn failure_message(reason: &str) -> String {
        format!("Unable to render preview: {reason}")
    }

    /// Plain text of the preview as displayed.
    pub fn plain_text(&self) -> String {
        match self {
            Self::Placeholder => PREVIEW_PLACEHOLDER.to_string(),
            Self::Rendered(doc) => doc.plain_text(),
            Self::Failed(reason) => Self::failure_message(reason),
        }
    }
}

/// Last rendered preview, keyed by the exact content and wrap width.
#[derive(Debug, Default)]
pub(super) struct PreviewCache {
    key: Option<(String, u16)>,
    value: Option<Preview>,
}

impl PreviewCache {
    pub(super) fn get(
        &mut self,
        renderer: &dyn MarkdownRenderer,
        content: &str,
        width: u16,
    ) -> &Preview {
        let fresh = self.key.as_ref().is_some_and(|(cached, cached_width)| {
            *cached_width == width && cached.as_str() == content
        });
        if !fresh || self.value.is_none() {
            let preview = if content.is_empty() {
                Preview::Placeholder
            } else {
                match render_safely(renderer, content, width) {
                    Ok(doc) => Preview::Rendered(doc),
                    Err(err) => {
                        tracing::warn!(%err, "preview render failed");
                        Preview::Failed(err.to_string())
                    }
                }
            };
            self.key = Some((content.to_string(), width));
            self.value = Some(preview);
        }
        self.value.get_or_insert(Preview::Placeholder)
    }

    pub(super) fn clear(&mut self) {
        self.key = None;
        self.value = None;
    }
}
