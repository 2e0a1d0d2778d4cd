//! Markdown rendering for the editor preview.
//!
//! The editor never talks to comrak directly: it holds a boxed
//! [`MarkdownRenderer`] and calls it through [`render_safely`], so a failing
//! or panicking renderer degrades to an error message instead of taking the
//! session down.

mod parser;
mod types;

use std::panic::{self, AssertUnwindSafe};
use std::sync::Mutex;

pub use types::{InlineColor, InlineSpan, InlineStyle, LineType, RenderedLine, RenderedMarkdown};

/// Why a preview could not be produced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error("renderer panicked")]
    Panicked,
    #[error("{0}")]
    Failed(String),
}

/// Converts markdown source into display lines for a given width.
pub trait MarkdownRenderer {
    fn render(&self, source: &str, width: u16) -> Result<RenderedMarkdown, RenderError>;
}

/// The default renderer, backed by comrak with GitHub-flavored extensions.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComrakRenderer;

impl MarkdownRenderer for ComrakRenderer {
    fn render(&self, source: &str, width: u16) -> Result<RenderedMarkdown, RenderError> {
        Ok(RenderedMarkdown::from_lines(parser::render_lines(
            source,
            usize::from(width),
        )))
    }
}

/// Held while the process panic hook is swapped out.
static PANIC_HOOK_LOCK: Mutex<()> = Mutex::new(());

/// Render `source`, turning both errors and panics into [`RenderError`].
///
/// The process panic hook is silenced for the duration of the call. The
/// terminal's restore hook would otherwise leave raw mode on a panic that is
/// caught here.
pub fn render_safely(
    renderer: &dyn MarkdownRenderer,
    source: &str,
    width: u16,
) -> Result<RenderedMarkdown, RenderError> {
    let outcome = {
        let _guard = PANIC_HOOK_LOCK
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let previous_hook = panic::take_hook();
        panic::set_hook(Box::new(|_| {}));
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| renderer.render(source, width)));
        panic::set_hook(previous_hook);
        outcome
    };

    match outcome {
        Ok(result) => result,
        Err(payload) => {
            let reason = payload
                .downcast_ref::<&str>()
                .map(|s| (*s).to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned());
            tracing::warn!(reason = ?reason, "markdown renderer panicked");
            Err(reason.map_or(RenderError::Panicked, RenderError::Failed))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn hook_lock() -> std::sync::MutexGuard<'static, ()> {
        PANIC_HOOK_LOCK
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    struct Failing;

    impl MarkdownRenderer for Failing {
        fn render(&self, _source: &str, _width: u16) -> Result<RenderedMarkdown, RenderError> {
            Err(RenderError::Failed("bad input".to_string()))
        }
    }

    struct Panicking;

    impl MarkdownRenderer for Panicking {
        fn render(&self, _source: &str, _width: u16) -> Result<RenderedMarkdown, RenderError> {
            panic!("boom");
        }
    }

    #[test]
    fn test_comrak_renderer_renders_heading() {
        let rendered = render_safely(&ComrakRenderer, "# Hi", 40).unwrap();
        assert_eq!(rendered.lines()[0].content(), "# Hi");
    }

    #[test]
    fn test_render_error_is_passed_through() {
        let err = render_safely(&Failing, "x", 40).unwrap_err();
        assert_eq!(err.to_string(), "bad input");
    }

    #[test]
    fn test_panic_is_caught() {
        let err = render_safely(&Panicking, "x", 40).unwrap_err();
        assert_eq!(err, RenderError::Failed("boom".to_string()));
    }

    #[test]
    fn test_caught_panic_skips_installed_hook() {
        let calls = Arc::new(AtomicUsize::new(0));
        let original = {
            let _guard = hook_lock();
            let original = panic::take_hook();
            let counter = Arc::clone(&calls);
            panic::set_hook(Box::new(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            }));
            original
        };

        let result = render_safely(&Panicking, "x", 40);
        assert_eq!(result, Err(RenderError::Failed("boom".to_string())));
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        // The counting hook is back in place afterwards.
        let _guard = hook_lock();
        let after = panic::catch_unwind(|| panic!("after"));
        panic::set_hook(original);
        assert!(after.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
