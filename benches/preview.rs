//! Benchmarks for preview rendering.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use postdesk::editor::{EditableDocument, EditorCallbacks, EditorOptions, PostEditor, ViewMode};
use postdesk::markdown::{ComrakRenderer, MarkdownRenderer};

const POST: &str = r#"# Release notes

Some **bold** and *italic* prose with a [link](https://example.com) and
`inline code`, long enough to wrap a few times at typical terminal widths.

- [x] shipped the editor
- [ ] ship the post list
  1. nested
  2. ordered

> Quoted text that also wraps across more than one line of output.

```rust
fn main() {
    println!("hello");
}
```

| Name | Count |
|:-----|------:|
| a    | 1     |
| b    | 22    |
"#;

fn bench_render(c: &mut Criterion) {
    let source = POST.repeat(20);
    c.bench_function("render_markdown", |b| {
        b.iter(|| ComrakRenderer.render(black_box(&source), black_box(80)))
    });
}

fn bench_cached_preview(c: &mut Criterion) {
    let options = EditorOptions::default().with_initial_data(EditableDocument::new("", POST));
    let mut editor = PostEditor::mount(options, EditorCallbacks::new());
    editor.select_mode(ViewMode::Preview);
    c.bench_function("cached_preview", |b| {
        b.iter(|| editor.preview(black_box(80)).plain_text().len())
    });
}

criterion_group!(benches, bench_render, bench_cached_preview);
criterion_main!(benches);
