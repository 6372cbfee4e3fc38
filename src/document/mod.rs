//! Markdown rendering.
//!
//! This module handles:
//! - Rendering markdown to HTML with comrak (the Rendered View)
//! - Delegating fenced code to the syntax highlighter
//! - Rendering the same document to styled lines for the terminal preview
//! - Document statistics for the status bar

mod preview;
mod stats;

pub use preview::preview_lines;
pub use stats::DocumentStats;

use comrak::nodes::{NodeHtmlBlock, NodeValue};
use comrak::{Arena, Options, format_html, parse_document};

/// Markdown to HTML renderer.
///
/// Rendering is total: every input string produces some HTML.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownRenderer;

impl MarkdownRenderer {
    pub const fn new() -> Self {
        Self
    }

    /// Render `source` to an HTML fragment.
    ///
    /// # Example
    ///
    /// ```
    /// use markpad::document::MarkdownRenderer;
    ///
    /// let html = MarkdownRenderer::new().render("**hi**");
    /// assert!(html.contains("<strong>hi</strong>"));
    /// ```
    pub fn render(&self, source: &str) -> String {
        let _scope = crate::perf::scope("document.render_html");
        let arena = Arena::new();
        let mut options = Options::default();
        configure_options(&mut options);
        let root = parse_document(&arena, source, &options);

        for node in root.descendants() {
            let highlighted = match &node.data.borrow().value {
                NodeValue::CodeBlock(block) => {
                    let language = block.info.split_whitespace().next();
                    Some(crate::highlight::highlight_html(language, &block.literal))
                }
                _ => None,
            };
            if let Some(html) = highlighted {
                let mut raw = NodeHtmlBlock::default();
                raw.literal = html;
                node.data.borrow_mut().value = NodeValue::HtmlBlock(raw);
            }
        }

        let mut out = Vec::new();
        if let Err(err) = format_html(root, &options, &mut out) {
            tracing::warn!(%err, "html formatting failed");
        }
        String::from_utf8_lossy(&out).into_owned()
    }
}

pub(crate) fn configure_options(options: &mut Options) {
    // Enable GFM extensions
    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;
    options.extension.footnotes = true;

    // Raw HTML in the source passes through, as browser markdown renderers do.
    // Highlighted code blocks are spliced in as raw HTML too.
    options.render.unsafe_ = true;
}
