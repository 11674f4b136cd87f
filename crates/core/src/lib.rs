#![deny(missing_docs)]
//! Slimdown core: an ordered table of pattern rules that rewrites a small
//! Markdown dialect into HTML, one whole-document pass per rule.
//!
//! ```
//! assert_eq!(slimdown_core::render("# Foo"), "<h1>Foo</h1>");
//!
//! let mut renderer = slimdown_core::Renderer::new();
//! renderer.add_rule(r"\(c\)", "&copy;").unwrap();
//! assert_eq!(renderer.render("(c) 2024"), "<p>&copy; 2024</p>");
//! ```

use once_cell::sync::Lazy;

/// Parallel rendering of many documents.
pub mod batch;
/// Guarded delimiter matching for inline spans.
pub mod delimited;
/// Error and diagnostic types.
pub mod error;
/// Handler functions behind the default rules.
pub mod handlers;
/// Renderer configuration.
pub mod options;
/// The renderer and its per-call context.
pub mod pipeline;
/// Rules, patterns, matches and actions.
pub mod rule;
/// The default rule table.
pub mod rules;
/// Literal replacement templates.
pub mod template;
/// Code block vault and placeholders.
pub mod vault;

pub use batch::{
    BatchInput, BatchOptions, BatchProcessingResult, BatchResult, BatchStats, render_batch,
};
pub use delimited::GuardedDelimiter;
pub use error::{RenderDiagnostics, RenderWarning, SlimdownError, SourceLocation};
pub use options::RenderOptions;
pub use pipeline::{RenderContext, Rendered, Renderer};
pub use rule::{Action, HandlerFn, Match, Pattern, Rule};
pub use rules::default_rules;
pub use template::Template;
pub use vault::CodeBlockVault;

static DEFAULT_RENDERER: Lazy<Renderer> = Lazy::new(Renderer::new);

/// Render Markdown to HTML with the default rule table.
pub fn render(text: &str) -> String {
    DEFAULT_RENDERER.render(text)
}
