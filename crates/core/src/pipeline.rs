//! The renderer: an owned rule table applied in order to the whole document.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{RenderDiagnostics, RenderWarning, SlimdownError, SourceLocation};
use crate::options::RenderOptions;
use crate::rule::{Action, Pattern, Rule};
use crate::rules::default_rules;
use crate::vault::{CodeBlockVault, protect_reserved};

static FENCE: Lazy<Regex> = Lazy::new(|| Regex::new("```").expect("fence pattern is valid"));

/// State owned by one render call and handed to every handler.
#[derive(Debug)]
pub struct RenderContext<'a> {
    options: &'a RenderOptions,
    vault: CodeBlockVault,
    diagnostics: RenderDiagnostics,
}

impl<'a> RenderContext<'a> {
    /// Fresh context with an empty vault.
    pub fn new(options: &'a RenderOptions) -> Self {
        Self {
            options,
            vault: CodeBlockVault::new(),
            diagnostics: RenderDiagnostics::new(),
        }
    }

    /// Options of the renderer that owns this call.
    pub fn options(&self) -> &RenderOptions {
        self.options
    }

    /// Code blocks extracted so far.
    pub fn vault(&self) -> &CodeBlockVault {
        &self.vault
    }

    /// Mutable access to the code block vault.
    pub fn vault_mut(&mut self) -> &mut CodeBlockVault {
        &mut self.vault
    }

    /// Warnings collected so far.
    pub fn diagnostics(&self) -> &RenderDiagnostics {
        &self.diagnostics
    }

    /// Mutable access to the collected warnings.
    pub fn diagnostics_mut(&mut self) -> &mut RenderDiagnostics {
        &mut self.diagnostics
    }
}

/// Output of [`Renderer::render_with_diagnostics`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    /// Rendered HTML.
    pub html: String,
    /// Warnings raised while rendering.
    pub diagnostics: RenderDiagnostics,
}

/// Markdown renderer owning its options and rule table.
///
/// Rendering takes `&self` and keeps all per-call state in a
/// [`RenderContext`], so one renderer can serve many threads at once.
#[derive(Debug, Clone)]
pub struct Renderer {
    options: RenderOptions,
    rules: Vec<Rule>,
}

impl Renderer {
    /// Renderer with the default options and rule table.
    pub fn new() -> Self {
        Self::with_options(RenderOptions::default())
    }

    /// Renderer with the default rule table built for `options`.
    pub fn with_options(options: RenderOptions) -> Self {
        Self {
            rules: default_rules(&options),
            options,
        }
    }

    /// Options this renderer was built with.
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Rules in application order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Compile `pattern` and register it with `action`.
    ///
    /// The rule replaces an existing rule with the same pattern in place;
    /// otherwise it runs after every rule already registered.
    pub fn add_rule(
        &mut self,
        pattern: &str,
        action: impl Into<Action>,
    ) -> Result<(), SlimdownError> {
        let pattern = Pattern::regex(pattern)?;
        self.push_rule(Rule::new(pattern, action));
        Ok(())
    }

    /// Register a prebuilt rule, replacing any rule with the same key.
    pub fn push_rule(&mut self, rule: Rule) {
        match self.rules.iter_mut().find(|existing| existing.key() == rule.key()) {
            Some(existing) => {
                log::debug!("replacing rule `{}`", rule.key());
                *existing = rule;
            }
            None => self.rules.push(rule),
        }
    }

    /// Render Markdown to HTML. Never fails; see [`Renderer::try_render`].
    pub fn render(&self, text: &str) -> String {
        self.run(text).0
    }

    /// Render Markdown, failing if a placeholder could not be resolved.
    pub fn try_render(&self, text: &str) -> Result<String, SlimdownError> {
        let (html, cx) = self.run(text);
        match cx.diagnostics().dangling_placeholder() {
            Some(index) => Err(SlimdownError::DanglingPlaceholder {
                index,
                stored: cx.vault().len(),
            }),
            None => Ok(html),
        }
    }

    /// Render Markdown and return the warnings raised along the way.
    pub fn render_with_diagnostics(&self, text: &str) -> Rendered {
        let (html, cx) = self.run(text);
        Rendered {
            html,
            diagnostics: cx.diagnostics,
        }
    }

    fn run(&self, text: &str) -> (String, RenderContext<'_>) {
        let mut cx = RenderContext::new(&self.options);

        if let Some(location) = unclosed_fence(text) {
            log::warn!("unclosed code fence at {location}");
            cx.diagnostics_mut()
                .add_warning(RenderWarning::UnclosedCodeFence { location });
        }

        let protected = protect_reserved(text);
        let mut document = format!("\n{}\n", protected.text);
        for rule in &self.rules {
            let next = rule.apply(&document, &mut cx).into_owned();
            document = next;
        }

        log::debug!(
            "rendered {} bytes with {} rules, {} code block(s)",
            text.len(),
            self.rules.len(),
            cx.vault().len()
        );

        let html = protected.release(document.trim_ascii()).into_owned();
        (html, cx)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Location of a fence marker left without a partner, pairing them left to right.
fn unclosed_fence(text: &str) -> Option<SourceLocation> {
    let fences: Vec<usize> = FENCE.find_iter(text).map(|m| m.start()).collect();
    if fences.len() % 2 == 1 {
        fences.last().map(|&offset| SourceLocation::from_offset(text, offset))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_basic_paragraph() {
        assert_eq!(Renderer::new().render("Foo"), "<p>Foo</p>");
    }

    #[test]
    fn add_rule_appends_new_patterns() {
        let mut renderer = Renderer::new();
        let before = renderer.rules().len();
        renderer.add_rule(r"\(c\)", "&copy;").unwrap();
        assert_eq!(renderer.rules().len(), before + 1);
        assert_eq!(renderer.rules().last().unwrap().key(), r"\(c\)");
        assert_eq!(renderer.render("(c) 2024"), "<p>&copy; 2024</p>");
    }

    #[test]
    fn add_rule_replaces_matching_key_in_place() {
        let mut renderer = Renderer::new();
        let before = renderer.rules().len();
        let position = renderer
            .rules()
            .iter()
            .position(|rule| rule.key() == r#":"(.*?)":"#)
            .unwrap();
        renderer.add_rule(r#":"(.*?)":"#, "<cite>\\1</cite>").unwrap();
        assert_eq!(renderer.rules().len(), before);
        assert_eq!(renderer.rules()[position].key(), r#":"(.*?)":"#);
        assert_eq!(renderer.render(r#"A :"quote":"#), "<p>A <cite>quote</cite></p>");
    }

    #[test]
    fn add_rule_rejects_bad_patterns() {
        let mut renderer = Renderer::new();
        assert!(matches!(
            renderer.add_rule("([a-z]", "x"),
            Err(SlimdownError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn handler_rules_can_use_context() {
        let mut renderer = Renderer::new();
        renderer
            .add_rule(
                r"@count",
                Action::handler(|_, cx| cx.vault().len().to_string()),
            )
            .unwrap();
        assert_eq!(renderer.render("```a``` @count"), "<p><pre><code>a</code></pre> 1</p>");
    }

    #[test]
    fn reports_unclosed_fence() {
        let rendered = Renderer::new().render_with_diagnostics("ok\n\n```\nnever closed");
        assert_eq!(
            rendered.diagnostics.warnings,
            vec![RenderWarning::UnclosedCodeFence {
                location: SourceLocation::new(3, 1)
            }]
        );
        assert!(rendered.html.ends_with("<p>never closed</p>"));
    }

    #[test]
    fn try_render_fails_on_dangling_placeholder() {
        // A rule that forges a placeholder before reinsertion runs.
        let forged = Rule::new(Pattern::regex("FORGE").unwrap(), "{{{9}}}");
        let mut rules = Renderer::new().rules().to_vec();
        let paragraph = rules
            .iter()
            .position(|rule| rule.key() == r"(?m)^([^\n]+)$")
            .unwrap();
        rules.insert(paragraph, forged);
        let renderer = Renderer {
            options: RenderOptions::default(),
            rules,
        };

        assert_eq!(renderer.render("FORGE"), "<p>{{{9}}}</p>");
        assert!(matches!(
            renderer.try_render("FORGE"),
            Err(SlimdownError::DanglingPlaceholder { index: 9, .. })
        ));
        assert_eq!(renderer.try_render("fine").unwrap(), "<p>fine</p>");
    }
}
