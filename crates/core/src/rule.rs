//! Rules: a pattern paired with the action that rewrites each match.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use regex::Regex;

use crate::delimited::GuardedDelimiter;
use crate::pipeline::RenderContext;
use crate::template::Template;
use crate::SlimdownError;

/// A single match of a rule pattern.
///
/// Group 0 is always the whole match; higher groups are capture groups in
/// pattern order, `None` when they did not participate.
#[derive(Debug, Clone)]
pub struct Match<'t> {
    text: &'t str,
    groups: Vec<Option<(usize, usize)>>,
}

impl<'t> Match<'t> {
    /// Build a match from byte ranges into `text`. The first range is the full match.
    pub fn new(text: &'t str, groups: Vec<Option<(usize, usize)>>) -> Self {
        debug_assert!(matches!(groups.first(), Some(Some(_))));
        Self { text, groups }
    }

    fn from_captures(text: &'t str, captures: &regex::Captures<'t>) -> Self {
        let groups = captures
            .iter()
            .map(|group| group.map(|m| (m.start(), m.end())))
            .collect();
        Self { text, groups }
    }

    /// Byte range of the whole match.
    pub fn span(&self) -> (usize, usize) {
        self.groups
            .first()
            .copied()
            .flatten()
            .unwrap_or((0, 0))
    }

    /// Text of the whole match.
    pub fn as_str(&self) -> &'t str {
        let (start, end) = self.span();
        &self.text[start..end]
    }

    /// Text of capture group `index`.
    pub fn get(&self, index: usize) -> Option<&'t str> {
        let (start, end) = self.groups.get(index).copied().flatten()?;
        Some(&self.text[start..end])
    }

    /// Text of capture group `index`, or "" when absent.
    pub fn group(&self, index: usize) -> &'t str {
        self.get(index).unwrap_or("")
    }
}

/// How a rule finds the fragments it rewrites.
#[derive(Debug, Clone)]
pub enum Pattern {
    /// A regular expression applied to the whole document.
    Regex(Regex),
    /// Delimited spans guarded against inline code and tag attributes.
    Delimited(GuardedDelimiter),
}

impl Pattern {
    /// Compile a regular expression pattern.
    pub fn regex(source: &str) -> Result<Self, SlimdownError> {
        Regex::new(source)
            .map(Pattern::Regex)
            .map_err(|source_err| SlimdownError::InvalidPattern {
                pattern: source.to_string(),
                source: source_err,
            })
    }

    /// Key identifying the rule in a table; re-adding a key replaces the rule.
    pub fn key(&self) -> &str {
        match self {
            Pattern::Regex(regex) => regex.as_str(),
            Pattern::Delimited(delimiter) => delimiter.key(),
        }
    }

    /// All non-overlapping matches in `text`, left to right.
    pub fn find_iter<'t>(&self, text: &'t str) -> Vec<Match<'t>> {
        match self {
            Pattern::Regex(regex) => regex
                .captures_iter(text)
                .map(|captures| Match::from_captures(text, &captures))
                .collect(),
            Pattern::Delimited(delimiter) => delimiter.find_iter(text),
        }
    }
}

impl From<Regex> for Pattern {
    fn from(regex: Regex) -> Self {
        Pattern::Regex(regex)
    }
}

impl From<GuardedDelimiter> for Pattern {
    fn from(delimiter: GuardedDelimiter) -> Self {
        Pattern::Delimited(delimiter)
    }
}

/// Signature of rule handler functions.
pub type HandlerFn = dyn Fn(&Match<'_>, &mut RenderContext<'_>) -> String + Send + Sync;

/// What a rule produces for each match.
#[derive(Clone)]
pub enum Action {
    /// Expand a replacement template.
    Literal(Template),
    /// Call a handler with the match and the render context.
    Handler(Arc<HandlerFn>),
}

impl Action {
    /// Wrap a handler function.
    pub fn handler<F>(f: F) -> Self
    where
        F: Fn(&Match<'_>, &mut RenderContext<'_>) -> String + Send + Sync + 'static,
    {
        Action::Handler(Arc::new(f))
    }

    fn replacement(&self, m: &Match<'_>, cx: &mut RenderContext<'_>) -> String {
        match self {
            Action::Literal(template) => template.expand(m),
            Action::Handler(handler) => handler(m, cx),
        }
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Literal(template) => f.debug_tuple("Literal").field(&template.as_str()).finish(),
            Action::Handler(_) => f.write_str("Handler(..)"),
        }
    }
}

impl From<Template> for Action {
    fn from(template: Template) -> Self {
        Action::Literal(template)
    }
}

impl From<&str> for Action {
    fn from(template: &str) -> Self {
        Action::Literal(Template::parse(template))
    }
}

impl From<String> for Action {
    fn from(template: String) -> Self {
        Action::Literal(Template::parse(&template))
    }
}

/// A pattern and its action.
#[derive(Debug, Clone)]
pub struct Rule {
    pattern: Pattern,
    action: Action,
}

impl Rule {
    /// Pair a pattern with an action.
    pub fn new(pattern: impl Into<Pattern>, action: impl Into<Action>) -> Self {
        Self {
            pattern: pattern.into(),
            action: action.into(),
        }
    }

    /// Pattern of this rule.
    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// Action of this rule.
    pub fn action(&self) -> &Action {
        &self.action
    }

    /// Key identifying this rule in a table.
    pub fn key(&self) -> &str {
        self.pattern.key()
    }

    /// Rewrite every match in `text`. Borrows `text` back when nothing matched.
    pub fn apply<'t>(&self, text: &'t str, cx: &mut RenderContext<'_>) -> Cow<'t, str> {
        let matches = self.pattern.find_iter(text);
        if matches.is_empty() {
            return Cow::Borrowed(text);
        }

        log::trace!("rule `{}` rewrote {} match(es)", self.key(), matches.len());

        let mut out = String::with_capacity(text.len());
        let mut last = 0;
        for m in &matches {
            let (start, end) = m.span();
            out.push_str(&text[last..start]);
            out.push_str(&self.action.replacement(m, cx));
            last = end;
        }
        out.push_str(&text[last..]);
        Cow::Owned(out)
    }
}
