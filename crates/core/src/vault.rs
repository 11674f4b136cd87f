//! Code block vault: fenced code is rendered up front and parked behind
//! `{{{N}}}` placeholders so later rules cannot touch it.

use std::borrow::Cow;
use std::collections::BTreeSet;

use crate::SlimdownError;

/// Reserved token prefixes the pipeline itself emits.
const RESERVED_TOKENS: [&str; 3] = ["{{{", "{^^^}", "{~~~}"];

/// Ordered store of rendered code blocks for a single render.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeBlockVault {
    blocks: Vec<String>,
}

impl CodeBlockVault {
    /// Creates an empty vault.
    pub fn new() -> Self {
        Self { blocks: Vec::new() }
    }

    /// Render `raw` fenced content, store it and return its placeholder.
    pub fn extract(&mut self, raw: &str) -> String {
        self.blocks.push(render_code_block(raw));
        placeholder(self.blocks.len() - 1)
    }

    /// Stored HTML for `index`.
    pub fn reinsert(&self, index: usize) -> Result<&str, SlimdownError> {
        self.blocks
            .get(index)
            .map(String::as_str)
            .ok_or(SlimdownError::DanglingPlaceholder {
                index,
                stored: self.blocks.len(),
            })
    }

    /// Number of stored blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether no block has been stored.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// Placeholder token for vault entry `index`.
pub fn placeholder(index: usize) -> String {
    format!("{{{{{{{index}}}}}}}")
}

fn render_code_block(raw: &str) -> String {
    let escaped = html_escape::encode_double_quoted_attribute(raw);
    let joined = escaped.replace("\n\n", "<br>").replace('\n', "<br>");

    let mut body = joined.as_str();
    while let Some(rest) = body.strip_prefix("<br>") {
        body = rest;
    }
    while let Some(rest) = body.strip_suffix("<br>") {
        body = rest;
    }

    format!("<pre><code>{}</code></pre>", body.trim_ascii())
}

/// Input with its `{` characters hidden behind a private-use stand-in.
#[derive(Debug)]
pub(crate) struct Protected<'a> {
    /// Text handed to the rules.
    pub(crate) text: Cow<'a, str>,
    stand_in: Option<char>,
}

impl Protected<'_> {
    /// Emit hidden braces as character references. Text is returned as is
    /// when nothing was hidden.
    pub(crate) fn release<'t>(&self, output: &'t str) -> Cow<'t, str> {
        match self.stand_in {
            Some(stand_in) if output.contains(stand_in) => {
                Cow::Owned(output.replace(stand_in, "&#123;"))
            }
            _ => Cow::Borrowed(output),
        }
    }
}

/// Hide every `{` when the input contains a token the pipeline reserves for
/// itself, so user text cannot alias a placeholder or a URL sentinel.
///
/// The stand-in is a private-use character absent from the input.
pub(crate) fn protect_reserved(text: &str) -> Protected<'_> {
    if !RESERVED_TOKENS.iter().any(|token| text.contains(token)) {
        return Protected {
            text: Cow::Borrowed(text),
            stand_in: None,
        };
    }

    let used: BTreeSet<char> = text.chars().filter(|c| is_private_use(*c)).collect();
    let stand_in = ('\u{E000}'..='\u{F8FF}')
        .chain('\u{F0000}'..='\u{FFFFD}')
        .find(|c| !used.contains(c));

    match stand_in {
        Some(stand_in) => Protected {
            text: Cow::Owned(text.replace('{', stand_in.encode_utf8(&mut [0; 4]))),
            stand_in: Some(stand_in),
        },
        None => {
            log::warn!("no free private-use character, reserved tokens left as is");
            Protected {
                text: Cow::Borrowed(text),
                stand_in: None,
            }
        }
    }
}

fn is_private_use(c: char) -> bool {
    matches!(c, '\u{E000}'..='\u{F8FF}' | '\u{F0000}'..='\u{FFFFD}')
}
