//! The default rule table.
//!
//! Order matters:
//! - fenced code is extracted first and reinserted last;
//! - images run before links since they share the bracket syntax;
//! - URL sentinels are set before bold/emphasis and lifted after them;
//! - bold runs before emphasis so `**` is not read as two `*`;
//! - every block construct runs before paragraph wrapping, and list merging after it.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::delimited::GuardedDelimiter;
use crate::handlers;
use crate::options::RenderOptions;
use crate::rule::{Action, Rule};

macro_rules! pattern {
    ($name:ident, $source:expr) => {
        static $name: Lazy<Regex> =
            Lazy::new(|| Regex::new($source).expect(concat!(stringify!($name), " is valid")));
    };
}

pattern!(FENCED_CODE, r"(?s)```(.*?)```");
pattern!(HEADER, r"\n(#+)[ \t]+(.*)");
pattern!(IMAGE, r"!\[([^\[]+)\]\(([^\)]+)\)");
pattern!(LINK, r"\[([^\[]+)\]\(([^\)]+)\)");
pattern!(QUOTE, r#":"(.*?)":"#);
pattern!(INLINE_CODE, r"`(.*?)`");
pattern!(UNORDERED_ITEM, r"\n\*(.*)");
pattern!(ORDERED_ITEM, r"\n[0-9]+\.(.*)");
pattern!(BLOCKQUOTE, r"\n(&gt;|>)(.*)");
pattern!(HORIZONTAL_RULE, r"\n-{5,}");
pattern!(PARAGRAPH, r"(?m)^([^\n]+)$");
pattern!(MERGE_UL, r"</ul>\s?<ul>");
pattern!(MERGE_OL, r"</ol>\s?<ol>");
pattern!(MERGE_BLOCKQUOTE, r"</blockquote>\s?<blockquote>");
pattern!(LINK_URL, r"<a href='(.*?)'>");
pattern!(IMAGE_URL, r"<img src='(.*?)'");
pattern!(
    PLACEHOLDER,
    r"<p>\{\{\{([0-9]+)\}\}\}</p>|\{\{\{([0-9]+)\}\}\}"
);

/// Build the default rule table for `options`.
pub fn default_rules(options: &RenderOptions) -> Vec<Rule> {
    let mut rules = vec![
        Rule::new(FENCED_CODE.clone(), Action::handler(handlers::code_block)),
        Rule::new(HEADER.clone(), Action::handler(handlers::header)),
        Rule::new(IMAGE.clone(), Action::handler(handlers::image)),
        Rule::new(LINK.clone(), Action::handler(handlers::link)),
        Rule::new(GuardedDelimiter::new(["**", "__"]), "<strong>\\2</strong>"),
        Rule::new(GuardedDelimiter::new(["*", "_"]), "<em>\\2</em>"),
        Rule::new(GuardedDelimiter::new(["~~"]), "<del>\\2</del>"),
        Rule::new(QUOTE.clone(), "<q>\\1</q>"),
        Rule::new(INLINE_CODE.clone(), "<code>\\1</code>"),
        Rule::new(UNORDERED_ITEM.clone(), Action::handler(handlers::unordered_item)),
        Rule::new(ORDERED_ITEM.clone(), Action::handler(handlers::ordered_item)),
        Rule::new(BLOCKQUOTE.clone(), Action::handler(handlers::blockquote)),
        Rule::new(HORIZONTAL_RULE.clone(), "\n<hr />"),
        Rule::new(PARAGRAPH.clone(), Action::handler(handlers::paragraph)),
    ];

    if options.merge_adjacent_blocks {
        rules.push(Rule::new(MERGE_UL.clone(), ""));
        rules.push(Rule::new(MERGE_OL.clone(), ""));
        rules.push(Rule::new(MERGE_BLOCKQUOTE.clone(), "\n"));
    }

    rules.push(Rule::new(LINK_URL.clone(), Action::handler(handlers::unescape_link)));
    rules.push(Rule::new(IMAGE_URL.clone(), Action::handler(handlers::unescape_image)));
    rules.push(Rule::new(
        PLACEHOLDER.clone(),
        Action::handler(handlers::reinsert_code_block),
    ));

    rules
}
