//! Handler functions behind the default rules.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::RenderWarning;
use crate::pipeline::RenderContext;
use crate::rule::Match;

/// Sentinel standing in for `_` inside link and image URLs.
pub const UNDERSCORE_SENTINEL: &str = "{^^^}";
/// Sentinel standing in for `*` inside link and image URLs.
pub const ASTERISK_SENTINEL: &str = "{~~~}";

static BLOCK_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^</?(ul|ol|li|h|p|bl|table|tr|th|td|code)").expect("block tag pattern is valid")
});

/// Fenced code: park the rendered block in the vault.
pub fn code_block(m: &Match<'_>, cx: &mut RenderContext<'_>) -> String {
    cx.vault_mut().extract(m.group(1))
}

/// `#` headers; level follows the number of markers.
pub fn header(m: &Match<'_>, cx: &mut RenderContext<'_>) -> String {
    let level = cx.options().heading_level(m.group(1).len());
    format!(
        "\n<h{level}>{}</h{level}>",
        m.group(2).trim_ascii()
    )
}

/// `![alt](url)`
pub fn image(m: &Match<'_>, _cx: &mut RenderContext<'_>) -> String {
    format!(
        "<img src='{}' alt='{}' />",
        hide_url_markers(m.group(2)),
        m.group(1)
    )
}

/// `[text](url)`
pub fn link(m: &Match<'_>, _cx: &mut RenderContext<'_>) -> String {
    format!("<a href='{}'>{}</a>", hide_url_markers(m.group(2)), m.group(1))
}

/// `* item` as a single-item list.
pub fn unordered_item(m: &Match<'_>, _cx: &mut RenderContext<'_>) -> String {
    format!("\n<ul>\n\t<li>{}</li>\n</ul>", m.group(1).trim_ascii())
}

/// `1. item` as a single-item list.
pub fn ordered_item(m: &Match<'_>, _cx: &mut RenderContext<'_>) -> String {
    format!("\n<ol>\n\t<li>{}</li>\n</ol>", m.group(1).trim_ascii())
}

/// `> quote`, also accepting an already escaped `&gt;`.
pub fn blockquote(m: &Match<'_>, _cx: &mut RenderContext<'_>) -> String {
    format!("\n<blockquote>{}</blockquote>", m.group(2).trim_ascii())
}

/// Wrap a line in `<p>` unless it already opens or closes a block tag.
pub fn paragraph(m: &Match<'_>, _cx: &mut RenderContext<'_>) -> String {
    let line = m.group(1);
    let trimmed = line.trim_ascii();
    if BLOCK_TAG.is_match(trimmed) {
        return line.to_string();
    }
    if trimmed.is_empty() {
        return String::new();
    }
    format!("<p>{trimmed}</p>")
}

/// Restore `_` and `*` inside an emitted `href`.
pub fn unescape_link(m: &Match<'_>, _cx: &mut RenderContext<'_>) -> String {
    format!("<a href='{}'>", reveal_url_markers(m.group(1)))
}

/// Restore `_` and `*` inside an emitted `src`.
pub fn unescape_image(m: &Match<'_>, _cx: &mut RenderContext<'_>) -> String {
    format!("<img src='{}'", reveal_url_markers(m.group(1)))
}

/// Swap a placeholder (wrapped in `<p>` or bare) for its stored code block.
pub fn reinsert_code_block(m: &Match<'_>, cx: &mut RenderContext<'_>) -> String {
    let digits = m.get(1).or_else(|| m.get(2)).unwrap_or("");
    let Ok(index) = digits.parse::<usize>() else {
        return m.as_str().to_string();
    };

    match cx.vault().reinsert(index) {
        Ok(html) => html.to_string(),
        Err(err) => {
            log::warn!("{err}");
            cx.diagnostics_mut()
                .add_warning(RenderWarning::DanglingPlaceholder { index });
            m.as_str().to_string()
        }
    }
}

fn hide_url_markers(url: &str) -> String {
    url.replace('_', UNDERSCORE_SENTINEL)
        .replace('*', ASTERISK_SENTINEL)
}

fn reveal_url_markers(url: &str) -> String {
    url.replace(UNDERSCORE_SENTINEL, "_")
        .replace(ASTERISK_SENTINEL, "*")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RenderOptions;
    use crate::rule::Pattern;

    fn run(
        pattern: &str,
        handler: fn(&Match<'_>, &mut RenderContext<'_>) -> String,
        text: &str,
        options: RenderOptions,
    ) -> Vec<String> {
        let pattern = Pattern::regex(pattern).unwrap();
        let mut cx = RenderContext::new(&options);
        pattern
            .find_iter(text)
            .iter()
            .map(|m| handler(m, &mut cx))
            .collect()
    }

    #[test]
    fn header_level_counts_markers() {
        let out = run(r"\n(#+)[ \t]+(.*)", header, "\n### Title  ", RenderOptions::default());
        assert_eq!(out, vec!["\n<h3>Title</h3>"]);
    }

    #[test]
    fn header_level_is_unbounded_unless_clamped() {
        let text = "\n######## Deep";
        let out = run(r"\n(#+)[ \t]+(.*)", header, text, RenderOptions::default());
        assert_eq!(out, vec!["\n<h8>Deep</h8>"]);
        let out = run(r"\n(#+)[ \t]+(.*)", header, text, RenderOptions::strict_html());
        assert_eq!(out, vec!["\n<h6>Deep</h6>"]);
    }

    #[test]
    fn link_hides_emphasis_markers_in_url() {
        let out = run(
            r"\[([^\[]+)\]\(([^\)]+)\)",
            link,
            "[x](http://a.b/c_d*e)",
            RenderOptions::default(),
        );
        assert_eq!(out, vec!["<a href='http://a.b/c{^^^}d{~~~}e'>x</a>"]);
    }

    #[test]
    fn unescape_link_reveals_markers() {
        let out = run(
            r"<a href='(.*?)'>",
            unescape_link,
            "<a href='c{^^^}d{~~~}e'>",
            RenderOptions::default(),
        );
        assert_eq!(out, vec!["<a href='c_d*e'>"]);
    }

    #[test]
    fn paragraph_skips_block_tags_and_blank_lines() {
        let pattern = r"(?m)^([^\n]+)$";
        let opts = RenderOptions::default();
        assert_eq!(run(pattern, paragraph, " Foo ", opts), vec!["<p>Foo</p>"]);
        assert_eq!(run(pattern, paragraph, "\t<li>a</li>", opts), vec!["\t<li>a</li>"]);
        assert_eq!(run(pattern, paragraph, "<hr />", opts), vec!["<hr />"]);
        assert_eq!(run(pattern, paragraph, "   ", opts), vec![""]);
        assert_eq!(run(pattern, paragraph, "<em>x</em>", opts), vec!["<p><em>x</em></p>"]);
    }

    #[test]
    fn reinsert_unknown_index_keeps_token_and_warns() {
        let options = RenderOptions::default();
        let mut cx = RenderContext::new(&options);
        let pattern = Pattern::regex(r"<p>\{\{\{([0-9]+)\}\}\}</p>|\{\{\{([0-9]+)\}\}\}").unwrap();
        let found = pattern.find_iter("<p>{{{7}}}</p>");
        assert_eq!(reinsert_code_block(&found[0], &mut cx), "<p>{{{7}}}</p>");
        assert_eq!(cx.diagnostics().dangling_placeholder(), Some(7));
    }

    #[test]
    fn reinsert_uses_vault_entry() {
        let options = RenderOptions::default();
        let mut cx = RenderContext::new(&options);
        cx.vault_mut().extract("x < y");
        let pattern = Pattern::regex(r"<p>\{\{\{([0-9]+)\}\}\}</p>|\{\{\{([0-9]+)\}\}\}").unwrap();
        let found = pattern.find_iter("a {{{0}}} b");
        assert_eq!(
            reinsert_code_block(&found[0], &mut cx),
            "<pre><code>x &lt; y</code></pre>"
        );
    }
}
