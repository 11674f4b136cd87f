//! Guarded delimiter matching for bold, emphasis and strikethrough.
//!
//! A span opens with one of the rule's markers and closes at the nearest
//! repeat of the same marker on the same line. Content may be empty. Before
//! a span is accepted the opener must pass two guards:
//!
//! - backtick balance: everything after the opener splits into single-line
//!   backtick pairs plus backtick-free text, so the opener is not inside
//!   inline code;
//! - tag guard: the opener is not followed (before any `/` or `<`) by a `>`
//!   whose line later holds a closing tag, which would put it inside the
//!   attributes of already emitted HTML.
//!
//! Both guards are heuristics and only approximate "outside code and tags".

use crate::rule::Match;

/// Matcher for a set of alternative delimiter markers.
///
/// Matches expose group 1 as the marker and group 2 as the enclosed text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardedDelimiter {
    key: String,
    markers: Vec<String>,
}

impl GuardedDelimiter {
    /// Create a matcher; markers are tried in order at each position.
    pub fn new<I, S>(markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let markers: Vec<String> = markers
            .into_iter()
            .map(Into::into)
            .filter(|marker| !marker.is_empty())
            .collect();
        let key = format!("delimited:{}", markers.join("|"));
        Self { key, markers }
    }

    /// Key used to identify the rule in a rule table.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Markers in priority order.
    pub fn markers(&self) -> &[String] {
        &self.markers
    }

    /// All non-overlapping spans in `text`, left to right.
    ///
    /// Runs in time linear in `text` for a fixed marker set.
    pub fn find_iter<'t>(&self, text: &'t str) -> Vec<Match<'t>> {
        let mut found = Vec::new();
        if self.markers.is_empty() {
            return found;
        }

        let scan = Scan {
            outside_code: backtick_balance(text),
            in_tag: tag_guard(text),
            line_end: line_ends(text),
            next_marker: self
                .markers
                .iter()
                .map(|marker| next_occurrence(text, marker))
                .collect(),
        };
        let mut pos = 0;

        while pos < text.len() {
            if !text.is_char_boundary(pos) {
                pos += 1;
                continue;
            }
            match self.match_at(text, pos, &scan) {
                Some(m) => {
                    let (_, end) = m.span();
                    found.push(m);
                    pos = end;
                }
                None => pos += 1,
            }
        }

        found
    }

    fn match_at<'t>(&self, text: &'t str, pos: usize, scan: &Scan) -> Option<Match<'t>> {
        let (marker, next) = self
            .markers
            .iter()
            .zip(&scan.next_marker)
            .find(|(_, next)| next[pos] == pos)?;
        let content_start = pos + marker.len();

        if !scan.outside_code[content_start] || scan.in_tag[content_start] {
            return None;
        }

        let close = next[content_start];
        let end = close.checked_add(marker.len())?;
        if end > scan.line_end[content_start] {
            return None;
        }

        Some(Match::new(
            text,
            vec![
                Some((pos, end)),
                Some((pos, content_start)),
                Some((content_start, close)),
            ],
        ))
    }
}

/// Per-offset tables shared by every opener tried in one pass.
struct Scan {
    outside_code: Vec<bool>,
    in_tag: Vec<bool>,
    line_end: Vec<usize>,
    /// For each marker, the first offset at or after `i` where it starts.
    next_marker: Vec<Vec<usize>>,
}

/// For every byte offset, the offset of the next `\n` (or the text length).
fn line_ends(text: &str) -> Vec<usize> {
    let bytes = text.as_bytes();
    let mut ends = vec![bytes.len(); bytes.len() + 1];
    for i in (0..bytes.len()).rev() {
        ends[i] = if bytes[i] == b'\n' { i } else { ends[i + 1] };
    }
    ends
}

/// For every byte offset, where `marker` next starts; `usize::MAX` if never.
fn next_occurrence(text: &str, marker: &str) -> Vec<usize> {
    let bytes = text.as_bytes();
    let needle = marker.as_bytes();
    let mut next = vec![usize::MAX; bytes.len() + 1];
    for i in (0..bytes.len()).rev() {
        next[i] = if bytes[i..].starts_with(needle) {
            i
        } else {
            next[i + 1]
        };
    }
    next
}

/// For every byte offset, whether the remainder of `text` starting there is
/// made of backtick-free text and balanced backtick pairs that do not span a
/// line break.
fn backtick_balance(text: &str) -> Vec<bool> {
    let bytes = text.as_bytes();
    let mut outside = vec![false; bytes.len() + 1];
    let mut inside = vec![false; bytes.len() + 1];
    outside[bytes.len()] = true;

    for i in (0..bytes.len()).rev() {
        match bytes[i] {
            b'`' => {
                outside[i] = inside[i + 1];
                inside[i] = outside[i + 1];
            }
            b'\n' | b'\r' => {
                outside[i] = outside[i + 1];
                inside[i] = false;
            }
            _ => {
                outside[i] = outside[i + 1];
                inside[i] = inside[i + 1];
            }
        }
    }

    outside
}

/// For every byte offset, whether a `>` follows (with no `/` or `<` in
/// between) whose line continues with a closing tag.
fn tag_guard(text: &str) -> Vec<bool> {
    let bytes = text.as_bytes();
    let len = bytes.len();
    // gt_after[i]: a `>` occurs at or after `i` on the same line.
    let mut gt_after = vec![false; len + 1];
    // closer_after[i]: a `</x..>` closing tag starts at or after `i` on the same line.
    let mut closer_after = vec![false; len + 1];
    let mut guarded = vec![false; len + 1];

    for i in (0..len).rev() {
        let b = bytes[i];
        gt_after[i] = match b {
            b'\n' => false,
            b'>' => true,
            _ => gt_after[i + 1],
        };
        closer_after[i] = match b {
            b'\n' => false,
            b'<' if bytes.get(i + 1) == Some(&b'/') => {
                closing_tag_at(text, i, &gt_after) || closer_after[i + 1]
            }
            _ => closer_after[i + 1],
        };
        guarded[i] = match b {
            b'/' | b'<' => false,
            b'>' => closer_after[i + 1] || guarded[i + 1],
            _ => guarded[i + 1],
        };
    }

    guarded
}

/// `</` at `start`, then one character other than a line break, then a `>`
/// later on the line.
fn closing_tag_at(text: &str, start: usize, gt_after: &[bool]) -> bool {
    match text[start + 2..].chars().next() {
        Some('\n') | None => false,
        Some(c) => gt_after[start + 2 + c.len_utf8()],
    }
}
