//! Literal replacement templates with numbered group references.
//!
//! Group references may be written as `\N`, `$N` or `${N}` (up to two
//! digits for the unbraced forms). `\\` and `$$` produce a literal `\` and `$`.
//! A reference to a group that did not participate expands to nothing.

use crate::rule::Match;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Group(usize),
}

/// A parsed replacement template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
}

impl Template {
    /// Parse a replacement template.
    pub fn parse(source: &str) -> Self {
        let mut segments = Vec::new();
        let mut text = String::new();
        let bytes = source.as_bytes();
        let mut i = 0;

        while i < bytes.len() {
            let b = bytes[i];
            if b != b'\\' && b != b'$' {
                // Copy the whole run up to the next escape character.
                let next = source[i..]
                    .find(['\\', '$'])
                    .map_or(source.len(), |offset| i + offset);
                text.push_str(&source[i..next]);
                i = next;
                continue;
            }

            if bytes.get(i + 1) == Some(&b) {
                text.push(b as char);
                i += 2;
                continue;
            }

            let reference = if b == b'$' && bytes.get(i + 1) == Some(&b'{') {
                braced_group(&source[i + 2..]).map(|(group, len)| (group, len + 2))
            } else {
                digits_group(&source[i + 1..]).map(|(group, len)| (group, len + 1))
            };

            match reference {
                Some((group, consumed)) => {
                    if !text.is_empty() {
                        segments.push(Segment::Text(std::mem::take(&mut text)));
                    }
                    segments.push(Segment::Group(group));
                    i += consumed;
                }
                None => {
                    text.push(b as char);
                    i += 1;
                }
            }
        }

        if !text.is_empty() {
            segments.push(Segment::Text(text));
        }

        Self {
            source: source.to_string(),
            segments,
        }
    }

    /// Template as originally written.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Expand the template against a match.
    pub fn expand(&self, m: &Match<'_>) -> String {
        let mut out = String::with_capacity(self.source.len() + m.as_str().len());
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Group(group) => out.push_str(m.get(*group).unwrap_or("")),
            }
        }
        out
    }
}

/// `N` or `NN` at the start of `rest`; returns (group, bytes consumed).
fn digits_group(rest: &str) -> Option<(usize, usize)> {
    let len = rest.bytes().take(2).take_while(u8::is_ascii_digit).count();
    if len == 0 {
        return None;
    }
    rest[..len].parse().ok().map(|group| (group, len))
}

/// `N}` after a `${` opener; returns (group, bytes consumed including `}`).
fn braced_group(rest: &str) -> Option<(usize, usize)> {
    let close = rest.find('}')?;
    let digits = &rest[..close];
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok().map(|group| (group, close + 1))
}

impl From<&str> for Template {
    fn from(source: &str) -> Self {
        Self::parse(source)
    }
}

impl From<String> for Template {
    fn from(source: String) -> Self {
        Self::parse(&source)
    }
}
