use thiserror::Error;

/// Source location information for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed, in characters)
    pub column: usize,
}

impl SourceLocation {
    /// Create a new source location
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Locate a byte offset inside `text`.
    ///
    /// Offsets past the end clamp to the end of the text.
    pub fn from_offset(text: &str, offset: usize) -> Self {
        let mut offset = offset.min(text.len());
        while !text.is_char_boundary(offset) {
            offset -= 1;
        }
        let before = &text[..offset];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |idx| idx + 1);
        let column = before[line_start..].chars().count() + 1;
        Self { line, column }
    }
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Errors surfaced by the renderer.
#[derive(Debug, Error)]
pub enum SlimdownError {
    /// A rule pattern failed to compile.
    #[error("invalid rule pattern `{pattern}`: {source}")]
    InvalidPattern {
        /// Pattern source as given to `add_rule`
        pattern: String,
        /// Underlying regex compilation error
        #[source]
        source: regex::Error,
    },
    /// A placeholder token referenced a code block that was never stored.
    #[error("placeholder {{{{{{{index}}}}}}} has no code block ({stored} stored)")]
    DanglingPlaceholder {
        /// Index named by the placeholder
        index: usize,
        /// Number of code blocks in the vault at the time
        stored: usize,
    },
}

/// Non-fatal warnings that don't prevent rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderWarning {
    /// A fence opener with no matching closer; it is emitted as plain text.
    UnclosedCodeFence {
        /// Source location of the unmatched fence
        location: SourceLocation,
    },
    /// A placeholder survived to reinsertion without a stored code block.
    DanglingPlaceholder {
        /// Index named by the placeholder
        index: usize,
    },
}

impl std::fmt::Display for RenderWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderWarning::UnclosedCodeFence { location } => {
                write!(f, "Unclosed code fence at {}", location)
            }
            RenderWarning::DanglingPlaceholder { index } => {
                write!(f, "Dangling code block placeholder #{}", index)
            }
        }
    }
}

/// Warnings collected during a single render.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderDiagnostics {
    /// List of non-fatal warnings
    pub warnings: Vec<RenderWarning>,
}

impl RenderDiagnostics {
    /// Create a new empty diagnostics collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a warning to the diagnostics collection
    pub fn add_warning(&mut self, warning: RenderWarning) {
        self.warnings.push(warning);
    }

    /// Check if there are any warnings
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// First dangling placeholder recorded, if any.
    pub fn dangling_placeholder(&self) -> Option<usize> {
        self.warnings.iter().find_map(|warning| match warning {
            RenderWarning::DanglingPlaceholder { index } => Some(*index),
            _ => None,
        })
    }

    /// Get total count of all diagnostics
    pub fn count(&self) -> usize {
        self.warnings.len()
    }
}
