//! Renderer configuration.

/// Options that shape the default rule table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderOptions {
    /// Clamp heading levels to `<h1>`..`<h6>` instead of emitting one level per `#`.
    pub clamp_heading_level: bool,
    /// Merge consecutive single-item lists and blockquotes into one container.
    pub merge_adjacent_blocks: bool,
}

impl RenderOptions {
    /// Classic slimdown behavior (unbounded heading levels, merged lists).
    pub const fn slimdown() -> Self {
        Self {
            clamp_heading_level: false,
            merge_adjacent_blocks: true,
        }
    }

    /// Only emit heading levels that exist in HTML.
    pub const fn strict_html() -> Self {
        Self {
            clamp_heading_level: true,
            merge_adjacent_blocks: true,
        }
    }

    /// Resolve the tag level for a run of `markers` heading characters.
    pub fn heading_level(&self, markers: usize) -> usize {
        if self.clamp_heading_level {
            markers.clamp(1, 6)
        } else {
            markers
        }
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::slimdown()
    }
}
