//! Batch processing types and utilities for parallel rendering.

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Instant;

use rayon::prelude::*;

use crate::error::RenderWarning;
use crate::pipeline::Renderer;

/// Input for batch processing - a single document to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchInput {
    /// Document identifier (typically the file path).
    pub id: String,
    /// Markdown source content.
    pub source: String,
}

impl BatchInput {
    /// Create a batch input.
    pub fn new(id: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
        }
    }
}

/// Result for a single document in a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchResult {
    /// Document identifier matching the input.
    pub id: String,
    /// Rendered HTML.
    pub html: String,
    /// Warnings raised while rendering this document.
    pub warnings: Vec<RenderWarning>,
}

/// Statistics for batch processing.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchStats {
    /// Total number of documents processed.
    pub total: u32,
    /// Number of documents that raised at least one warning.
    pub with_warnings: u32,
    /// Total processing time in milliseconds.
    pub processing_time_ms: f64,
}

/// Options for batch processing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOptions {
    /// Maximum number of threads to use. Defaults to the global rayon pool.
    pub max_threads: Option<usize>,
}

/// Result of batch processing containing all results and statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchProcessingResult {
    /// Individual results, in input order.
    pub results: Vec<BatchResult>,
    /// Processing statistics.
    pub stats: BatchStats,
}

/// Render many documents in parallel with one shared renderer.
pub fn render_batch(
    renderer: &Renderer,
    inputs: Vec<BatchInput>,
    options: &BatchOptions,
) -> BatchProcessingResult {
    let start = Instant::now();

    let pool = match options.max_threads {
        Some(max_threads) if max_threads > 0 => {
            match rayon::ThreadPoolBuilder::new().num_threads(max_threads).build() {
                Ok(pool) => Some(pool),
                Err(err) => {
                    log::warn!("falling back to the global thread pool: {err}");
                    None
                }
            }
        }
        _ => None,
    };

    let total = inputs.len() as u32;
    let with_warnings = AtomicU32::new(0);

    let process_input = |input: BatchInput| -> BatchResult {
        let rendered = renderer.render_with_diagnostics(&input.source);
        if rendered.diagnostics.has_warnings() {
            with_warnings.fetch_add(1, Ordering::Relaxed);
        }
        BatchResult {
            id: input.id,
            html: rendered.html,
            warnings: rendered.diagnostics.warnings,
        }
    };

    let results: Vec<BatchResult> = if let Some(pool) = pool {
        pool.install(|| inputs.into_par_iter().map(process_input).collect())
    } else {
        inputs.into_par_iter().map(process_input).collect()
    };

    let elapsed = start.elapsed();
    log::debug!("rendered {} document(s) in {:?}", total, elapsed);

    BatchProcessingResult {
        results,
        stats: BatchStats {
            total,
            with_warnings: with_warnings.load(Ordering::Relaxed),
            processing_time_ms: elapsed.as_secs_f64() * 1000.0,
        },
    }
}
