use serde::Serialize;
use slimdown_core::{RenderOptions, Renderer};
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::*;

// ============================================================================
// Renderer Config
// ============================================================================

/// Configuration accepted by the WASM render functions.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct WasmRenderConfig {
    #[serde(default, alias = "clampHeadingLevel")]
    pub clamp_heading_level: Option<bool>,
    #[serde(default, alias = "mergeAdjacentBlocks")]
    pub merge_adjacent_blocks: Option<bool>,
}

fn parse_config(config: JsValue) -> Result<WasmRenderConfig, JsError> {
    if config.is_undefined() || config.is_null() {
        return Ok(WasmRenderConfig::default());
    }
    serde_wasm_bindgen::from_value(config)
        .map_err(|e| JsError::new(&format!("Invalid config: {}", e)))
}

fn build_render_options(cfg: &WasmRenderConfig) -> RenderOptions {
    let defaults = RenderOptions::default();
    RenderOptions {
        clamp_heading_level: cfg
            .clamp_heading_level
            .unwrap_or(defaults.clamp_heading_level),
        merge_adjacent_blocks: cfg
            .merge_adjacent_blocks
            .unwrap_or(defaults.merge_adjacent_blocks),
    }
}

// ============================================================================
// Render API
// ============================================================================

/// Result of rendering with diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct RenderResult {
    /// Rendered HTML.
    pub html: String,
    /// Human readable warnings.
    pub warnings: Vec<String>,
}

/// Renders Markdown to HTML.
///
/// # Arguments
///
/// * `input` - The Markdown text
/// * `config` - Optional configuration object (`clampHeadingLevel`, `mergeAdjacentBlocks`)
#[wasm_bindgen]
pub fn render(input: &str, config: JsValue) -> Result<String, JsError> {
    let cfg = parse_config(config)?;
    Ok(Renderer::with_options(build_render_options(&cfg)).render(input))
}

/// Renders Markdown and reports warnings such as unclosed code fences.
///
/// Returns `{ html, warnings }`.
#[wasm_bindgen(js_name = renderWithDiagnostics)]
pub fn render_with_diagnostics(input: &str, config: JsValue) -> Result<JsValue, JsError> {
    let cfg = parse_config(config)?;
    let rendered =
        Renderer::with_options(build_render_options(&cfg)).render_with_diagnostics(input);
    let result = RenderResult {
        html: rendered.html,
        warnings: rendered
            .diagnostics
            .warnings
            .iter()
            .map(ToString::to_string)
            .collect(),
    };

    serde_wasm_bindgen::to_value(&result)
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

// ============================================================================
// Renderer Object
// ============================================================================

/// A renderer that keeps custom rules between calls.
///
/// # Example (JavaScript)
///
/// ```javascript
/// import { Slimdown } from './slimdown_wasm';
///
/// const md = new Slimdown({ clampHeadingLevel: true });
/// md.addRule('\\(c\\)', '&copy;');
/// md.render('(c) 2024'); // "<p>&copy; 2024</p>"
/// ```
#[wasm_bindgen]
pub struct Slimdown {
    inner: Renderer,
}

#[wasm_bindgen]
impl Slimdown {
    /// Creates a renderer from an optional configuration object.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<Slimdown, JsError> {
        let cfg = parse_config(config)?;
        Ok(Slimdown {
            inner: Renderer::with_options(build_render_options(&cfg)),
        })
    }

    /// Registers a regex rule with a replacement template (`\1`, `$1`, `${1}`).
    #[wasm_bindgen(js_name = addRule)]
    pub fn add_rule(&mut self, pattern: &str, replacement: &str) -> Result<(), JsError> {
        self.inner
            .add_rule(pattern, replacement)
            .map_err(|e| JsError::new(&e.to_string()))
    }

    /// Renders Markdown with this renderer's rules.
    pub fn render(&self, input: &str) -> String {
        self.inner.render(input)
    }

    /// Number of rules currently registered.
    #[wasm_bindgen(getter, js_name = ruleCount)]
    pub fn rule_count(&self) -> usize {
        self.inner.rules().len()
    }
}
