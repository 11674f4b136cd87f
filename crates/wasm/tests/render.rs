use serde::{Deserialize, Serialize};
use slimdown_wasm::{Slimdown, render, render_with_diagnostics};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

#[derive(Deserialize, Debug)]
struct RenderResult {
    html: String,
    warnings: Vec<String>,
}

#[derive(Serialize, Default)]
struct Config {
    #[serde(rename = "clampHeadingLevel", skip_serializing_if = "Option::is_none")]
    clamp_heading_level: Option<bool>,
    #[serde(rename = "mergeAdjacentBlocks", skip_serializing_if = "Option::is_none")]
    merge_adjacent_blocks: Option<bool>,
}

fn config(cfg: Config) -> JsValue {
    serde_wasm_bindgen::to_value(&cfg).expect("serialize config")
}

#[wasm_bindgen_test]
fn render_basic_markdown() {
    let html = render("# Hello\n\nThis is **bold** text.", JsValue::UNDEFINED)
        .expect("render should succeed");
    assert_eq!(html, "<h1>Hello</h1>\n\n<p>This is <strong>bold</strong> text.</p>");
}

#[wasm_bindgen_test]
fn render_with_clamped_headings() {
    let cfg = config(Config {
        clamp_heading_level: Some(true),
        ..Default::default()
    });
    let html = render("######## Deep", cfg).expect("render should succeed");
    assert_eq!(html, "<h6>Deep</h6>");
}

#[wasm_bindgen_test]
fn render_without_merging_keeps_lists_apart() {
    let html = render(
        "* a\n* b",
        config(Config {
            merge_adjacent_blocks: Some(false),
            ..Default::default()
        }),
    )
    .expect("render should succeed");
    assert_eq!(html, "<ul>\n\t<li>a</li>\n</ul>\n<ul>\n\t<li>b</li>\n</ul>");
}

#[wasm_bindgen_test]
fn render_reports_unclosed_fence() {
    let result = render_with_diagnostics("```\nopen", JsValue::NULL).expect("render should succeed");
    let result: RenderResult = serde_wasm_bindgen::from_value(result).expect("deserialize result");

    assert_eq!(result.warnings, vec!["Unclosed code fence at 1:1".to_string()]);
    assert!(result.html.contains("open"));
}

#[wasm_bindgen_test]
fn renderer_object_keeps_custom_rules() {
    let mut md = Slimdown::new(JsValue::UNDEFINED).expect("construct renderer");
    let before = md.rule_count();
    md.add_rule(r"\(c\)", "&copy;").expect("valid rule");

    assert_eq!(md.rule_count(), before + 1);
    assert_eq!(md.render("(c) 2024"), "<p>&copy; 2024</p>");
}

#[wasm_bindgen_test]
fn renderer_object_rejects_bad_patterns() {
    let mut md = Slimdown::new(JsValue::UNDEFINED).expect("construct renderer");
    assert!(md.add_rule("(unclosed", "x").is_err());
}
