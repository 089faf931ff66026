#![cfg(target_arch = "wasm32")]

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Node};

const STYLE_TAG_SELECTOR: &str = "style[data-timeline-ui]";

/// Default CSS for the widget. Each theme is a set of design tokens keyed by `data-theme`.
pub const DEFAULT_STYLES: &str = r#"
.timeline-root {
  --timeline-font-family: 'Inter', system-ui, -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif;
  --timeline-bg: #f8fafc;
  --timeline-surface: #ffffff;
  --timeline-card-bg: #ffffff;
  --timeline-card-border: rgba(148, 163, 184, 0.32);
  --timeline-card-shadow: 0 12px 28px rgba(15, 23, 42, 0.08);
  --timeline-radius: 14px;
  --timeline-text: #1f2933;
  --timeline-muted: #52606d;
  --timeline-heading: #11181c;
  --timeline-accent: #2563eb;
  --timeline-axis: rgba(71, 84, 103, 0.22);
  --timeline-error-bg: rgba(180, 35, 24, 0.08);
  --timeline-error-text: #b42318;

  font-family: var(--timeline-font-family);
  background: var(--timeline-bg);
  color: var(--timeline-text);
  border-radius: var(--timeline-radius);
  display: flex;
  flex-direction: column;
  gap: 16px;
  padding: 20px;
}

.timeline-root[data-theme="dark"] {
  --timeline-bg: #0b111a;
  --timeline-surface: #111a26;
  --timeline-card-bg: #131d2b;
  --timeline-card-border: rgba(255, 255, 255, 0.08);
  --timeline-card-shadow: 0 14px 36px rgba(0, 0, 0, 0.45);
  --timeline-text: #e6edf7;
  --timeline-muted: #8fa0b8;
  --timeline-heading: #f5f8fc;
  --timeline-accent: #5cb0ff;
  --timeline-axis: rgba(255, 255, 255, 0.12);
  --timeline-error-bg: rgba(240, 99, 92, 0.12);
  --timeline-error-text: #f0635c;
}

.timeline-root[data-theme="sepia"] {
  --timeline-bg: #f4ecd8;
  --timeline-surface: #fbf6ea;
  --timeline-card-bg: #fffaf0;
  --timeline-card-border: rgba(120, 94, 54, 0.24);
  --timeline-card-shadow: 0 10px 24px rgba(92, 64, 26, 0.12);
  --timeline-text: #4a3b28;
  --timeline-muted: #7a6549;
  --timeline-heading: #3a2c1a;
  --timeline-accent: #a0522d;
  --timeline-axis: rgba(120, 94, 54, 0.25);
  --timeline-error-bg: rgba(160, 40, 20, 0.1);
  --timeline-error-text: #9a2a12;
}

.timeline-toolbar {
  display: flex;
  flex-wrap: wrap;
  align-items: center;
  gap: 12px;
  padding: 12px 16px;
  background: var(--timeline-surface);
  border: 1px solid var(--timeline-card-border);
  border-radius: var(--timeline-radius);
}

.toolbar-group {
  display: flex;
  align-items: center;
  gap: 8px;
}

.toolbar-label {
  font-size: 12px;
  font-weight: 600;
  letter-spacing: 0.04em;
  text-transform: uppercase;
  color: var(--timeline-muted);
}

.timeline-toolbar select,
.timeline-toolbar button {
  font: inherit;
  color: var(--timeline-text);
  background: var(--timeline-card-bg);
  border: 1px solid var(--timeline-card-border);
  border-radius: 999px;
  padding: 6px 12px;
  cursor: pointer;
}

.timeline-toolbar button:hover,
.timeline-toolbar select:hover {
  border-color: var(--timeline-accent);
}

.toolbar-status {
  margin-left: auto;
  font-size: 12px;
  color: var(--timeline-muted);
}

.timeline-viewport {
  position: relative;
  overflow: auto;
  scroll-behavior: smooth;
  border-radius: var(--timeline-radius);
  background: var(--timeline-surface);
  border: 1px solid var(--timeline-card-border);
}

.timeline-track {
  position: relative;
  display: flex;
  gap: 16px;
  padding: 20px;
}

.timeline-track[data-view="graph"] {
  display: block;
  padding: 0;
  background-image: linear-gradient(to right, var(--timeline-axis) 1px, transparent 1px);
  background-size: 220px 100%;
}

.timeline-track[data-view="vertical"] {
  flex-direction: column;
  max-width: 640px;
  margin: 0 auto;
}

.timeline-track[data-view="horizontal"] {
  flex-direction: row;
  width: max-content;
}

.timeline-card {
  position: relative;
  width: 240px;
  padding: 14px 16px;
  background: var(--timeline-card-bg);
  border: 1px solid var(--timeline-card-border);
  border-radius: 12px;
  box-shadow: var(--timeline-card-shadow);
}

.timeline-track[data-view="graph"] .timeline-card {
  position: absolute;
}

.timeline-track[data-view="vertical"] .timeline-card {
  width: auto;
}

.timeline-swatch {
  display: inline-block;
  width: 10px;
  height: 10px;
  margin-right: 8px;
  border-radius: 50%;
  vertical-align: middle;
}

.timeline-date {
  font-size: 12px;
  font-weight: 600;
  color: var(--timeline-accent);
}

.timeline-title {
  margin: 6px 0 4px;
  font-size: 16px;
  color: var(--timeline-heading);
}

.timeline-description {
  margin: 0;
  font-size: 14px;
  line-height: 1.45;
  color: var(--timeline-muted);
}

.timeline-state {
  padding: 48px 24px;
  text-align: center;
  color: var(--timeline-muted);
}

.timeline-error {
  color: var(--timeline-error-text);
  background: var(--timeline-error-bg);
  border-radius: var(--timeline-radius);
}

@media (max-width: 720px) {
  .timeline-root {
    padding: 12px;
  }

  .toolbar-status {
    margin-left: 0;
    width: 100%;
  }
}
"#;

pub fn ensure_styles(document: &Document) -> Result<(), JsValue> {
    if document.query_selector(STYLE_TAG_SELECTOR)?.is_some() {
        return Ok(());
    }

    let head = document
        .head()
        .ok_or_else(|| JsValue::from_str("Document không có thẻ <head>"))?;

    let style_el = document.create_element("style")?;
    style_el.set_attribute("data-timeline-ui", "v1")?;
    style_el.set_text_content(Some(DEFAULT_STYLES));
    head.append_child(&style_el.clone().dyn_into::<Node>()?)?;

    Ok(())
}
