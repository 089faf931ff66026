//! Bridge WASM <-> JavaScript trung lập framework.

use serde::Deserialize;
use serde_wasm_bindgen::{from_value, to_value};
use timeline_core::{
    layout, normalize, render, LayoutConfig, RenderedTimeline, SortOrder, TimelineError, ViewMode,
    Viewport,
};
use wasm_bindgen::prelude::*;

#[derive(Deserialize, Default)]
struct JsTimelineOptions {
    #[serde(default)]
    view: Option<String>,
    #[serde(default)]
    sort: Option<String>,
    #[serde(default)]
    viewport_width: Option<f64>,
    #[serde(default)]
    viewport_height: Option<f64>,
    #[serde(default)]
    pixels_per_year: Option<f64>,
    #[serde(default)]
    lane_offsets: Option<Vec<f64>>,
}

struct ArrangeOptions {
    view: ViewMode,
    sort: SortOrder,
    viewport: Viewport,
    layout: LayoutConfig,
}

impl TryFrom<JsTimelineOptions> for ArrangeOptions {
    type Error = TimelineError;

    fn try_from(opts: JsTimelineOptions) -> Result<Self, Self::Error> {
        let mut layout = LayoutConfig::default();
        if let Some(pixels) = opts.pixels_per_year {
            layout.pixels_per_year = pixels;
        }
        if let Some(lanes) = opts.lane_offsets {
            layout.lane_offsets = lanes;
        }
        if !(layout.pixels_per_year > 0.0) || layout.lane_offsets.is_empty() {
            return Err(TimelineError::InvalidConfig(
                "pixels_per_year phải lớn hơn 0 và lane_offsets không được rỗng".to_string(),
            ));
        }

        Ok(Self {
            view: opts.view.as_deref().map(str::parse::<ViewMode>).transpose()?.unwrap_or_default(),
            sort: opts.sort.as_deref().map(str::parse::<SortOrder>).transpose()?.unwrap_or_default(),
            viewport: Viewport::new(
                opts.viewport_width.unwrap_or_default(),
                opts.viewport_height.unwrap_or_default(),
            ),
            layout,
        })
    }
}

/// Chuẩn hóa mảng sự kiện thô, trả về danh sách `CanonicalEvent`.
#[wasm_bindgen]
pub fn normalize_timeline(raw: JsValue) -> Result<JsValue, JsValue> {
    init_panic_hook();

    let raw = read_raw(raw)?;
    to_value(&normalize(&raw))
        .map_err(|err| JsValue::from_str(&format!("Không serialize danh sách sự kiện: {err}")))
}

/// Chạy trọn pipeline: chuẩn hóa, sắp xếp, dàn trang và dựng mô hình hiển thị.
#[wasm_bindgen]
pub fn arrange_timeline(raw: JsValue, options: Option<JsValue>) -> Result<JsValue, JsValue> {
    init_panic_hook();

    let rendered = arrange(read_raw(raw)?, read_options(options)?);
    to_value(&rendered)
        .map_err(|err| JsValue::from_str(&format!("Không serialize timeline: {err}")))
}

/// Như [`arrange_timeline`] nhưng trả về HTML đã escape, sẵn sàng gán vào vùng chứa.
#[wasm_bindgen]
pub fn render_timeline_html(raw: JsValue, options: Option<JsValue>) -> Result<String, JsValue> {
    init_panic_hook();

    Ok(arrange(read_raw(raw)?, read_options(options)?).to_html())
}

fn arrange(raw: serde_json::Value, options: ArrangeOptions) -> RenderedTimeline {
    let events = timeline_core::sort(&normalize(&raw), options.sort);
    let plan = layout(&events, options.view, options.viewport, &options.layout);
    render(&events, &plan, options.view)
}

fn read_raw(raw: JsValue) -> Result<serde_json::Value, JsValue> {
    from_value::<serde_json::Value>(raw)
        .map_err(|err| JsValue::from_str(&format!("Không đọc được dữ liệu timeline: {err}")))
}

fn read_options(options: Option<JsValue>) -> Result<ArrangeOptions, JsValue> {
    let opts = match options {
        Some(js_opts) if !js_opts.is_undefined() && !js_opts.is_null() => {
            from_value::<JsTimelineOptions>(js_opts)
                .map_err(|err| JsValue::from_str(&format!("Không đọc được options: {err}")))?
        }
        _ => JsTimelineOptions::default(),
    };
    ArrangeOptions::try_from(opts).map_err(|err| JsValue::from_str(&format_timeline_error(err)))
}

fn init_panic_hook() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}

fn format_timeline_error(err: TimelineError) -> String {
    format!("Timeline error: {err}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn options_default_to_graph_ascending() {
        let options = ArrangeOptions::try_from(JsTimelineOptions::default()).unwrap();
        assert_eq!(options.view, ViewMode::Graph);
        assert_eq!(options.sort, SortOrder::Ascending);
        assert_eq!(options.layout, LayoutConfig::default());
    }

    #[test]
    fn unknown_view_name_is_an_error() {
        let opts = JsTimelineOptions {
            view: Some("spiral".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            ArrangeOptions::try_from(opts),
            Err(TimelineError::InvalidOption { kind: "view", .. })
        ));
    }

    #[test]
    fn empty_lane_override_is_rejected() {
        let opts = JsTimelineOptions {
            lane_offsets: Some(Vec::new()),
            ..Default::default()
        };
        assert!(ArrangeOptions::try_from(opts).is_err());
    }

    #[test]
    fn arrange_sorts_and_lays_out() {
        let opts = JsTimelineOptions {
            sort: Some("desc".to_string()),
            viewport_width: Some(640.0),
            viewport_height: Some(480.0),
            ..Default::default()
        };
        let raw = json!([
            {"name": "a", "year": 2001},
            {"name": "b", "year": 2003},
        ]);
        let RenderedTimeline::Cards { cards, extent, .. } =
            arrange(raw, ArrangeOptions::try_from(opts).unwrap())
        else {
            panic!("expected cards");
        };
        assert_eq!(cards[0].title, "b");
        assert!(cards.iter().all(|card| card.position.is_some()));
        assert!(extent.is_some());
    }
}
