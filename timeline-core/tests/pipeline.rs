use std::cell::RefCell;
use std::fs;

use serde_json::{json, Value};
use timeline_core::{
    layout, load, normalize, render, sort, AppState, Effect, Fetch, FetchResponse, LayoutConfig,
    LoadError, MemoryStore, RenderedTimeline, SortOrder, ViewMode, Viewport,
};

fn fixture_path(name: &str) -> String {
    format!("{}/tests/data/{name}", env!("CARGO_MANIFEST_DIR"))
}

fn fixture() -> String {
    fs::read_to_string(fixture_path("timeline.json")).expect("Không đọc được dữ liệu mẫu")
}

/// Host tĩnh từ chối query string trên file JSON.
struct StaticHost {
    body: String,
    requested: RefCell<Vec<String>>,
}

impl Fetch for StaticHost {
    async fn get(&self, url: &str) -> Result<FetchResponse, LoadError> {
        self.requested.borrow_mut().push(url.to_string());
        if url.contains('?') {
            return Ok(FetchResponse {
                status: 404,
                status_text: "Not Found".to_string(),
                body: String::new(),
            });
        }
        Ok(FetchResponse {
            status: 200,
            status_text: "OK".to_string(),
            body: self.body.clone(),
        })
    }
}

#[tokio::test]
async fn retry_path_loads_and_renders_fixture() {
    let host = StaticHost {
        body: fixture(),
        requested: RefCell::default(),
    };

    let raw = load(&host, "data/timeline.json", 1_700_000_000_000)
        .await
        .expect("Tải lại URL gốc phải thành công");
    assert_eq!(host.requested.borrow().len(), 2);

    let events = normalize(&raw);
    assert_eq!(events.len(), 6);

    let ordered = sort(&events, SortOrder::Ascending);
    let titles: Vec<_> = ordered.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(
        titles,
        [
            "Public beta",
            "Unknown month",
            "Project kickoff",
            "Mobile app",
            "Conference talk",
            "<b>Escaped</b>",
        ]
    );

    let plan = layout(
        &ordered,
        ViewMode::Graph,
        Viewport::new(1280.0, 800.0),
        &LayoutConfig::default(),
    );
    assert_eq!(plan.positions.len(), ordered.len());
    assert_eq!(plan.positions[3].x, plan.positions[4].x);
    assert_ne!(plan.positions[3].y, plan.positions[4].y);

    let html = render(&ordered, &plan, ViewMode::Graph).to_html();
    assert_eq!(html.matches("<article").count(), 6);
    assert!(html.contains("&lt;b&gt;Escaped&lt;/b&gt;"));
    assert!(!html.contains("<script>"));
    assert!(!html.contains("position:fixed"));
    assert!(html.contains("September 2014"));
    assert!(html.contains("Sept 2014"));
}

#[test]
fn normalized_fixture_upholds_invariants() {
    let raw: Value = serde_json::from_str(&fixture()).unwrap();
    let input_len = raw.as_array().map(Vec::len).unwrap_or_default();
    let events = normalize(&raw);

    assert!(events.len() <= input_len);
    for event in &events {
        assert!(!event.name.trim().is_empty());
        assert!((1..=12).contains(&event.month_number));
    }
}

#[test]
fn ascending_and_descending_round_trip() {
    let raw = json!([
        {"name": "later", "year": 2012, "month": "March"},
        {"name": "earlier", "year": 2010, "month": "jan"},
    ]);
    let events = normalize(&raw);

    let ascending = sort(&events, SortOrder::Ascending);
    assert_eq!(
        ascending.iter().map(|e| e.date_label()).collect::<Vec<_>>(),
        ["jan 2010", "March 2012"]
    );

    let descending = sort(&events, SortOrder::Descending);
    assert_eq!(
        descending.iter().map(|e| e.name.as_str()).collect::<Vec<_>>(),
        ["later", "earlier"]
    );
}

#[test]
fn wrong_top_level_shape_renders_empty_state() {
    let events = normalize(&json!({"events": [{"name": "a", "year": 1}]}));
    let plan = layout(&events, ViewMode::Graph, Viewport::new(800.0, 600.0), &LayoutConfig::default());
    assert!(plan.positions.is_empty());
    assert_eq!(render(&events, &plan, ViewMode::Graph), RenderedTimeline::Empty);
}

#[tokio::test]
async fn app_state_drives_full_cycle_with_store() {
    let mut store = MemoryStore::default();
    let host = StaticHost {
        body: fixture(),
        requested: RefCell::default(),
    };

    let state = AppState::new(timeline_core::load_preferences(&store));
    let (state, effects) = state.on_reload();
    let request = effects
        .iter()
        .find_map(|effect| match effect {
            Effect::Fetch(request) => Some(*request),
            _ => None,
        })
        .expect("reload phải yêu cầu tải dữ liệu");

    let result = load(&host, "timeline.json", 1).await;
    let (state, _) = state.on_load_finished(request, result, Some("https:"));

    let (state, effects) = state.on_view_change(ViewMode::Horizontal);
    for effect in effects {
        if let Effect::Persist(preference) = effect {
            timeline_core::persist(&mut store, preference);
        }
    }

    let restored = timeline_core::load_preferences(&store);
    assert_eq!(restored.view, ViewMode::Horizontal);

    let frame = state.frame(Viewport::new(800.0, 600.0), &LayoutConfig::default());
    assert_eq!(frame.card_count(), 6);
}
