//! Mô hình hiển thị của timeline và bản HTML tĩnh tương ứng.
//!
//! Giao diện yew và bản HTML dùng cùng một [`RenderedTimeline`], nên mỗi lần
//! dựng lại đều thay toàn bộ nội dung chứ không vá từng phần.

use serde::{Deserialize, Serialize};

use crate::layout::{Extent, LayoutPlan, Position};
use crate::model::CanonicalEvent;
use crate::ViewMode;

pub const EMPTY_MESSAGE: &str = "Chưa có sự kiện nào để hiển thị.";
pub const LOADING_MESSAGE: &str = "Đang tải timeline...";

/// Một thẻ sự kiện đã sẵn sàng để hiển thị.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Card {
    pub title: String,
    pub description: String,
    pub date_label: String,
    pub color: Option<String>,
    /// Chỉ có ở chế độ graph; các chế độ khác xóa định vị tuyệt đối.
    pub position: Option<Position>,
}

/// Toàn bộ nội dung vùng timeline tại một thời điểm.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderedTimeline {
    Loading,
    Empty,
    Error {
        message: String,
    },
    Cards {
        view: ViewMode,
        extent: Option<Extent>,
        cards: Vec<Card>,
    },
}

/// Dựng thẻ cho dãy sự kiện đã sắp xếp.
pub fn render(events: &[CanonicalEvent], plan: &LayoutPlan, view: ViewMode) -> RenderedTimeline {
    if events.is_empty() {
        return RenderedTimeline::Empty;
    }

    let cards = events
        .iter()
        .enumerate()
        .map(|(slot, event)| Card {
            title: event.name.clone(),
            description: event.description.clone(),
            date_label: event.date_label(),
            color: event.color.clone(),
            position: match view {
                ViewMode::Graph => plan.positions.get(slot).copied(),
                ViewMode::Vertical | ViewMode::Horizontal => None,
            },
        })
        .collect();

    RenderedTimeline::Cards {
        view,
        extent: match view {
            ViewMode::Graph => plan.extent,
            ViewMode::Vertical | ViewMode::Horizontal => None,
        },
        cards,
    }
}

impl RenderedTimeline {
    pub fn error(message: impl Into<String>) -> Self {
        RenderedTimeline::Error {
            message: message.into(),
        }
    }

    pub fn card_count(&self) -> usize {
        match self {
            RenderedTimeline::Cards { cards, .. } => cards.len(),
            _ => 0,
        }
    }

    /// HTML tĩnh; mọi chuỗi từ dữ liệu đều được escape.
    pub fn to_html(&self) -> String {
        match self {
            RenderedTimeline::Loading => format!(
                r#"<div class="timeline-state timeline-loading" aria-busy="true">{}</div>"#,
                html_escape(LOADING_MESSAGE)
            ),
            RenderedTimeline::Empty => format!(
                r#"<div class="timeline-state timeline-empty">{}</div>"#,
                html_escape(EMPTY_MESSAGE)
            ),
            RenderedTimeline::Error { message } => format!(
                r#"<div class="timeline-state timeline-error" role="alert">{}</div>"#,
                html_escape(message)
            ),
            RenderedTimeline::Cards {
                view,
                extent,
                cards,
            } => {
                let mut html = format!(r#"<div class="timeline-track" data-view="{view}""#);
                if let Some(extent) = extent {
                    html.push_str(&format!(
                        r#" style="width:{}px;height:{}px""#,
                        extent.width, extent.height
                    ));
                }
                html.push('>');
                for card in cards {
                    html.push_str(&card_html(card));
                }
                html.push_str("</div>");
                html
            }
        }
    }
}

fn card_html(card: &Card) -> String {
    let mut html = String::from(r#"<article class="timeline-card""#);
    if let Some(position) = card.position {
        html.push_str(&format!(
            r#" style="left:{}px;top:{}px""#,
            position.x, position.y
        ));
    }
    html.push('>');

    if let Some(color) = &card.color {
        html.push_str(&format!(
            r#"<span class="timeline-swatch" style="background:{}"></span>"#,
            html_escape(color)
        ));
    }
    html.push_str(&format!(
        r#"<time class="timeline-date">{}</time><h3 class="timeline-title">{}</h3>"#,
        html_escape(&card.date_label),
        html_escape(&card.title)
    ));
    if !card.description.is_empty() {
        html.push_str(&format!(
            r#"<p class="timeline-description">{}</p>"#,
            html_escape(&card.description)
        ));
    }
    html.push_str("</article>");
    html
}

/// Escape ký tự đặc biệt cho cả nội dung lẫn giá trị thuộc tính.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{layout, LayoutConfig, Viewport};

    fn event(name: &str, year: i32, month_label: &str) -> CanonicalEvent {
        CanonicalEvent {
            name: name.to_string(),
            description: "details".to_string(),
            year,
            month_number: 1,
            month_label: month_label.to_string(),
            color: Some("#336699".to_string()),
            original_index: 0,
        }
    }

    #[test]
    fn empty_input_renders_placeholder_only() {
        let rendered = render(&[], &LayoutPlan::default(), ViewMode::Graph);
        assert_eq!(rendered, RenderedTimeline::Empty);
        assert_eq!(rendered.card_count(), 0);
        assert!(rendered.to_html().contains("timeline-empty"));
        assert!(!rendered.to_html().contains("timeline-card"));
    }

    #[test]
    fn graph_cards_carry_positions() {
        let events = [event("a", 2000, "Jan"), event("b", 2001, "")];
        let plan = layout(&events, ViewMode::Graph, Viewport::new(800.0, 600.0), &LayoutConfig::default());
        let RenderedTimeline::Cards { cards, extent, .. } = render(&events, &plan, ViewMode::Graph) else {
            panic!("expected cards");
        };
        assert!(extent.is_some());
        assert_eq!(cards[0].position, Some(plan.positions[0]));
        assert_eq!(cards[0].date_label, "Jan 2000");
        assert_eq!(cards[1].date_label, "2001");
    }

    #[test]
    fn linear_views_drop_stale_positions() {
        let events = [event("a", 2000, "Jan")];
        let graph_plan = layout(&events, ViewMode::Graph, Viewport::new(800.0, 600.0), &LayoutConfig::default());
        let RenderedTimeline::Cards { cards, extent, .. } = render(&events, &graph_plan, ViewMode::Vertical) else {
            panic!("expected cards");
        };
        assert_eq!(cards[0].position, None);
        assert_eq!(extent, None);
    }

    #[test]
    fn markup_in_fields_is_escaped() {
        let mut hostile = event("<script>alert(1)</script>", 2000, "");
        hostile.description = "<img src=x onerror=\"boom\">".to_string();
        let html = render(&[hostile], &LayoutPlan::default(), ViewMode::Vertical).to_html();
        assert!(!html.contains("<script>"));
        assert!(!html.contains("<img"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(html.contains("onerror=&quot;boom&quot;"));
    }

    #[test]
    fn rendering_is_idempotent() {
        let events = [event("a", 2000, "Jan"), event("b", 2003, "May")];
        let plan = layout(&events, ViewMode::Graph, Viewport::new(640.0, 480.0), &LayoutConfig::default());
        let first = render(&events, &plan, ViewMode::Graph);
        let second = render(&events, &plan, ViewMode::Graph);
        assert_eq!(first, second);
        assert_eq!(first.to_html(), second.to_html());
    }

    #[test]
    fn error_panel_replaces_content() {
        let html = RenderedTimeline::error("HTTP 500 <oops>").to_html();
        assert!(html.starts_with(r#"<div class="timeline-state timeline-error""#));
        assert!(html.contains("HTTP 500 &lt;oops&gt;"));
    }

    #[test]
    fn graph_track_carries_extent_and_card_offsets() {
        let events = [event("a", 2000, "")];
        let plan = LayoutPlan {
            positions: vec![Position { x: 80.0, y: 30.0 }],
            extent: Some(Extent { width: 900.0, height: 520.0 }),
        };
        let html = render(&events, &plan, ViewMode::Graph).to_html();
        assert!(html.starts_with(r#"<div class="timeline-track" data-view="graph" style="width:900px;height:520px">"#));
        assert!(html.contains(r#"<article class="timeline-card" style="left:80px;top:30px">"#));
        assert!(html.contains(r#"<span class="timeline-swatch" style="background:#336699"></span>"#));
    }
}
