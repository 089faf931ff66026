//! Tính tọa độ thẻ cho chế độ graph và kích thước vùng chứa.

use serde::{Deserialize, Serialize};

use crate::model::CanonicalEvent;
use crate::ViewMode;

/// Tham số dàn trang dạng scatter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LayoutConfig {
    pub pixels_per_year: f64,
    /// Khoảng lề trái trước năm sớm nhất.
    pub base_offset: f64,
    /// Các độ lệch dọc dùng xoay vòng theo thứ tự thẻ.
    pub lane_offsets: Vec<f64>,
    /// Phần cộng thêm vào chiều rộng để thẻ cuối không bị cắt.
    pub margin: f64,
    pub min_height: f64,
    /// Chiều cao dành cho thanh công cụ và tiêu đề bên ngoài vùng chứa.
    pub chrome_allowance: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            pixels_per_year: 220.0,
            base_offset: 60.0,
            lane_offsets: vec![30.0, 190.0, 350.0, 110.0, 270.0],
            margin: 320.0,
            min_height: 520.0,
            chrome_allowance: 180.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Extent {
    pub width: f64,
    pub height: f64,
}

/// Kết quả dàn trang: một vị trí cho mỗi sự kiện (chỉ ở chế độ graph).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LayoutPlan {
    pub positions: Vec<Position>,
    pub extent: Option<Extent>,
}

/// Tính vị trí cho dãy sự kiện đã sắp xếp.
///
/// Chế độ vertical/horizontal để thẻ chảy theo bố cục tự nhiên nên không có tọa độ.
pub fn layout(
    events: &[CanonicalEvent],
    view: ViewMode,
    viewport: Viewport,
    config: &LayoutConfig,
) -> LayoutPlan {
    if view != ViewMode::Graph {
        return LayoutPlan::default();
    }

    let Some((min_year, max_year)) = year_bounds(events) else {
        return LayoutPlan::default();
    };

    let positions = events
        .iter()
        .enumerate()
        .map(|(slot, event)| Position {
            x: x_offset(event, min_year, config),
            y: lane_offset(slot, config),
        })
        .collect();

    let year_span = f64::from(max_year) - f64::from(min_year) + 1.0;
    let extent = Extent {
        width: viewport
            .width
            .max(year_span * config.pixels_per_year + config.margin),
        height: config
            .min_height
            .max(viewport.height - config.chrome_allowance),
    };

    LayoutPlan {
        positions,
        extent: Some(extent),
    }
}

fn year_bounds(events: &[CanonicalEvent]) -> Option<(i32, i32)> {
    let min = events.iter().map(|e| e.year).min()?;
    let max = events.iter().map(|e| e.year).max()?;
    Some((min, max))
}

fn x_offset(event: &CanonicalEvent, base_year: i32, config: &LayoutConfig) -> f64 {
    let years = f64::from(event.year) - f64::from(base_year) + f64::from(event.month_number) / 12.0;
    years * config.pixels_per_year + config.base_offset
}

fn lane_offset(slot: usize, config: &LayoutConfig) -> f64 {
    match config.lane_offsets.len() {
        0 => 0.0,
        lanes => config.lane_offsets[slot % lanes],
    }
}
