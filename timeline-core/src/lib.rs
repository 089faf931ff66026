//! Logic lõi của timeline: tải dữ liệu, chuẩn hóa, sắp xếp, dàn trang và dựng thẻ hiển thị.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub mod layout;
pub mod loader;
pub mod model;
pub mod normalize;
pub mod preferences;
pub mod render;
pub mod sort;
pub mod state;

pub use layout::{layout, Extent, LayoutConfig, LayoutPlan, Position, Viewport};
pub use loader::{cache_token, describe_load_error, load, Fetch, FetchResponse, LoadError};
pub use model::CanonicalEvent;
pub use normalize::{normalize, normalize_record, resolve_month, Rejection};
pub use preferences::{
    load_preferences, persist, MemoryStore, Preference, PreferenceError, PreferenceStore,
    Preferences,
};
pub use render::{render, Card, RenderedTimeline};
pub use sort::sort;
pub use state::{next_scroll_offset, AppState, Effect, LoadStatus, RequestId, ScrollDirection};

/// Cấu hình tổng của widget.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TimelineConfig {
    /// Đường dẫn tới file JSON tĩnh chứa danh sách sự kiện.
    pub source: String,
    /// Tham số dàn trang cho chế độ graph.
    pub layout: LayoutConfig,
    /// Số pixel cuộn mỗi lần bấm nút hoặc phím mũi tên.
    pub scroll_step: f64,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            source: "timeline.json".to_string(),
            layout: LayoutConfig::default(),
            scroll_step: 320.0,
        }
    }
}

impl TimelineConfig {
    /// Kiểm tra các ngưỡng không hợp lệ trước khi dùng.
    pub fn validate(&self) -> Result<(), TimelineError> {
        if self.source.trim().is_empty() {
            return Err(TimelineError::InvalidConfig(
                "source không được để trống".to_string(),
            ));
        }
        if !(self.layout.pixels_per_year > 0.0) {
            return Err(TimelineError::InvalidConfig(
                "pixels_per_year phải lớn hơn 0".to_string(),
            ));
        }
        if self.layout.lane_offsets.is_empty() {
            return Err(TimelineError::InvalidConfig(
                "lane_offsets cần ít nhất một giá trị".to_string(),
            ));
        }
        if !(self.scroll_step > 0.0) {
            return Err(TimelineError::InvalidConfig(
                "scroll_step phải lớn hơn 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Chế độ hiển thị timeline.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Graph,
    Vertical,
    Horizontal,
}

impl ViewMode {
    pub const ALL: [ViewMode; 3] = [ViewMode::Graph, ViewMode::Vertical, ViewMode::Horizontal];

    pub fn as_str(self) -> &'static str {
        match self {
            ViewMode::Graph => "graph",
            ViewMode::Vertical => "vertical",
            ViewMode::Horizontal => "horizontal",
        }
    }
}

/// Thứ tự sắp xếp theo thời gian.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum SortOrder {
    #[default]
    #[serde(rename = "asc")]
    Ascending,
    #[serde(rename = "desc")]
    Descending,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Ascending => "asc",
            SortOrder::Descending => "desc",
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }
}

/// Bộ màu giao diện.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    Sepia,
}

impl Theme {
    pub const ALL: [Theme; 3] = [Theme::Light, Theme::Dark, Theme::Sepia];

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::Sepia => "sepia",
        }
    }
}

macro_rules! option_name {
    ($ty:ty, $kind:literal, [$($name:literal => $variant:expr),+ $(,)?]) => {
        impl FromStr for $ty {
            type Err = TimelineError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value.trim().to_ascii_lowercase().as_str() {
                    $($name => Ok($variant),)+
                    other => Err(TimelineError::InvalidOption {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

option_name!(ViewMode, "view", [
    "graph" => ViewMode::Graph,
    "vertical" => ViewMode::Vertical,
    "horizontal" => ViewMode::Horizontal,
]);

option_name!(SortOrder, "sort", [
    "asc" => SortOrder::Ascending,
    "desc" => SortOrder::Descending,
]);

option_name!(Theme, "theme", [
    "light" => Theme::Light,
    "dark" => Theme::Dark,
    "sepia" => Theme::Sepia,
]);

/// Lỗi chung về cấu hình và tên tùy chọn.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum TimelineError {
    #[error("Giá trị {kind} không hợp lệ: {value:?}")]
    InvalidOption { kind: &'static str, value: String },
    #[error("Cấu hình không hợp lệ: {0}")]
    InvalidConfig(String),
}
