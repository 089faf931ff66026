//! Trạng thái ứng dụng và các lệnh xử lý thao tác người dùng.
//!
//! Mỗi lệnh nhận trạng thái hiện tại, trả về trạng thái mới cùng danh sách
//! [`Effect`] để lớp giao diện thực hiện (tải dữ liệu, lưu tùy chọn, vẽ lại).

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, warn};

use crate::layout::{layout, LayoutConfig, Viewport};
use crate::loader::{describe_load_error, LoadError};
use crate::model::CanonicalEvent;
use crate::normalize::normalize;
use crate::preferences::{Preference, Preferences};
use crate::render::{render, RenderedTimeline};
use crate::sort::sort;
use crate::{SortOrder, Theme, ViewMode};

/// Định danh tăng dần của mỗi lần tải lại.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Idle,
    Loading(RequestId),
    Ready,
    /// Thông báo lỗi đã sẵn sàng cho người dùng.
    Failed(String),
}

/// Việc lớp giao diện cần làm sau một lệnh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Fetch(RequestId),
    Persist(Preference),
    ApplyTheme(Theme),
    Render,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub preferences: Preferences,
    /// Sự kiện đã chuẩn hóa theo thứ tự gốc; thứ tự hiển thị tính lại mỗi lần vẽ.
    pub events: Vec<CanonicalEvent>,
    pub status: LoadStatus,
    pub loaded_at: Option<DateTime<Utc>>,
    last_request: u64,
}

impl AppState {
    pub fn new(preferences: Preferences) -> Self {
        Self {
            preferences,
            events: Vec::new(),
            status: LoadStatus::Idle,
            loaded_at: None,
            last_request: 0,
        }
    }

    /// Bắt đầu một lần tải mới; mọi phản hồi của lần tải trước sẽ bị bỏ qua.
    pub fn on_reload(mut self) -> (Self, Vec<Effect>) {
        self.last_request += 1;
        let request = RequestId(self.last_request);
        self.status = LoadStatus::Loading(request);
        (self, vec![Effect::Render, Effect::Fetch(request)])
    }

    /// Nhận kết quả tải. `location_scheme` chỉ dùng để chọn thông báo lỗi.
    pub fn on_load_finished(
        mut self,
        request: RequestId,
        result: Result<Value, LoadError>,
        location_scheme: Option<&str>,
    ) -> (Self, Vec<Effect>) {
        if self.status != LoadStatus::Loading(request) {
            debug!(?request, "discarding stale timeline response");
            return (self, Vec::new());
        }

        match result {
            Ok(raw) => {
                self.events = normalize(&raw);
                self.status = LoadStatus::Ready;
                self.loaded_at = Some(Utc::now());
            }
            Err(err) => {
                warn!(error = %err, "timeline load failed");
                self.events.clear();
                self.status = LoadStatus::Failed(describe_load_error(&err, location_scheme));
            }
        }
        (self, vec![Effect::Render])
    }

    pub fn on_view_change(mut self, view: ViewMode) -> (Self, Vec<Effect>) {
        if self.preferences.view == view {
            return (self, Vec::new());
        }
        let preference = Preference::View(view);
        self.preferences.apply(preference);
        (self, vec![Effect::Persist(preference), Effect::Render])
    }

    pub fn on_theme_change(mut self, theme: Theme) -> (Self, Vec<Effect>) {
        if self.preferences.theme == theme {
            return (self, Vec::new());
        }
        let preference = Preference::Theme(theme);
        self.preferences.apply(preference);
        (
            self,
            vec![
                Effect::Persist(preference),
                Effect::ApplyTheme(theme),
                Effect::Render,
            ],
        )
    }

    pub fn on_sort_change(mut self, order: SortOrder) -> (Self, Vec<Effect>) {
        if self.preferences.sort == order {
            return (self, Vec::new());
        }
        let preference = Preference::Sort(order);
        self.preferences.apply(preference);
        (self, vec![Effect::Persist(preference), Effect::Render])
    }

    /// Dựng toàn bộ nội dung cần hiển thị cho trạng thái hiện tại.
    pub fn frame(&self, viewport: Viewport, config: &LayoutConfig) -> RenderedTimeline {
        match &self.status {
            LoadStatus::Idle | LoadStatus::Loading(_) => RenderedTimeline::Loading,
            LoadStatus::Failed(message) => RenderedTimeline::error(message.clone()),
            LoadStatus::Ready => {
                let Preferences { view, sort: order, .. } = self.preferences;
                let ordered = sort(&self.events, order);
                let plan = layout(&ordered, view, viewport, config);
                render(&ordered, &plan, view)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Backward,
    Forward,
}

impl ScrollDirection {
    /// Ánh xạ phím điều hướng trái/phải.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" => Some(ScrollDirection::Backward),
            "ArrowRight" => Some(ScrollDirection::Forward),
            _ => None,
        }
    }
}

impl ViewMode {
    /// Chế độ vertical cuộn theo trục dọc, các chế độ còn lại cuộn ngang.
    pub fn scrolls_horizontally(self) -> bool {
        !matches!(self, ViewMode::Vertical)
    }
}

/// Vị trí cuộn kế tiếp, giới hạn trong `[0, max]`.
pub fn next_scroll_offset(current: f64, direction: ScrollDirection, step: f64, max: f64) -> f64 {
    let target = match direction {
        ScrollDirection::Backward => current - step,
        ScrollDirection::Forward => current + step,
    };
    target.clamp(0.0, max.max(0.0))
}
