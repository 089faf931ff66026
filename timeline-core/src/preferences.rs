//! Lưu và khôi phục lựa chọn hiển thị của người dùng giữa các phiên.

use std::collections::HashMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{SortOrder, Theme, TimelineError, ViewMode};

pub const THEME_KEY: &str = "timeline-theme";
pub const VIEW_KEY: &str = "timeline-view";
pub const SORT_KEY: &str = "timeline-sort";

/// Kho khóa-giá trị bị lỗi; luôn được xử lý như không có dữ liệu.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PreferenceError {
    #[error("Kho tùy chọn không khả dụng: {0}")]
    Unavailable(String),
}

/// Kho khóa-giá trị dạng chuỗi (ví dụ `localStorage` của trình duyệt).
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError>;
}

/// Kho trong bộ nhớ, dùng cho CLI và test.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn with_values<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: values
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Các lựa chọn được ghi nhớ.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Preferences {
    pub theme: Theme,
    pub view: ViewMode,
    pub sort: SortOrder,
}

impl Preferences {
    pub fn apply(&mut self, preference: Preference) {
        match preference {
            Preference::Theme(theme) => self.theme = theme,
            Preference::View(view) => self.view = view,
            Preference::Sort(sort) => self.sort = sort,
        }
    }
}

/// Một thay đổi cần ghi xuống kho.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preference {
    Theme(Theme),
    View(ViewMode),
    Sort(SortOrder),
}

impl Preference {
    pub fn key(self) -> &'static str {
        match self {
            Preference::Theme(_) => THEME_KEY,
            Preference::View(_) => VIEW_KEY,
            Preference::Sort(_) => SORT_KEY,
        }
    }

    pub fn value(self) -> &'static str {
        match self {
            Preference::Theme(theme) => theme.as_str(),
            Preference::View(view) => view.as_str(),
            Preference::Sort(sort) => sort.as_str(),
        }
    }
}

/// Đọc lựa chọn đã lưu; khóa thiếu, hỏng hoặc kho lỗi đều dùng mặc định.
pub fn load_preferences<S: PreferenceStore + ?Sized>(store: &S) -> Preferences {
    let defaults = Preferences::default();
    Preferences {
        theme: read_option(store, THEME_KEY).unwrap_or(defaults.theme),
        view: read_option(store, VIEW_KEY).unwrap_or(defaults.view),
        sort: read_option(store, SORT_KEY).unwrap_or(defaults.sort),
    }
}

/// Ghi một lựa chọn; lỗi chỉ được ghi log, không bao giờ chặn hiển thị.
pub fn persist<S: PreferenceStore + ?Sized>(store: &mut S, preference: Preference) {
    if let Err(err) = store.set(preference.key(), preference.value()) {
        warn!(key = preference.key(), error = %err, "could not save preference");
    }
}

fn read_option<S, T>(store: &S, key: &str) -> Option<T>
where
    S: PreferenceStore + ?Sized,
    T: FromStr<Err = TimelineError>,
{
    let raw = match store.get(key) {
        Ok(raw) => raw?,
        Err(err) => {
            warn!(key, error = %err, "preference store unavailable, using default");
            return None;
        }
    };
    match raw.parse() {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(key, error = %err, "ignoring corrupt preference");
            None
        }
    }
}
