#![cfg(target_arch = "wasm32")]
//! Adapter trình duyệt cho các trait của `timeline-core`.

use timeline_core::{
    Fetch, FetchResponse, LoadError, PreferenceError, PreferenceStore, Theme, Viewport,
};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Response, Storage};

/// Gọi `window.fetch`.
pub struct BrowserFetch;

impl Fetch for BrowserFetch {
    async fn get(&self, url: &str) -> Result<FetchResponse, LoadError> {
        let window =
            web_sys::window().ok_or_else(|| LoadError::Network("Không có window".to_string()))?;

        let response: Response = JsFuture::from(window.fetch_with_str(url))
            .await
            .map_err(network_error)?
            .dyn_into()
            .map_err(|_| LoadError::Network("fetch không trả về Response".to_string()))?;

        let body = JsFuture::from(response.text().map_err(network_error)?)
            .await
            .map_err(network_error)?;

        Ok(FetchResponse {
            status: response.status(),
            status_text: response.status_text(),
            body: body.as_string().unwrap_or_default(),
        })
    }
}

fn network_error(err: JsValue) -> LoadError {
    LoadError::Network(err.as_string().unwrap_or_else(|| format!("{err:?}")))
}

/// `window.localStorage`; trình duyệt chặn storage thì mọi thao tác trả lỗi.
pub struct LocalStorageStore {
    storage: Result<Storage, String>,
}

impl LocalStorageStore {
    pub fn open() -> Self {
        let storage = web_sys::window()
            .ok_or_else(|| "Không có window".to_string())
            .and_then(|window| window.local_storage().map_err(|err| format!("{err:?}")))
            .and_then(|storage| storage.ok_or_else(|| "localStorage bị tắt".to_string()));
        Self { storage }
    }

    fn storage(&self) -> Result<&Storage, PreferenceError> {
        self.storage
            .as_ref()
            .map_err(|reason| PreferenceError::Unavailable(reason.clone()))
    }
}

impl PreferenceStore for LocalStorageStore {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        self.storage()?
            .get_item(key)
            .map_err(|err| PreferenceError::Unavailable(format!("{err:?}")))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError> {
        self.storage()?
            .set_item(key, value)
            .map_err(|err| PreferenceError::Unavailable(format!("{err:?}")))
    }
}

pub fn current_viewport() -> Viewport {
    let Some(window) = web_sys::window() else {
        return Viewport::default();
    };
    let read = |value: Result<JsValue, JsValue>| value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    Viewport::new(read(window.inner_width()), read(window.inner_height()))
}

/// Scheme của trang hiện tại, ví dụ `"https:"` hoặc `"file:"`.
pub fn location_scheme() -> Option<String> {
    web_sys::window()?.location().protocol().ok()
}

/// Gắn theme lên `<html>` để phần còn lại của trang có thể theo cùng bộ màu.
pub fn apply_document_theme(theme: Theme) -> Result<(), JsValue> {
    let root = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.document_element())
        .ok_or_else(|| JsValue::from_str("Không truy cập được document"))?;
    root.set_attribute("data-theme", theme.as_str())
}
