//! Tải file JSON tĩnh của timeline qua một lớp HTTP trừu tượng.

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, info};

/// Tên tham số query dùng để vượt cache của host tĩnh.
pub const CACHE_BUST_PARAM: &str = "_ts";

/// Lỗi khi tải dữ liệu timeline.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    #[error("HTTP {status} {status_text}")]
    Http { status: u16, status_text: String },
    #[error("Lỗi mạng: {0}")]
    Network(String),
    #[error("Dữ liệu JSON không hợp lệ: {0}")]
    Malformed(String),
}

/// Phản hồi HTTP tối giản mà loader cần.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

impl FetchResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Lớp vận chuyển HTTP: `fetch` của trình duyệt, `reqwest` cho CLI, hoặc bản giả trong test.
///
/// Lỗi ở tầng kết nối (không có phản hồi) phải trả về [`LoadError::Network`].
#[allow(async_fn_in_trait)]
pub trait Fetch {
    async fn get(&self, url: &str) -> Result<FetchResponse, LoadError>;
}

/// Token chống cache mặc định: thời điểm hiện tại tính bằng mili giây.
pub fn cache_token() -> i64 {
    Utc::now().timestamp_millis()
}

/// Tải và parse `source`.
///
/// Lần gọi đầu gắn tham số chống cache; nếu host trả 404 (một số host tĩnh
/// từ chối query trên file tĩnh) thì thử lại đúng một lần với URL gốc.
pub async fn load<F: Fetch>(fetcher: &F, source: &str, token: i64) -> Result<Value, LoadError> {
    let busted = cache_busted_url(source, token);
    let mut response = fetcher.get(&busted).await?;

    if response.status == 404 {
        debug!(url = %busted, "cache-busted request returned 404, retrying bare url");
        response = fetcher.get(source).await?;
    }

    if !response.is_success() {
        return Err(LoadError::Http {
            status: response.status,
            status_text: response.status_text,
        });
    }

    let value: Value = serde_json::from_str(&response.body)
        .map_err(|err| LoadError::Malformed(err.to_string()))?;
    info!(source, bytes = response.body.len(), "loaded timeline data");
    Ok(value)
}

fn cache_busted_url(source: &str, token: i64) -> String {
    let (base, fragment) = match source.split_once('#') {
        Some((base, fragment)) => (base, Some(fragment)),
        None => (source, None),
    };
    let separator = if base.contains('?') { '&' } else { '?' };
    let mut url = format!("{base}{separator}{CACHE_BUST_PARAM}={token}");
    if let Some(fragment) = fragment {
        url.push('#');
        url.push_str(fragment);
    }
    url
}

/// Thông báo lỗi cho người dùng.
///
/// `location_scheme` là scheme của trang đang chạy (`"file:"`, `"https"`...);
/// trang mở trực tiếp từ ổ đĩa nhận hướng dẫn chạy qua HTTP.
pub fn describe_load_error(err: &LoadError, location_scheme: Option<&str>) -> String {
    let from_file = location_scheme
        .map(|scheme| scheme.trim_end_matches(':').eq_ignore_ascii_case("file"))
        .unwrap_or(false);

    match err {
        LoadError::Network(_) if from_file => "Trang đang được mở trực tiếp từ file:// nên trình duyệt \
             chặn việc tải dữ liệu timeline. Hãy phục vụ thư mục qua HTTP (ví dụ \
             `python3 -m http.server`) rồi mở lại trang."
            .to_string(),
        LoadError::Network(message) => {
            format!("Không kết nối được tới máy chủ để tải timeline: {message}")
        }
        LoadError::Http {
            status,
            status_text,
        } if status_text.trim().is_empty() => format!("Không tải được timeline (HTTP {status})."),
        LoadError::Http {
            status,
            status_text,
        } => format!("Không tải được timeline (HTTP {status} {status_text})."),
        LoadError::Malformed(message) => {
            format!("File timeline không phải JSON hợp lệ: {message}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    #[derive(Default)]
    struct ScriptedFetch {
        replies: RefCell<VecDeque<Result<FetchResponse, LoadError>>>,
        requested: RefCell<Vec<String>>,
    }

    impl ScriptedFetch {
        fn new(replies: Vec<Result<FetchResponse, LoadError>>) -> Self {
            Self {
                replies: RefCell::new(replies.into()),
                requested: RefCell::default(),
            }
        }
    }

    impl Fetch for ScriptedFetch {
        async fn get(&self, url: &str) -> Result<FetchResponse, LoadError> {
            self.requested.borrow_mut().push(url.to_string());
            self.replies
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(LoadError::Network("no scripted reply".to_string())))
        }
    }

    fn reply(status: u16, status_text: &str, body: &str) -> Result<FetchResponse, LoadError> {
        Ok(FetchResponse {
            status,
            status_text: status_text.to_string(),
            body: body.to_string(),
        })
    }

    #[test]
    fn cache_bust_param_respects_existing_query_and_fragment() {
        assert_eq!(cache_busted_url("timeline.json", 7), "timeline.json?_ts=7");
        assert_eq!(
            cache_busted_url("data/timeline.json?v=2", 7),
            "data/timeline.json?v=2&_ts=7"
        );
        assert_eq!(cache_busted_url("t.json#top", 7), "t.json?_ts=7#top");
    }

    #[tokio::test]
    async fn success_uses_cache_busted_url() {
        let fetch = ScriptedFetch::new(vec![reply(200, "OK", r#"[{"name":"a","year":1}]"#)]);
        let value = load(&fetch, "timeline.json", 42).await.unwrap();
        assert!(value.is_array());
        assert_eq!(*fetch.requested.borrow(), ["timeline.json?_ts=42"]);
    }

    #[tokio::test]
    async fn not_found_retries_bare_url_once() {
        let fetch = ScriptedFetch::new(vec![
            reply(404, "Not Found", ""),
            reply(200, "OK", r#"[{"name":"a","year":2010}]"#),
        ]);
        let value = load(&fetch, "timeline.json", 1).await.unwrap();
        assert_eq!(value.as_array().map(Vec::len), Some(1));
        assert_eq!(
            *fetch.requested.borrow(),
            ["timeline.json?_ts=1", "timeline.json"]
        );
    }

    #[tokio::test]
    async fn failed_retry_reports_retry_status() {
        let fetch = ScriptedFetch::new(vec![
            reply(404, "Not Found", ""),
            reply(404, "Not Found", ""),
        ]);
        let err = load(&fetch, "timeline.json", 1).await.unwrap_err();
        assert_eq!(
            err,
            LoadError::Http {
                status: 404,
                status_text: "Not Found".to_string()
            }
        );
        assert_eq!(fetch.requested.borrow().len(), 2);
    }

    #[tokio::test]
    async fn other_statuses_fail_without_retry() {
        let fetch = ScriptedFetch::new(vec![reply(503, "Service Unavailable", "")]);
        let err = load(&fetch, "timeline.json", 1).await.unwrap_err();
        assert!(matches!(err, LoadError::Http { status: 503, .. }));
        assert_eq!(fetch.requested.borrow().len(), 1);
    }

    #[tokio::test]
    async fn bad_json_is_malformed() {
        let fetch = ScriptedFetch::new(vec![reply(200, "OK", "[{not json")]);
        let err = load(&fetch, "timeline.json", 1).await.unwrap_err();
        assert!(matches!(err, LoadError::Malformed(_)));
    }

    #[tokio::test]
    async fn transport_failure_is_network_error() {
        let fetch = ScriptedFetch::new(vec![Err(LoadError::Network(
            "connection refused".to_string(),
        ))]);
        let err = load(&fetch, "timeline.json", 1).await.unwrap_err();
        assert_eq!(err, LoadError::Network("connection refused".to_string()));
    }

    #[test]
    fn file_scheme_gets_serve_over_http_hint() {
        let err = LoadError::Network("TypeError: Failed to fetch".to_string());
        let message = describe_load_error(&err, Some("file:"));
        assert!(message.contains("http.server"));

        let message = describe_load_error(&err, Some("https:"));
        assert!(message.contains("Failed to fetch"));
    }

    #[test]
    fn http_error_message_mentions_status() {
        let err = LoadError::Http {
            status: 500,
            status_text: "Internal Server Error".to_string(),
        };
        assert_eq!(
            describe_load_error(&err, None),
            "Không tải được timeline (HTTP 500 Internal Server Error)."
        );
        let bare = LoadError::Http {
            status: 500,
            status_text: String::new(),
        };
        assert_eq!(
            describe_load_error(&bare, None),
            "Không tải được timeline (HTTP 500)."
        );
    }
}
