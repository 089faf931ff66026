//! Chuyển bản ghi JSON thô (không tin cậy) thành [`CanonicalEvent`].

use chrono::Month;
use serde_json::Value;
use tracing::{debug, warn};

use crate::model::CanonicalEvent;

/// Lý do một bản ghi bị loại khỏi timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("bản ghi không phải object JSON")]
    NotAnObject,
    #[error("thiếu trường name")]
    MissingName,
    #[error("year thiếu hoặc không phải số hữu hạn")]
    InvalidYear,
}

/// Chuẩn hóa toàn bộ danh sách; các bản ghi lỗi bị bỏ qua.
///
/// Đầu vào không phải mảng JSON cho ra danh sách rỗng.
pub fn normalize(raw: &Value) -> Vec<CanonicalEvent> {
    let Some(records) = raw.as_array() else {
        warn!(
            kind = json_kind(raw),
            "timeline data is not a JSON array, showing no events"
        );
        return Vec::new();
    };

    let events: Vec<CanonicalEvent> = records
        .iter()
        .enumerate()
        .filter_map(|(index, record)| match normalize_record(record, index) {
            Ok(event) => Some(event),
            Err(reason) => {
                debug!(index, %reason, "skipping timeline record");
                None
            }
        })
        .collect();

    debug!(
        accepted = events.len(),
        skipped = records.len() - events.len(),
        "normalized timeline records"
    );
    events
}

/// Kiểm tra và chuẩn hóa một bản ghi tại vị trí `index`.
pub fn normalize_record(raw: &Value, index: usize) -> Result<CanonicalEvent, Rejection> {
    if !raw.is_object() {
        return Err(Rejection::NotAnObject);
    }

    let name = raw
        .get("name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or(Rejection::MissingName)?;

    let year = raw
        .get("year")
        .and_then(coerce_year)
        .ok_or(Rejection::InvalidYear)?;

    let month = raw.get("month");
    let resolved = month.and_then(resolve_month);
    let month_label = match (month, resolved) {
        (Some(Value::String(text)), Some(_)) => text.trim().to_string(),
        (Some(_), Some(number)) => month_name(number).to_string(),
        _ => String::new(),
    };

    let description = raw
        .get("description")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    Ok(CanonicalEvent {
        name: name.to_string(),
        description,
        year,
        month_number: resolved.unwrap_or(1),
        month_label,
        color: raw.get("color").and_then(|value| sanitize_color(value, index)),
        original_index: index,
    })
}

/// Giải tháng từ số (1-12, bỏ phần thập phân) hoặc tên tháng tiếng Anh.
///
/// Trả về `None` khi không xác định được; người gọi tự chọn giá trị mặc định.
pub fn resolve_month(value: &Value) -> Option<u8> {
    match value {
        Value::Number(number) => number.as_f64().and_then(month_from_number),
        Value::String(text) => {
            let text = text.trim().to_lowercase();
            if let Ok(number) = text.parse::<f64>() {
                return month_from_number(number);
            }
            if text == "sept" {
                return Some(9);
            }
            text.parse::<Month>()
                .ok()
                .map(|month| month.number_from_month() as u8)
        }
        _ => None,
    }
}

fn month_from_number(number: f64) -> Option<u8> {
    if !number.is_finite() {
        return None;
    }
    let month = number.trunc();
    (1.0..=12.0).contains(&month).then_some(month as u8)
}

fn month_name(number: u8) -> &'static str {
    Month::try_from(number)
        .map(|month| month.name())
        .unwrap_or_default()
}

fn coerce_year(value: &Value) -> Option<i32> {
    let year = match value {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => text.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !year.is_finite() {
        return None;
    }
    let year = year.trunc();
    if year < f64::from(i32::MIN) || year > f64::from(i32::MAX) {
        return None;
    }
    Some(year as i32)
}

// Màu được chèn vào thuộc tính style, nên chỉ nhận ký tự của tên màu, hex, rgb()/hsl().
fn sanitize_color(value: &Value, index: usize) -> Option<String> {
    let color = value.as_str()?.trim();
    if color.is_empty() {
        return None;
    }
    let allowed = color.chars().all(|ch| {
        ch.is_ascii_alphanumeric() || matches!(ch, '#' | '(' | ')' | ',' | '.' | '%' | ' ' | '-')
    });
    if !allowed {
        debug!(index, color, "dropping unsupported color value");
        return None;
    }
    Some(color.to_string())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
