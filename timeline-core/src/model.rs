use serde::{Deserialize, Serialize};

/// Một sự kiện đã được kiểm tra và chuẩn hóa.
///
/// Chỉ được tạo qua [`crate::normalize_record`], nên `name` luôn khác rỗng
/// và `month_number` luôn nằm trong khoảng 1..=12.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CanonicalEvent {
    pub name: String,
    pub description: String,
    pub year: i32,
    pub month_number: u8,
    /// Nhãn tháng để hiển thị; rỗng khi không xác định được tháng.
    pub month_label: String,
    pub color: Option<String>,
    /// Vị trí trong dữ liệu gốc, dùng để giữ thứ tự khi trùng năm/tháng.
    pub original_index: usize,
}

impl CanonicalEvent {
    /// Nhãn ngày dạng `"{tháng} {năm}"`, hoặc chỉ năm khi thiếu tháng.
    pub fn date_label(&self) -> String {
        if self.month_label.is_empty() {
            self.year.to_string()
        } else {
            format!("{} {}", self.month_label, self.year)
        }
    }

    /// Khóa thời gian (năm, tháng) dùng cho sắp xếp và dàn trang.
    pub fn chrono_key(&self) -> (i32, u8) {
        (self.year, self.month_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(month_label: &str) -> CanonicalEvent {
        CanonicalEvent {
            name: "Launch".to_string(),
            description: String::new(),
            year: 2012,
            month_number: 3,
            month_label: month_label.to_string(),
            color: None,
            original_index: 0,
        }
    }

    #[test]
    fn date_label_includes_month_when_known() {
        assert_eq!(event("March").date_label(), "March 2012");
    }

    #[test]
    fn date_label_falls_back_to_year() {
        assert_eq!(event("").date_label(), "2012");
    }
}
