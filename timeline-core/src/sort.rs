use std::cmp::Ordering;

use crate::model::CanonicalEvent;
use crate::SortOrder;

/// Trả về bản sao đã sắp xếp theo (năm, tháng); không sửa đầu vào.
///
/// Khi trùng năm và tháng, sự kiện xuất hiện trước trong dữ liệu gốc luôn
/// đứng trước, bất kể chiều sắp xếp.
pub fn sort(events: &[CanonicalEvent], order: SortOrder) -> Vec<CanonicalEvent> {
    let mut sorted = events.to_vec();
    sorted.sort_by(|a, b| compare(a, b, order));
    sorted
}

fn compare(a: &CanonicalEvent, b: &CanonicalEvent, order: SortOrder) -> Ordering {
    let by_date = a.chrono_key().cmp(&b.chrono_key());
    let by_date = match order {
        SortOrder::Ascending => by_date,
        SortOrder::Descending => by_date.reverse(),
    };
    by_date.then_with(|| a.original_index.cmp(&b.original_index))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(name: &str, year: i32, month: u8, index: usize) -> CanonicalEvent {
        CanonicalEvent {
            name: name.to_string(),
            description: String::new(),
            year,
            month_number: month,
            month_label: String::new(),
            color: None,
            original_index: index,
        }
    }

    fn names(events: &[CanonicalEvent]) -> Vec<&str> {
        events.iter().map(|e| e.name.as_str()).collect()
    }

    fn sample() -> Vec<CanonicalEvent> {
        vec![
            event("c", 2012, 3, 0),
            event("a", 2010, 1, 1),
            event("tie-1", 2011, 6, 2),
            event("b", 2010, 11, 3),
            event("tie-2", 2011, 6, 4),
        ]
    }

    #[test]
    fn ascending_orders_by_year_then_month() {
        let sorted = sort(&sample(), SortOrder::Ascending);
        assert_eq!(names(&sorted), ["a", "b", "tie-1", "tie-2", "c"]);
    }

    #[test]
    fn descending_keeps_ties_in_input_order() {
        let sorted = sort(&sample(), SortOrder::Descending);
        assert_eq!(names(&sorted), ["c", "tie-1", "tie-2", "b", "a"]);
    }

    #[test]
    fn input_is_left_untouched() {
        let input = sample();
        let before = input.clone();
        let _ = sort(&input, SortOrder::Descending);
        assert_eq!(input, before);
    }

    #[test]
    fn sorting_twice_is_idempotent() {
        let once = sort(&sample(), SortOrder::Ascending);
        let twice = sort(&once, SortOrder::Ascending);
        assert_eq!(once, twice);
    }

    #[test]
    fn output_is_a_permutation() {
        let input = sample();
        let mut sorted_indices: Vec<_> = sort(&input, SortOrder::Descending)
            .iter()
            .map(|e| e.original_index)
            .collect();
        sorted_indices.sort_unstable();
        assert_eq!(sorted_indices, [0, 1, 2, 3, 4]);
    }

    #[test]
    fn reversing_order_reverses_distinct_dates() {
        let distinct: Vec<_> = sample()
            .into_iter()
            .filter(|e| !e.name.starts_with("tie"))
            .collect();
        let mut ascending = sort(&distinct, SortOrder::Ascending);
        ascending.reverse();
        assert_eq!(ascending, sort(&distinct, SortOrder::Descending));
    }
}
