//! Compact page-number sequences for pagination controls

use serde::{Serialize, Serializer};
use std::fmt;

/// Pages shown without any ellipsis
const MAX_VISIBLE: usize = 7;

/// One slot in a pagination control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMarker {
    Page(usize),
    Ellipsis,
}

impl fmt::Display for PageMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageMarker::Page(n) => write!(f, "{n}"),
            PageMarker::Ellipsis => f.write_str("..."),
        }
    }
}

// Serialized as a bare number or the string "..."
impl Serialize for PageMarker {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PageMarker::Page(n) => serializer.serialize_u64(*n as u64),
            PageMarker::Ellipsis => serializer.serialize_str("..."),
        }
    }
}

/// Summarize `1..=total_pages` around `current_page`
pub fn page_numbers(current_page: usize, total_pages: usize) -> Vec<PageMarker> {
    use PageMarker::{Ellipsis, Page};

    if total_pages <= MAX_VISIBLE {
        return (1..=total_pages).map(Page).collect();
    }

    if current_page <= 4 {
        return vec![Page(1), Page(2), Page(3), Page(4), Page(5), Ellipsis, Page(total_pages)];
    }

    if current_page >= total_pages - 3 {
        return vec![
            Page(1),
            Ellipsis,
            Page(total_pages - 4),
            Page(total_pages - 3),
            Page(total_pages - 2),
            Page(total_pages - 1),
            Page(total_pages),
        ];
    }

    vec![
        Page(1),
        Ellipsis,
        Page(current_page - 1),
        Page(current_page),
        Page(current_page + 1),
        Ellipsis,
        Page(total_pages),
    ]
}

#[cfg(test)]
mod tests {
    use super::PageMarker::{Ellipsis, Page};
    use super::*;

    fn render(markers: &[PageMarker]) -> String {
        markers
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }

    #[test]
    fn test_small_totals_list_every_page() {
        for total in 1..=7 {
            for current in 1..=total {
                let markers = page_numbers(current, total);
                assert_eq!(markers.len(), total);
                assert!(!markers.contains(&Ellipsis));
                assert_eq!(markers, (1..=total).map(Page).collect::<Vec<_>>());
            }
        }
    }

    #[test]
    fn test_zero_pages_is_empty() {
        assert!(page_numbers(1, 0).is_empty());
    }

    #[test]
    fn test_near_start() {
        assert_eq!(render(&page_numbers(1, 10)), "1,2,3,4,5,...,10");
        assert_eq!(render(&page_numbers(4, 10)), "1,2,3,4,5,...,10");
        assert_eq!(render(&page_numbers(1, 8)), "1,2,3,4,5,...,8");
    }

    #[test]
    fn test_near_end() {
        assert_eq!(render(&page_numbers(7, 10)), "1,...,6,7,8,9,10");
        assert_eq!(render(&page_numbers(10, 10)), "1,...,6,7,8,9,10");
        assert_eq!(render(&page_numbers(5, 8)), "1,...,4,5,6,7,8");
        assert_eq!(render(&page_numbers(6, 8)), "1,...,4,5,6,7,8");
    }

    #[test]
    fn test_middle_range() {
        assert_eq!(render(&page_numbers(6, 15)), "1,...,5,6,7,...,15");
        assert_eq!(render(&page_numbers(8, 20)), "1,...,7,8,9,...,20");
    }

    #[test]
    fn test_serializes_as_numbers_and_ellipsis() {
        let json = serde_json::to_value(page_numbers(1, 10)).unwrap();
        assert_eq!(json, serde_json::json!([1, 2, 3, 4, 5, "...", 10]));
    }
}
