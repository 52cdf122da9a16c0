use serde::Serialize;

/// One page of a listing, serialized in the paginator shape the admin
/// frontend expects.
#[derive(Debug, Serialize, Clone)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub current_page: u32,
    pub per_page: u32,
    pub total: u64,
    pub last_page: u32,
    pub from: Option<u64>,
    pub to: Option<u64>,
}

/// Clamps a requested page number to 1 or above.
pub fn normalize_page(page: Option<u32>) -> u32 {
    page.unwrap_or(1).max(1)
}

pub fn offset_for(page: u32, per_page: u32) -> u64 {
    (page.max(1) as u64 - 1) * per_page as u64
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, current_page: u32, per_page: u32, total: u64) -> Self {
        let last_page = if total == 0 || per_page == 0 {
            1
        } else {
            total.div_ceil(per_page as u64) as u32
        };
        let (from, to) = if data.is_empty() {
            (None, None)
        } else {
            let first = offset_for(current_page, per_page) + 1;
            (Some(first), Some(first + data.len() as u64 - 1))
        };

        Self { data, current_page, per_page, total, last_page, from, to }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_bounds_for_middle_page() {
        let page = Page::new(vec![6, 7, 8, 9, 10], 2, 5, 12);
        assert_eq!(page.last_page, 3);
        assert_eq!(page.from, Some(6));
        assert_eq!(page.to, Some(10));
    }

    #[test]
    fn test_page_past_the_end_is_empty() {
        let page: Page<i32> = Page::new(vec![], 9, 5, 12);
        assert_eq!(page.last_page, 3);
        assert_eq!(page.from, None);
        assert_eq!(page.to, None);
    }

    #[test]
    fn test_empty_listing_still_has_one_page() {
        let page: Page<i32> = Page::new(vec![], 1, 5, 0);
        assert_eq!(page.last_page, 1);
        assert_eq!(page.total, 0);
    }

    #[test]
    fn test_normalize_page_and_offset() {
        assert_eq!(normalize_page(None), 1);
        assert_eq!(normalize_page(Some(0)), 1);
        assert_eq!(normalize_page(Some(4)), 4);
        assert_eq!(offset_for(0, 5), 0);
        assert_eq!(offset_for(1, 5), 0);
        assert_eq!(offset_for(3, 5), 10);
    }
}
