//! Page arithmetic and the `{data, metadata}` envelope used by list endpoints.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const MAX_PAGE_SIZE: usize = 50;

/// Normalized page request: `page >= 1` and `limit` within `1..=MAX_PAGE_SIZE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: usize,
    limit: usize,
}

impl PageRequest {
    /// Applies the defaults and clamps out-of-range values.
    pub fn new(page: Option<usize>, limit: Option<usize>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub const fn page(&self) -> usize {
        self.page
    }

    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// Saturates instead of overflowing for huge page numbers.
    pub const fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    pub total: usize,
    pub page: usize,
    pub limit: usize,
    pub has_more: bool,
}

impl PageMetadata {
    pub fn new(total: usize, request: PageRequest) -> Self {
        Self {
            total,
            page: request.page(),
            limit: request.limit(),
            has_more: total > request.page().saturating_mul(request.limit()),
        }
    }

    /// Number of pages needed to show `total` items.
    pub fn total_pages(&self) -> usize {
        self.total.div_ceil(self.limit.max(1))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub metadata: PageMetadata,
}

impl<T> Paginated<T> {
    /// Wraps one page of items; extra items beyond the limit are dropped.
    pub fn new(mut data: Vec<T>, total: usize, request: PageRequest) -> Self {
        data.truncate(request.limit());
        Self {
            data,
            metadata: PageMetadata::new(total, request),
        }
    }

    pub fn empty(request: PageRequest) -> Self {
        Self::new(Vec::new(), 0, request)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            data: self.data.into_iter().map(f).collect(),
            metadata: self.metadata,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_request_defaults_and_clamps() {
        let default = PageRequest::default();
        assert_eq!((default.page(), default.limit()), (1, DEFAULT_PAGE_SIZE));

        let clamped = PageRequest::new(Some(0), Some(500));
        assert_eq!((clamped.page(), clamped.limit()), (1, MAX_PAGE_SIZE));

        let min = PageRequest::new(Some(2), Some(0));
        assert_eq!((min.page(), min.limit()), (2, 1));
        assert_eq!(PageRequest::new(Some(3), Some(10)).offset(), 20);
    }

    #[test]
    fn huge_page_saturates() {
        let request = PageRequest::new(Some(usize::MAX), Some(10));
        assert_eq!(request.offset(), usize::MAX);

        let metadata = PageMetadata::new(1, request);
        assert_eq!(metadata.page, usize::MAX);
        assert!(!metadata.has_more);
    }

    #[test]
    fn has_more_tracks_remaining_items() {
        let total = 25;
        let first = PageMetadata::new(total, PageRequest::new(Some(1), Some(10)));
        assert!(first.has_more);
        let second = PageMetadata::new(total, PageRequest::new(Some(2), Some(10)));
        assert!(second.has_more);
        let last = PageMetadata::new(total, PageRequest::new(Some(3), Some(10)));
        assert!(!last.has_more);
        assert_eq!(last.total_pages(), 3);

        let exact = PageMetadata::new(20, PageRequest::new(Some(2), Some(10)));
        assert!(!exact.has_more);
    }

    #[test]
    fn envelope_never_exceeds_limit() {
        let request = PageRequest::new(Some(1), Some(3));
        let page = Paginated::new((0..7).collect::<Vec<_>>(), 7, request);
        assert_eq!(page.data, vec![0, 1, 2]);
        assert!(page.metadata.has_more);
    }

    #[test]
    fn envelope_serializes_camel_case() {
        let page = Paginated::new(vec![1], 1, PageRequest::default());
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "data": [1],
                "metadata": {"total": 1, "page": 1, "limit": 10, "hasMore": false}
            })
        );
    }
}
