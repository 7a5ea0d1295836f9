//! Page-number pagination shared by every listing.

use serde::Serialize;

use crate::error::{DomainError, DomainResult};

/// Number of posts shown on one listing page.
pub const POSTS_PER_PAGE: u64 = 10;

/// Largest row offset a page may start at. Postgres `OFFSET` is a signed
/// 64-bit value.
const MAX_OFFSET: u64 = i64::MAX as u64;

/// A 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub per_page: u64,
}

impl PageRequest {
    /// Request `page` of a post listing. Page numbers start at 1.
    pub fn new(page: u64) -> DomainResult<Self> {
        Self::with_size(page, POSTS_PER_PAGE)
    }

    pub fn with_size(page: u64, per_page: u64) -> DomainResult<Self> {
        if page == 0 {
            return Err(DomainError::invalid("Page numbers start at 1"));
        }
        if per_page == 0 {
            return Err(DomainError::invalid("Page size must be positive"));
        }
        // No listing can reach a page whose offset does not fit in a row index.
        let reachable = (page - 1)
            .checked_mul(per_page)
            .is_some_and(|offset| offset <= MAX_OFFSET && usize::try_from(offset).is_ok());
        if !reachable {
            return Err(DomainError::not_found("page", page));
        }
        Ok(Self { page, per_page })
    }

    pub fn first() -> Self {
        Self {
            page: 1,
            per_page: POSTS_PER_PAGE,
        }
    }

    /// Zero-based page index, as used by database paginators.
    pub fn index(&self) -> u64 {
        self.page - 1
    }

    pub fn offset(&self) -> u64 {
        self.index().saturating_mul(self.per_page)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first()
    }
}

/// One page of a listing.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub per_page: u64,
    pub total_items: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total_items: u64) -> Self {
        Self {
            items,
            page: request.page,
            per_page: request.per_page,
            total_items,
        }
    }

    /// Slice an already filtered and ordered collection.
    pub fn from_vec(all: Vec<T>, request: PageRequest) -> Self {
        let total_items = all.len() as u64;
        let items = all
            .into_iter()
            .skip(usize::try_from(request.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(request.per_page).unwrap_or(usize::MAX))
            .collect();
        Self::new(items, request, total_items)
    }

    /// Total number of pages. An empty listing still has one (empty) page.
    pub fn total_pages(&self) -> u64 {
        self.total_items.div_ceil(self.per_page).max(1)
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    /// Reject pages past the end of the listing.
    pub fn ensure_in_range(self) -> DomainResult<Self> {
        if self.page > self.total_pages() {
            return Err(DomainError::not_found("page", self.page));
        }
        Ok(self)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            per_page: self.per_page,
            total_items: self.total_items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_zero_is_rejected() {
        assert!(matches!(
            PageRequest::new(0),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn test_page_beyond_any_offset_is_not_found() {
        assert!(matches!(
            PageRequest::new(u64::MAX),
            Err(DomainError::NotFound { entity_type: "page", .. })
        ));
        assert!(matches!(
            PageRequest::with_size(2, u64::MAX),
            Err(DomainError::NotFound { entity_type: "page", .. })
        ));

        let last = MAX_OFFSET / POSTS_PER_PAGE + 1;
        let request = PageRequest::new(last).unwrap();
        assert!(request.offset() <= MAX_OFFSET);
    }

    #[test]
    fn test_offset_saturates_for_hand_built_requests() {
        let request = PageRequest {
            page: u64::MAX,
            per_page: 10,
        };
        assert_eq!(request.offset(), u64::MAX);
        assert!(Page::from_vec(vec![1, 2, 3], request).items.is_empty());
    }

    #[test]
    fn test_from_vec_slices_requested_page() {
        let all: Vec<u32> = (1..=25).collect();

        let page = Page::from_vec(all.clone(), PageRequest::new(3).unwrap());
        assert_eq!(page.items, vec![21, 22, 23, 24, 25]);
        assert_eq!(page.total_pages(), 3);
        assert!(!page.has_next());
        assert!(page.has_previous());

        let page = Page::from_vec(all, PageRequest::new(1).unwrap());
        assert_eq!(page.items.len(), 10);
        assert!(page.has_next());
        assert!(!page.has_previous());
    }

    #[test]
    fn test_empty_listing_has_one_page() {
        let page = Page::<u32>::from_vec(Vec::new(), PageRequest::first());
        assert_eq!(page.total_pages(), 1);
        assert!(page.ensure_in_range().is_ok());
    }

    #[test]
    fn test_page_past_the_end_is_not_found() {
        let page = Page::from_vec(vec![1, 2, 3], PageRequest::new(2).unwrap());
        assert!(matches!(
            page.ensure_in_range(),
            Err(DomainError::NotFound { entity_type: "page", .. })
        ));
    }
}
