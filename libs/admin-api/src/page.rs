//! Page-number pagination shared by list endpoints.

use serde::{Deserialize, Serialize};

/// Largest row offset a page may start at. SQL backends take a signed 64-bit offset.
pub const MAX_OFFSET: u64 = i64::MAX.unsigned_abs();

/// One page of a listing. `page` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
}

impl<T> Page<T> {
    #[must_use]
    pub fn new(items: Vec<T>, request: PageRequest, total: u64) -> Self {
        Self {
            items,
            page: request.page,
            per_page: request.per_page,
            total,
        }
    }

    #[must_use]
    pub fn empty(request: PageRequest) -> Self {
        Self::new(Vec::new(), request, 0)
    }

    #[must_use]
    pub fn total_pages(&self) -> u64 {
        if self.per_page == 0 {
            return 0;
        }
        self.total.div_ceil(self.per_page)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            per_page: self.per_page,
            total: self.total,
        }
    }
}

/// Requested page. Out-of-range values are clamped by [`PageRequest::normalized`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u64,
    pub per_page: u64,
}

impl PageRequest {
    #[must_use]
    pub fn new(page: u64, per_page: u64) -> Self {
        Self { page, per_page }
    }

    /// Build a request from optional query values: missing or zero page becomes 1,
    /// missing per-page becomes `default_per_page`, and per-page is capped at `max_per_page`.
    /// A page starting past [`MAX_OFFSET`] is pulled back to the last addressable one.
    #[must_use]
    pub fn normalized(
        page: Option<u64>,
        per_page: Option<u64>,
        default_per_page: u64,
        max_per_page: u64,
    ) -> Self {
        let page = page.filter(|p| *p > 0).unwrap_or(1);
        let per_page = per_page
            .filter(|p| *p > 0)
            .unwrap_or(default_per_page)
            .min(max_per_page.max(1));
        let page = page.min(last_page(per_page));
        Self { page, per_page }
    }

    /// Zero-based page index as expected by ORM paginators.
    ///
    /// `index() * per_page` never exceeds [`MAX_OFFSET`], so paginators that
    /// multiply without overflow checks are safe to hand it to.
    #[must_use]
    pub fn index(&self) -> u64 {
        self.page.min(last_page(self.per_page)).saturating_sub(1)
    }

    #[must_use]
    pub fn offset(&self) -> u64 {
        self.index().saturating_mul(self.per_page)
    }
}

fn last_page(per_page: u64) -> u64 {
    MAX_OFFSET / per_page.max(1)
}
