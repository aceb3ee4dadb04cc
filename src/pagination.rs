use serde::Serialize;
use std::num::NonZeroU64;

/// Splits a result set into fixed-size, 1-based pages.
#[derive(Debug, Copy, Clone)]
pub(crate) struct Paginator {
    page_size: NonZeroU64,
}

impl Paginator {
    pub(crate) fn new(page_size: NonZeroU64) -> Self {
        Self { page_size }
    }

    /// Resolves the requested page number against `total` items.
    ///
    /// Missing, zero or negative page numbers resolve to the first page,
    /// numbers past the end resolve to the last page. There is always
    /// at least one (possibly empty) page.
    pub(crate) fn window(&self, requested: Option<i64>, total: u64) -> PageWindow {
        let page_size = self.page_size.get();
        let num_pages = total.div_ceil(page_size).max(1);
        let number = requested
            .and_then(|n| u64::try_from(n).ok())
            .unwrap_or(1)
            .clamp(1, num_pages);
        PageWindow {
            number,
            num_pages,
            total,
            offset: (number - 1) * page_size,
            limit: page_size,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct PageWindow {
    pub(crate) number: u64,
    pub(crate) num_pages: u64,
    pub(crate) total: u64,
    #[serde(skip)]
    pub(crate) offset: u64,
    #[serde(skip)]
    pub(crate) limit: u64,
}

impl PageWindow {
    pub(crate) fn previous(&self) -> Option<u64> {
        (self.number > 1).then(|| self.number - 1)
    }

    pub(crate) fn next(&self) -> Option<u64> {
        (self.number < self.num_pages).then(|| self.number + 1)
    }
}

/// One page of items together with its position in the whole set.
#[derive(Debug, Serialize)]
pub(crate) struct Page<T> {
    pub(crate) items: Vec<T>,
    #[serde(flatten)]
    pub(crate) window: PageWindow,
    pub(crate) previous: Option<u64>,
    pub(crate) next: Option<u64>,
}

impl<T> Page<T> {
    pub(crate) fn new(items: Vec<T>, window: PageWindow) -> Self {
        Self {
            items,
            previous: window.previous(),
            next: window.next(),
            window,
        }
    }
}
