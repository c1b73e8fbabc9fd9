//! Offset pagination and page-number windows for list views.

use serde::{Serialize, Serializer};

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

/// A 1-based page request with a clamped page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    pub fn new(page: Option<u32>, limit: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Row offset for the underlying `LIMIT`/`OFFSET` query.
    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// List-view metadata returned alongside every paged collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageMeta {
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
    /// Pre-computed pagination window for the rendering side.
    pub pages: Vec<PageToken>,
}

impl PageMeta {
    pub fn new(request: PageRequest, total: u64) -> Self {
        let total_pages =
            u32::try_from(total.div_ceil(u64::from(request.limit()))).unwrap_or(u32::MAX);
        Self {
            total,
            page: request.page(),
            limit: request.limit(),
            total_pages,
            pages: page_numbers(request.page(), total_pages),
        }
    }
}

/// A paged slice of records plus its metadata.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total: u64) -> Self {
        Self {
            items,
            meta: PageMeta::new(request, total),
        }
    }

    pub fn empty(request: PageRequest) -> Self {
        Self::new(Vec::new(), request, 0)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }
}

/// One entry of a pagination window: a page number or a gap marker.
///
/// Serializes numbers as JSON integers and the gap as the string `"..."`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageToken {
    Num(u32),
    Ellipsis,
}

impl Serialize for PageToken {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PageToken::Num(n) => serializer.serialize_u32(*n),
            PageToken::Ellipsis => serializer.serialize_str("..."),
        }
    }
}

/// Compute the page-number window for a list view.
///
/// Always includes page 1 and the last page, plus one neighbor on each side
/// of the current page, with ellipsis markers covering the gaps. Collapses
/// to `[1]` when there is at most one page.
pub fn page_numbers(current: u32, total_pages: u32) -> Vec<PageToken> {
    if total_pages <= 1 {
        return vec![PageToken::Num(1)];
    }

    let current = current.clamp(1, total_pages);
    let mut tokens = Vec::new();
    let mut last_kept = 0u32;

    for page in 1..=total_pages {
        let keep = page == 1 || page == total_pages || page.abs_diff(current) <= 1;
        if !keep {
            continue;
        }
        if last_kept != 0 && page - last_kept > 1 {
            tokens.push(PageToken::Ellipsis);
        }
        tokens.push(PageToken::Num(page));
        last_kept = page;
    }

    tokens
}
