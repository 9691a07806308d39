//! One pagination shape for every endpoint.
//!
//! The backend names its pagination fields differently per route
//! (`pages` vs `totalPages`, `current` vs `currentPage`, ...). [`Pagination::from_json`]
//! folds all of them into the canonical form before anything else sees them.

use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
    pub total_items: u64,
    pub total_pages: u32,
}

const TOTAL_KEYS: &[&str] = &["total", "totalItems", "totalDocs", "totalCount", "count"];
const PAGE_KEYS: &[&str] = &["page", "currentPage", "current"];
const PAGES_KEYS: &[&str] = &["pages", "totalPages"];
const LIMIT_KEYS: &[&str] = &["limit", "itemsPerPage", "pageSize", "perPage"];

impl Pagination {
    /// Used before the first response lands.
    pub fn empty(page_size: u32) -> Self {
        Self { page: 1, page_size: page_size.max(1), total_items: 0, total_pages: 0 }
    }

    /// Pagination for an endpoint that returned a bare list.
    pub fn single_page(item_count: usize, page_size: u32) -> Self {
        let total_items = item_count as u64;
        Self {
            page: 1,
            page_size: page_size.max(1),
            total_items,
            total_pages: if total_items == 0 { 0 } else { 1 },
        }
    }

    /// Normalises a raw pagination object. Missing fields fall back to the
    /// request that produced it (`requested_page`, `requested_limit`).
    pub fn from_json(raw: &Value, requested_page: u32, requested_limit: u32) -> Self {
        let page = first_u64(raw, PAGE_KEYS).map(clamp_u32).unwrap_or(requested_page).max(1);
        let page_size = first_u64(raw, LIMIT_KEYS).map(clamp_u32).unwrap_or(requested_limit).max(1);
        let total_items = first_u64(raw, TOTAL_KEYS).unwrap_or(0);

        let total_pages = match first_u64(raw, PAGES_KEYS) {
            Some(pages) => clamp_u32(pages),
            None => {
                let mut pages = clamp_u32(total_items.div_ceil(u64::from(page_size)));
                // Some routes only report whether more pages follow.
                if raw.get("hasNextPage").and_then(Value::as_bool) == Some(true) {
                    pages = pages.max(page.saturating_add(1));
                }
                pages
            }
        };

        Self { page, page_size, total_items, total_pages }
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// 1-based range of item numbers shown on this page, e.g. "11-20 of 57".
    /// `None` when the page holds nothing, including pages past the end.
    pub fn item_range(&self) -> Option<(u64, u64)> {
        let start = u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size) + 1;
        if start > self.total_items {
            return None;
        }
        let end = (start + u64::from(self.page_size.max(1)) - 1).min(self.total_items);
        Some((start, end))
    }
}

fn clamp_u32(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

fn first_u64(raw: &Value, keys: &[&str]) -> Option<u64> {
    keys.iter().find_map(|k| match raw.get(*k)? {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

/// State of the pager under a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagerControls {
    /// Pager is only drawn when there is more than one page.
    pub visible: bool,
    pub previous_disabled: bool,
    pub next_disabled: bool,
    pub page: u32,
    pub total_pages: u32,
}

impl From<&Pagination> for PagerControls {
    fn from(p: &Pagination) -> Self {
        Self {
            visible: p.total_pages > 1,
            previous_disabled: !p.has_previous(),
            next_disabled: !p.has_next(),
            page: p.page,
            total_pages: p.total_pages,
        }
    }
}
