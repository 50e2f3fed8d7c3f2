//! Pagination controller
//!
//! One implementation serves both list modes:
//!
//! - **Client mode**: totals come from the length of an in-memory, already
//!   filtered array, and the visible rows are a slice of it.
//! - **Server mode**: totals come from the collaborator's page object and are
//!   trusted as-is.
//!
//! Invariant: `1 <= current_page <= max(1, total_pages)`.

use crate::collaborator::PageInfo;
use crate::error::{CliniPickError, Result};
use serde::Serialize;

/// Snapshot of the pagination position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageState {
    pub current_page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

impl PageState {
    pub fn first_index(&self) -> usize {
        (self.current_page - 1) * self.page_size
    }

    pub fn last_index(&self) -> usize {
        (self.current_page * self.page_size).min(self.total_items)
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn has_prev(&self) -> bool {
        self.current_page > 1
    }
}

impl From<PageState> for PageInfo {
    fn from(state: PageState) -> Self {
        PageInfo {
            page: state.current_page,
            limit: state.page_size,
            total: state.total_items,
            pages: state.total_pages,
            has_next: state.has_next(),
            has_prev: state.has_prev(),
        }
    }
}

/// Where page totals come from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMode {
    Client,
    Server,
}

#[derive(Debug, Clone)]
pub struct Paginator {
    mode: PageMode,
    current_page: usize,
    page_size: usize,
    total_items: usize,
    /// Page count reported by the collaborator (server mode only)
    reported_pages: Option<usize>,
}

impl Paginator {
    pub fn client(page_size: usize) -> Result<Self> {
        Self::new(PageMode::Client, page_size)
    }

    pub fn server(page_size: usize) -> Result<Self> {
        Self::new(PageMode::Server, page_size)
    }

    fn new(mode: PageMode, page_size: usize) -> Result<Self> {
        if page_size == 0 {
            return Err(CliniPickError::InvalidPageSize(page_size));
        }
        Ok(Self {
            mode,
            current_page: 1,
            page_size,
            total_items: 0,
            reported_pages: None,
        })
    }

    pub fn mode(&self) -> PageMode {
        self.mode
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_items(&self) -> usize {
        self.total_items
    }

    pub fn total_pages(&self) -> usize {
        match (self.mode, self.reported_pages) {
            (PageMode::Server, Some(pages)) => pages,
            _ => self.total_items.div_ceil(self.page_size),
        }
    }

    fn max_page(&self) -> usize {
        self.total_pages().max(1)
    }

    pub fn state(&self) -> PageState {
        PageState {
            current_page: self.current_page,
            page_size: self.page_size,
            total_items: self.total_items,
            total_pages: self.total_pages(),
        }
    }

    /// Jump to `page`, clamped into range. Returns whether the page changed.
    pub fn go_to(&mut self, page: usize) -> bool {
        let target = page.clamp(1, self.max_page());
        if target == self.current_page {
            return false;
        }
        self.current_page = target;
        true
    }

    pub fn next(&mut self) -> bool {
        if self.current_page >= self.total_pages() {
            return false;
        }
        self.go_to(self.current_page + 1)
    }

    pub fn prev(&mut self) -> bool {
        if self.current_page <= 1 {
            return false;
        }
        self.go_to(self.current_page - 1)
    }

    pub fn first(&mut self) -> bool {
        self.go_to(1)
    }

    pub fn last(&mut self) -> bool {
        self.go_to(self.max_page())
    }

    /// Change rows per page; always returns to page 1
    pub fn set_page_size(&mut self, size: usize) -> Result<()> {
        if size == 0 {
            return Err(CliniPickError::InvalidPageSize(size));
        }
        self.page_size = size;
        self.current_page = 1;
        // The reported count was for the old density; estimate until the next response
        if self.reported_pages.is_some() {
            self.reported_pages = Some(self.total_items.div_ceil(size));
        }
        Ok(())
    }

    /// Back to page 1, used whenever the filter criteria change
    pub fn reset(&mut self) {
        self.current_page = 1;
    }

    /// Drop the collaborator's totals after the criteria changed. Until the
    /// next page object arrives only page 1 is reachable.
    pub fn forget_totals(&mut self) {
        self.current_page = 1;
        self.total_items = 0;
        if self.mode == PageMode::Server {
            self.reported_pages = Some(0);
        }
    }

    /// Set the item count from an in-memory array, pulling the page back into range
    pub fn set_total_items(&mut self, total: usize) {
        self.total_items = total;
        self.current_page = self.current_page.clamp(1, self.max_page());
    }

    /// Adopt the collaborator's page object
    pub fn apply_page_info(&mut self, info: &PageInfo) {
        self.total_items = info.total;
        self.reported_pages = Some(info.pages);
        if info.limit > 0 {
            self.page_size = info.limit;
        }
        self.current_page = info.page.clamp(1, self.max_page());
    }

    /// The visible slice of an in-memory array for the current page
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let state = self.state();
        let end = state.last_index().min(items.len());
        let start = state.first_index().min(end);
        &items[start..end]
    }
}
