//! The result set and its pagination state.
//!
//! Records and the current page live in one struct so they can only change
//! together: `set_results` replaces the sequence and resets the page in the
//! same call, and every other mutation keeps the page inside
//! `[1, max(1, total_pages)]`.

use crate::Record;

/// Number of records shown per page.
pub const PAGE_SIZE: usize = 10;

#[derive(Debug, Clone)]
pub struct ResultStore {
    records: Vec<Record>,
    current_page: usize,
    page_size: usize,
}

impl Default for ResultStore {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            current_page: 1,
            page_size: PAGE_SIZE,
        }
    }
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole result set and go back to the first page.
    pub fn set_results(&mut self, records: Vec<Record>) {
        self.records = records;
        self.current_page = 1;
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// `ceil(len / page_size)`; zero for an empty store.
    pub fn total_pages(&self) -> usize {
        self.records.len().div_ceil(self.page_size)
    }

    /// Records on the current page, never more than `page_size`.
    pub fn current_page_items(&self) -> &[Record] {
        let start = (self.current_page - 1) * self.page_size;
        if start >= self.records.len() {
            return &[];
        }
        let end = (start + self.page_size).min(self.records.len());
        &self.records[start..end]
    }

    /// Move to page `n` if it exists. Out-of-range requests are ignored.
    ///
    /// Returns whether the page changed.
    pub fn go_to_page(&mut self, n: usize) -> bool {
        if n >= 1 && n <= self.total_pages() && n != self.current_page {
            self.current_page = n;
            true
        } else {
            false
        }
    }

    pub fn next_page(&mut self) -> bool {
        self.go_to_page(self.current_page + 1)
    }

    pub fn prev_page(&mut self) -> bool {
        // page 0 is out of range, so this is a no-op on the first page
        self.go_to_page(self.current_page.saturating_sub(1))
    }

    /// 1-based position of a page-local index in the whole result set.
    pub fn global_index(&self, local_index: usize) -> usize {
        (self.current_page - 1) * self.page_size + local_index + 1
    }

    /// Record at a page-local index, if it exists on the current page.
    pub fn page_record(&self, local_index: usize) -> Option<&Record> {
        self.current_page_items().get(local_index)
    }
}
