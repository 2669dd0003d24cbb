//! Projection of the store's current page into display rows.
//!
//! `project` reads nothing but the store, so calling it twice on the same
//! state yields the same view.

use crate::store::ResultStore;
use crate::{NOT_AVAILABLE, Record};

/// One row of the results list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedItem {
    /// 1-based position in the whole result set.
    pub number: usize,
    pub processo: String,
    pub titular: String,
    pub ncl: String,
    pub especificacao: String,
}

/// Pagination summary, present only when there is more than one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationInfo {
    pub current_page: usize,
    pub total_pages: usize,
    pub total_records: usize,
    pub has_prev: bool,
    pub has_next: bool,
}

impl PaginationInfo {
    pub fn label(&self) -> String {
        format!(
            "Página {} de {} ({} registros)",
            self.current_page, self.total_pages, self.total_records
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageView {
    pub items: Vec<RenderedItem>,
    pub pagination: Option<PaginationInfo>,
}

impl PageView {
    /// The results container is hidden when there is nothing to show.
    pub fn is_visible(&self) -> bool {
        !self.items.is_empty()
    }
}

fn display_field(field: &Option<String>) -> String {
    match field.as_deref() {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

fn render_item(number: usize, record: &Record) -> RenderedItem {
    RenderedItem {
        number,
        processo: display_field(&record.processo),
        titular: display_field(&record.titular),
        ncl: display_field(&record.ncl),
        especificacao: display_field(&record.especificacao),
    }
}

pub fn project(store: &ResultStore) -> PageView {
    let items = store
        .current_page_items()
        .iter()
        .enumerate()
        .map(|(i, rec)| render_item(store.global_index(i), rec))
        .collect::<Vec<_>>();

    let total_pages = store.total_pages();
    let pagination = if !items.is_empty() && total_pages > 1 {
        Some(PaginationInfo {
            current_page: store.current_page(),
            total_pages,
            total_records: store.len(),
            has_prev: store.current_page() > 1,
            has_next: store.current_page() < total_pages,
        })
    } else {
        None
    };

    PageView { items, pagination }
}
