//! Page arithmetic for the leads table footer.

use serde::Serialize;

/// Page numbers to render, with `None` marking a collapsed gap.
fn get_pages(
    total_pages: usize,
    current_page: usize,
    left_edge: usize,
    left_current: usize,
    right_current: usize,
    right_edge: usize,
) -> Vec<Option<usize>> {
    let last_page = total_pages;

    if last_page == 0 {
        return vec![];
    }

    let mut pages = Vec::new();

    let left_end = (1 + left_edge).min(last_page + 1);
    pages.extend((1..left_end).map(Some));

    let mid_start = left_end.max(current_page.saturating_sub(left_current));
    let mid_end = (current_page + right_current + 1).min(last_page + 1);

    if mid_start > left_end {
        pages.push(None);
    }
    pages.extend((mid_start..mid_end).map(Some));

    let right_start = mid_end.max(last_page.saturating_sub(right_edge) + 1);

    if right_start > mid_end {
        pages.push(None);
    }
    pages.extend((right_start..=last_page).map(Some));

    pages
}

/// Everything the pager needs to know about the current page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageSummary {
    pub page: usize,
    pub page_size: usize,
    pub total: usize,
    pub total_pages: usize,
    /// One-based index of the first row shown, `0` when nothing is shown.
    pub start: usize,
    /// One-based index of the last row shown.
    pub end: usize,
    pub pages: Vec<Option<usize>>,
}

impl PageSummary {
    pub fn new(page: usize, page_size: usize, total: usize) -> Self {
        let page = page.max(1);
        let page_size = page_size.max(1);
        let total_pages = total.div_ceil(page_size);

        let first = (page - 1).saturating_mul(page_size);
        let end = page.saturating_mul(page_size).min(total);
        let (start, end) = if first < end { (first + 1, end) } else { (0, 0) };

        Self {
            page,
            page_size,
            total,
            total_pages,
            start,
            end,
            pages: get_pages(total_pages, page, 2, 2, 2, 1),
        }
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// `Showing 11-20 of 42 leads`
    pub fn showing_label(&self) -> String {
        format!(
            "Showing {}-{} of {} leads",
            self.start, self.end, self.total
        )
    }
}
