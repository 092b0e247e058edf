use serde::Serialize;

/// One page of a result set plus the counters the table footer needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketPage<T> {
    pub items: Vec<T>,
    /// 1-based, already clamped into `1..=total_pages`.
    pub page: usize,
    pub total_pages: usize,
    pub total_count: usize,
    pub page_size: usize,
    /// 1-based position of the first item on this page, 0 when empty.
    pub first_item: usize,
    /// 1-based position of the last item on this page, 0 when empty.
    pub last_item: usize,
    pub has_previous: bool,
    pub has_next: bool,
}

/// `ceil(total_count / page_size)`, never less than 1.
pub fn total_pages(total_count: usize, page_size: usize) -> usize {
    total_count.div_ceil(page_size.max(1)).max(1)
}

pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}

/// Slices `items` into the requested page. Out-of-range pages (including 0)
/// are clamped rather than rejected.
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> TicketPage<T> {
    let page_size = page_size.max(1);
    let total_count = items.len();
    let total_pages = total_pages(total_count, page_size);
    let page = clamp_page(page, total_pages);

    let start = ((page - 1) * page_size).min(total_count);
    let end = (start + page_size).min(total_count);
    let items = items[start..end].to_vec();

    let (first_item, last_item) = if items.is_empty() {
        (0, 0)
    } else {
        (start + 1, end)
    };

    TicketPage {
        items,
        page,
        total_pages,
        total_count,
        page_size,
        first_item,
        last_item,
        has_previous: page > 1,
        has_next: page < total_pages,
    }
}

/// Page numbers for the clickable strip under the table.
///
/// Every page is listed when there are at most `width` of them. Otherwise a
/// `width`-wide window is pinned to the first pages near the start, to the
/// last pages near the end, and centered on `current` in between.
pub fn page_window(current: usize, total_pages: usize, width: usize) -> Vec<usize> {
    let total_pages = total_pages.max(1);
    let width = width.max(1);
    let current = clamp_page(current, total_pages);

    if total_pages <= width {
        return (1..=total_pages).collect();
    }

    let half = width / 2;
    let start = if current <= half + 1 {
        1
    } else if current + half >= total_pages {
        total_pages + 1 - width
    } else {
        current - half
    };
    (start..start + width).collect()
}
