pub mod api;
pub mod articles;
pub mod dashboard;
pub mod topics;

use scriptorium_store::Page;
use serde::Deserialize;

pub const PUBLIC_PAGE_SIZE: u64 = 10;
pub const DASHBOARD_PAGE_SIZE: u64 = 15;
pub const SEARCH_RESULTS_LIMIT: u64 = 5;
pub const TOPIC_SIDEBAR_SIZE: u64 = 5;

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default = "first_page")]
    pub page: u64,
}

fn first_page() -> u64 {
    1
}

/// Re-wrap a page of models as a page of response bodies.
pub(crate) fn map_page<T, U>(page: Page<T>, f: impl FnMut(T) -> U) -> Page<U> {
    Page {
        items: page.items.into_iter().map(f).collect(),
        page: page.page,
        per_page: page.per_page,
        total_items: page.total_items,
        total_pages: page.total_pages,
    }
}
