use sea_orm::{DatabaseConnection, EntityTrait, FromQueryResult, Select};
use serde::Serialize;

use crate::error::StoreError;

pub mod articles;
pub mod authors;
pub mod tags;
pub mod topics;

/// One page of a listing, 1-based.
///
/// An out-of-range page yields an empty `items` list with the totals still
/// filled in; it is not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub per_page: u64,
    pub total_items: u64,
    pub total_pages: u64,
}

pub(crate) async fn paginate<E>(
    db: &DatabaseConnection,
    query: Select<E>,
    page: u64,
    per_page: u64,
) -> Result<Page<E::Model>, StoreError>
where
    E: EntityTrait,
    E::Model: FromQueryResult + Send + Sync,
{
    use sea_orm::PaginatorTrait;

    let page = page.max(1);
    let paginator = query.paginate(db, per_page);
    let totals = paginator.num_items_and_pages().await?;
    let items = paginator.fetch_page(page - 1).await?;
    Ok(Page {
        items,
        page,
        per_page,
        total_items: totals.number_of_items,
        total_pages: totals.number_of_pages,
    })
}
