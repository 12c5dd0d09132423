use axum::Json;
use axum::extract::{Query, State};
use scriptorium_store::Page;
use scriptorium_store::repo::articles;

use crate::auth::CurrentAuthor;
use crate::error::ApiError;
use crate::handlers::articles::ArticleSummary;
use crate::handlers::{DASHBOARD_PAGE_SIZE, PageQuery, map_page};
use crate::state::AppState;

/// GET /dashboard — every article regardless of status, newest first.
pub async fn index(
    State(state): State<AppState>,
    CurrentAuthor(_author): CurrentAuthor,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page<ArticleSummary>>, ApiError> {
    let page = articles::list_all(&state.db, query.page, DASHBOARD_PAGE_SIZE).await?;
    Ok(Json(map_page(page, ArticleSummary::from)))
}
