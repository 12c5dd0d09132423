use axum::Router;
use axum::routing::{get, post};

use crate::handlers::{api, articles, dashboard, topics};
use crate::state::AppState;

/// The full HTTP surface. Handlers stay thin: translate the request,
/// call into the store, map errors at the edge.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/articles", get(articles::index))
        .route("/articles/{slug}", get(articles::show))
        .route(
            "/articles/{slug}/edit",
            get(articles::edit_form).post(articles::update),
        )
        .route("/articles/{slug}/delete", post(articles::delete))
        .route("/drafts/{id}", get(articles::draft_form).post(articles::draft_update))
        .route("/write", get(articles::write))
        .route("/dashboard", get(dashboard::index))
        .route("/topics", get(topics::index))
        .route("/topics/{slug}", get(topics::show))
        .route("/api/topics", post(topics::create))
        .route("/api/images/upload", post(api::upload_image))
        .route("/api/articles/autosave", post(api::autosave))
        .route("/api/search/articles", get(api::search))
        .with_state(state)
}
