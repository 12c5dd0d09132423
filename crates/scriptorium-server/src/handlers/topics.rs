use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use scriptorium_store::Page;
use scriptorium_store::entities::topic;
use scriptorium_store::repo::articles;
use scriptorium_store::repo::topics::{self, TopicWithCount};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::auth::CurrentAuthor;
use crate::error::ApiError;
use crate::handlers::articles::ArticleSummary;
use crate::handlers::{PUBLIC_PAGE_SIZE, PageQuery, TOPIC_SIDEBAR_SIZE, map_page};
use crate::state::AppState;

/// GET /topics — every topic with its article count.
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<TopicWithCount>>, ApiError> {
    Ok(Json(topics::list_with_counts(&state.db).await?))
}

#[derive(Debug, Serialize)]
pub struct TopicPage {
    pub topic: topic::Model,
    pub articles: Page<ArticleSummary>,
    pub top_articles: Vec<ArticleSummary>,
}

/// GET /topics/{slug} — the topic's articles plus a most-viewed sidebar.
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Json<TopicPage>, ApiError> {
    let topic = topics::find_by_slug(&state.db, &slug)
        .await?
        .ok_or(ApiError::NotFound)?;

    let articles_page =
        articles::list_by_topic(&state.db, topic.id, query.page, PUBLIC_PAGE_SIZE).await?;
    let top = articles::top_by_views(&state.db, topic.id, TOPIC_SIDEBAR_SIZE).await?;

    Ok(Json(TopicPage {
        topic,
        articles: map_page(articles_page, ArticleSummary::from),
        top_articles: top.into_iter().map(ArticleSummary::from).collect(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct NewTopicForm {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// POST /api/topics
pub async fn create(
    State(state): State<AppState>,
    CurrentAuthor(_author): CurrentAuthor,
    Json(form): Json<NewTopicForm>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let topic = topics::create(&state.db, &form.name, &form.description).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Topic added successfully", "topic": topic })),
    ))
}
