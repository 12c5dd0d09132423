use std::collections::HashSet;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use scriptorium_core::ArticleStatus;
use scriptorium_store::entities::{Status, article, article_image, tag};
use scriptorium_store::repo::articles::{self, ArticleUpdate, NewArticle};
use scriptorium_store::{Page, images};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::auth::{CurrentAuthor, OptionalAuthor};
use crate::error::ApiError;
use crate::handlers::{PUBLIC_PAGE_SIZE, PageQuery, map_page};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ArticleSummary {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub status: Status,
    pub topic_id: Option<i32>,
    pub featured_image: Option<String>,
    pub views: i64,
    pub created_at: DateTime<Utc>,
    pub published_at: Option<DateTime<Utc>>,
}

impl From<article::Model> for ArticleSummary {
    fn from(model: article::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            slug: model.slug,
            excerpt: model.excerpt,
            status: model.status,
            topic_id: model.topic_id,
            featured_image: model.featured_image,
            views: model.views,
            created_at: model.created_at,
            published_at: model.published_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ArticleDetail {
    #[serde(flatten)]
    pub summary: ArticleSummary,
    pub content: String,
    pub updated_at: DateTime<Utc>,
    pub is_published: bool,
    pub tags: Vec<tag::Model>,
}

async fn detail(state: &AppState, model: article::Model) -> Result<ArticleDetail, ApiError> {
    let tags = articles::tags_for(&state.db, &model).await?;
    let now = Utc::now();
    Ok(ArticleDetail {
        is_published: model.is_published(now),
        content: model.content.clone(),
        updated_at: model.updated_at,
        summary: model.into(),
        tags,
    })
}

/// Payload for the edit surfaces: the article plus everything the form
/// needs to round-trip (tag ids, current attachments).
#[derive(Debug, Serialize)]
pub struct EditPayload {
    pub article: ArticleDetail,
    pub tag_ids: Vec<i32>,
    pub images: Vec<article_image::Model>,
}

async fn edit_payload(state: &AppState, model: article::Model) -> Result<EditPayload, ApiError> {
    let images = articles::images_for(&state.db, model.id).await?;
    let article = detail(state, model).await?;
    let tag_ids = article.tags.iter().map(|t| t.id).collect();
    Ok(EditPayload {
        article,
        tag_ids,
        images,
    })
}

/// Full-form update body. `image_ids` is the JSON-encoded list of
/// attachment ids the editor still references, as submitted by the form.
#[derive(Debug, Deserialize)]
pub struct EditForm {
    pub title: String,
    pub status: ArticleStatus,
    #[serde(default)]
    pub topic_id: Option<i32>,
    #[serde(default)]
    pub tag_ids: Vec<i32>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    pub content: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub image_ids: Option<String>,
}

/// Parse the submitted keep-set. Malformed input fails the request before
/// anything is written; an absent list means "keep nothing".
fn parse_image_ids(raw: Option<&str>) -> Result<HashSet<i32>, ApiError> {
    let raw = match raw {
        None => return Ok(HashSet::new()),
        Some(raw) if raw.trim().is_empty() => return Ok(HashSet::new()),
        Some(raw) => raw,
    };
    serde_json::from_str::<Vec<i32>>(raw)
        .map(|ids| ids.into_iter().collect())
        .map_err(|err| ApiError::MalformedInput(format!("invalid image id list: {err}")))
}

/// GET /articles — published articles, paginated.
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page<ArticleSummary>>, ApiError> {
    let page = articles::list_published(&state.db, query.page, PUBLIC_PAGE_SIZE).await?;
    Ok(Json(map_page(page, ArticleSummary::from)))
}

/// GET /articles/{slug} — anonymous readers only see Published articles,
/// and only their reads count as views.
pub async fn show(
    State(state): State<AppState>,
    OptionalAuthor(author): OptionalAuthor,
    Path(slug): Path<String>,
) -> Result<Json<ArticleDetail>, ApiError> {
    let model = if author.is_some() {
        articles::find_by_slug(&state.db, &slug).await?
    } else {
        let found = articles::find_published_by_slug(&state.db, &slug).await?;
        if let Some(model) = &found {
            articles::increment_views(&state.db, model.id).await?;
        }
        found
    }
    .ok_or(ApiError::NotFound)?;
    Ok(Json(detail(&state, model).await?))
}

/// GET /articles/{slug}/edit
pub async fn edit_form(
    State(state): State<AppState>,
    CurrentAuthor(_author): CurrentAuthor,
    Path(slug): Path<String>,
) -> Result<Json<EditPayload>, ApiError> {
    let model = articles::find_by_slug(&state.db, &slug)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(edit_payload(&state, model).await?))
}

/// POST /articles/{slug}/edit — persist the form, then reconcile the
/// attachment set against the submitted image ids.
pub async fn update(
    State(state): State<AppState>,
    CurrentAuthor(_author): CurrentAuthor,
    Path(slug): Path<String>,
    Json(form): Json<EditForm>,
) -> Result<Json<ArticleDetail>, ApiError> {
    let model = articles::find_by_slug(&state.db, &slug)
        .await?
        .ok_or(ApiError::NotFound)?;
    apply_edit(&state, model, form).await
}

/// GET /drafts/{id} — the draft-only edit surface.
pub async fn draft_form(
    State(state): State<AppState>,
    CurrentAuthor(_author): CurrentAuthor,
    Path(id): Path<i32>,
) -> Result<Json<EditPayload>, ApiError> {
    let model = articles::find_draft_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(edit_payload(&state, model).await?))
}

/// POST /drafts/{id}
pub async fn draft_update(
    State(state): State<AppState>,
    CurrentAuthor(_author): CurrentAuthor,
    Path(id): Path<i32>,
    Json(form): Json<EditForm>,
) -> Result<Json<ArticleDetail>, ApiError> {
    let model = articles::find_draft_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound)?;
    apply_edit(&state, model, form).await
}

async fn apply_edit(
    state: &AppState,
    model: article::Model,
    form: EditForm,
) -> Result<Json<ArticleDetail>, ApiError> {
    // Fail fast on a malformed keep-set before any write happens.
    let keep = parse_image_ids(form.image_ids.as_deref())?;

    let update = ArticleUpdate {
        title: form.title,
        status: form.status,
        topic_id: form.topic_id,
        tag_ids: form.tag_ids,
        published_at: form.published_at,
        content: form.content,
        excerpt: form.excerpt,
        featured_image: model.featured_image.clone(),
    };
    let updated = articles::update(&state.db, model.id, update).await?;

    // Second write; the window between the two is accepted.
    images::reconcile(&state.db, &state.media, updated.id, &keep).await?;

    Ok(Json(detail(state, updated).await?))
}

/// POST /articles/{id}/delete — a non-numeric id is indistinguishable
/// from an absent one.
pub async fn delete(
    State(state): State<AppState>,
    CurrentAuthor(_author): CurrentAuthor,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id: i32 = id.parse().map_err(|_| ApiError::NotFound)?;
    articles::delete(&state.db, &state.media, id).await?;
    Ok(Json(json!({ "deleted": id })))
}

/// GET /write — create an empty draft owned by the caller and point at
/// its edit surface.
pub async fn write(
    State(state): State<AppState>,
    CurrentAuthor(author): CurrentAuthor,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let draft = articles::create(&state.db, NewArticle::draft(author.id)).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "id": draft.id, "location": format!("/drafts/{}", draft.id) })),
    ))
}
