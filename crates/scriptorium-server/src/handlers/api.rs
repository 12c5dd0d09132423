use axum::Json;
use axum::extract::{Multipart, Query, State};
use axum::http::StatusCode;
use scriptorium_store::images;
use scriptorium_store::repo::articles;
use scriptorium_store::search::{SearchHit, search_titles};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::auth::{CurrentAuthor, OptionalAuthor};
use crate::error::ApiError;
use crate::handlers::SEARCH_RESULTS_LIMIT;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AutosavePayload {
    pub id: i32,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub excerpt: String,
}

/// POST /api/articles/autosave — the one endpoint that reports a distinct
/// unauthorized signal instead of masking as not-found.
pub async fn autosave(
    State(state): State<AppState>,
    OptionalAuthor(author): OptionalAuthor,
    Json(payload): Json<AutosavePayload>,
) -> Result<Json<Value>, ApiError> {
    if author.is_none() {
        return Err(ApiError::Unauthorized);
    }
    articles::autosave(
        &state.db,
        payload.id,
        payload.title,
        payload.content,
        payload.excerpt,
    )
    .await?;
    Ok(Json(json!({ "message": "Draft autosaved" })))
}

/// POST /api/images/upload — multipart form with an `article` id field
/// and an `image` file field. Gated: anonymous upload is masked as 404.
pub async fn upload_image(
    State(state): State<AppState>,
    CurrentAuthor(_author): CurrentAuthor,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let mut article_id: Option<i32> = None;
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ApiError::MalformedInput(err.to_string()))?
    {
        match field.name() {
            Some("article") => {
                let text = field
                    .text()
                    .await
                    .map_err(|err| ApiError::MalformedInput(err.to_string()))?;
                let id = text
                    .trim()
                    .parse()
                    .map_err(|_| ApiError::MalformedInput("invalid article id".to_string()))?;
                article_id = Some(id);
            }
            Some("image") => {
                let name = field.file_name().unwrap_or("image").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|err| ApiError::MalformedInput(err.to_string()))?;
                file = Some((name, bytes.to_vec()));
            }
            _ => {}
        }
    }

    let article_id =
        article_id.ok_or_else(|| ApiError::MalformedInput("missing article id".to_string()))?;
    let (name, bytes) =
        file.ok_or_else(|| ApiError::MalformedInput("missing image file".to_string()))?;

    let image = images::add(&state.db, &state.media, article_id, &name, &bytes).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Image uploaded successfully!",
            "url": format!("/media/{}", image.file),
            "id": image.id,
        })),
    ))
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// GET /api/search/articles?q= — title search over Published articles.
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Value>, ApiError> {
    let results: Vec<SearchHit> =
        search_titles(&state.db, &query.q, SEARCH_RESULTS_LIMIT).await?;
    Ok(Json(json!({ "results": results })))
}
