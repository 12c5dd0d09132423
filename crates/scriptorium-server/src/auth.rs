//! Bearer-token authentication, applied as extractors rather than
//! per-handler checks.

use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;
use scriptorium_store::entities::author;
use scriptorium_store::repo::authors;

use crate::error::ApiError;
use crate::state::AppState;

/// The authenticated principal, when one presented a valid token.
/// Extraction itself never fails for anonymous callers; handlers decide
/// how absence is surfaced.
pub struct OptionalAuthor(pub Option<author::Model>);

/// A required authenticated principal. Anonymous callers get NotFound,
/// never a distinct "forbidden" signal — gated pages simply do not exist
/// for them.
pub struct CurrentAuthor(pub author::Model);

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

impl FromRequestParts<AppState> for OptionalAuthor {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(parts) else {
            return Ok(Self(None));
        };
        let author = authors::find_by_token(&state.db, token)
            .await
            .map_err(ApiError::from)?;
        Ok(Self(author))
    }
}

impl FromRequestParts<AppState> for CurrentAuthor {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match OptionalAuthor::from_request_parts(parts, state).await?.0 {
            Some(author) => Ok(Self(author)),
            None => Err(ApiError::NotFound),
        }
    }
}
