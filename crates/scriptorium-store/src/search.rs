//! Minimal title search: case-insensitive substring containment over
//! Published articles, alphabetical, truncated to a caller-given limit.

use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, QueryFilter, QueryOrder,
    QuerySelect,
};
use serde::Serialize;

use crate::entities::{Status, article};
use crate::error::StoreError;

#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult, Serialize)]
pub struct SearchHit {
    pub title: String,
    pub slug: String,
}

/// An empty or whitespace-only query short-circuits to no hits without
/// touching the database.
pub async fn search_titles(
    db: &DatabaseConnection,
    query: &str,
    limit: u64,
) -> Result<Vec<SearchHit>, StoreError> {
    let query = query.trim();
    if query.is_empty() {
        return Ok(Vec::new());
    }

    let pattern = format!("%{}%", escape_like(&query.to_lowercase()));
    Ok(article::Entity::find()
        .filter(article::Column::Status.eq(Status::Published))
        .filter(
            Expr::expr(Func::lower(Expr::col(article::Column::Title)))
                .like(LikeExpr::new(pattern).escape('\\')),
        )
        .order_by_asc(article::Column::Title)
        .limit(limit)
        .select_only()
        .column(article::Column::Title)
        .column(article::Column::Slug)
        .into_model::<SearchHit>()
        .all(db)
        .await?)
}

/// Escape LIKE metacharacters so the user's query is matched literally.
fn escape_like(query: &str) -> String {
    let mut out = String::with_capacity(query.len());
    for ch in query.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::escape_like;

    #[test]
    fn like_metacharacters_are_escaped() {
        assert_eq!(escape_like("100%_done\\"), "100\\%\\_done\\\\");
        assert_eq!(escape_like("plain"), "plain");
    }
}
