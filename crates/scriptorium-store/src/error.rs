use scriptorium_core::{FieldError, ValidationErrors};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("article not found")]
    ArticleNotFound,
    #[error("topic not found")]
    TopicNotFound,
    #[error("tag not found: {0}")]
    TagNotFound(i32),
    #[error("author not found")]
    AuthorNotFound,
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error("database error: {0}")]
    Db(#[from] sea_orm::DbErr),
    #[error("media i/o error: {0}")]
    Media(#[from] std::io::Error),
}

impl From<FieldError> for StoreError {
    fn from(err: FieldError) -> Self {
        StoreError::Validation(err.into())
    }
}
