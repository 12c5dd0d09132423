use scriptorium_core::FieldError;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QuerySelect,
    ActiveValue::{NotSet, Set},
};
use uuid::Uuid;

use crate::entities::{article, author};
use crate::error::StoreError;
use crate::media::MediaStore;

/// Create an author with a freshly generated bearer token. The token is
/// returned once, on the created model; there is no way to read it back
/// other than the column itself.
pub async fn create(db: &DatabaseConnection, username: &str) -> Result<author::Model, StoreError> {
    let username = username.trim();
    if username.is_empty() {
        return Err(FieldError::new("username", "this field is required").into());
    }
    let exists = author::Entity::find()
        .filter(author::Column::Username.eq(username))
        .one(db)
        .await?
        .is_some();
    if exists {
        return Err(FieldError::new("username", "an author with this username already exists").into());
    }

    Ok(author::ActiveModel {
        id: NotSet,
        username: Set(username.to_string()),
        token: Set(Uuid::new_v4().simple().to_string()),
    }
    .insert(db)
    .await?)
}

pub async fn find_by_token(
    db: &DatabaseConnection,
    token: &str,
) -> Result<Option<author::Model>, StoreError> {
    Ok(author::Entity::find()
        .filter(author::Column::Token.eq(token))
        .one(db)
        .await?)
}

/// Delete an author and, with them, every article they wrote. Each article
/// goes through the full delete path so image rows and backing files are
/// removed too.
pub async fn delete(
    db: &DatabaseConnection,
    media: &MediaStore,
    id: i32,
) -> Result<(), StoreError> {
    author::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(StoreError::AuthorNotFound)?;

    let article_ids: Vec<i32> = article::Entity::find()
        .filter(article::Column::AuthorId.eq(id))
        .select_only()
        .column(article::Column::Id)
        .into_tuple()
        .all(db)
        .await?;
    for article_id in article_ids {
        super::articles::delete(db, media, article_id).await?;
    }

    author::Entity::delete_by_id(id).exec(db).await?;
    Ok(())
}
