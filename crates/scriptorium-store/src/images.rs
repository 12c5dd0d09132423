//! Image-attachment reconciliation.
//!
//! An article save submits the set of image ids still referenced by the
//! content; every attachment of that article outside the set is deleted,
//! row and backing file both. Re-running with the same keep set is a
//! no-op, and an empty keep set deletes every attachment.

use std::collections::HashSet;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    ActiveValue::{NotSet, Set},
};

use crate::entities::article_image;
use crate::error::StoreError;
use crate::media::MediaStore;
use crate::repo::articles;

/// Store one uploaded image and attach it to an article.
pub async fn add(
    db: &DatabaseConnection,
    media: &MediaStore,
    article_id: i32,
    original_name: &str,
    bytes: &[u8],
) -> Result<article_image::Model, StoreError> {
    articles::find_by_id(db, article_id)
        .await?
        .ok_or(StoreError::ArticleNotFound)?;

    let file = media.save(original_name, bytes).await?;
    let image = article_image::ActiveModel {
        id: NotSet,
        article_id: Set(article_id),
        file: Set(file),
    }
    .insert(db)
    .await?;
    tracing::debug!(article_id, image_id = image.id, file = %image.file, "image attached");
    Ok(image)
}

/// Delete every attachment of `article_id` whose id is not in `keep`.
///
/// Files are unlinked first (an already-missing file is tolerated), then
/// the rows are removed in one statement. Returns the number of deleted
/// attachments. Idempotent: a second run with the same keep set finds
/// nothing to delete.
pub async fn reconcile(
    db: &DatabaseConnection,
    media: &MediaStore,
    article_id: i32,
    keep: &HashSet<i32>,
) -> Result<u64, StoreError> {
    let orphaned: Vec<article_image::Model> = articles::images_for(db, article_id)
        .await?
        .into_iter()
        .filter(|image| !keep.contains(&image.id))
        .collect();
    if orphaned.is_empty() {
        return Ok(0);
    }

    for image in &orphaned {
        media.remove(&image.file).await?;
    }
    let ids: Vec<i32> = orphaned.iter().map(|image| image.id).collect();
    let deleted = article_image::Entity::delete_many()
        .filter(article_image::Column::Id.is_in(ids))
        .exec(db)
        .await?
        .rows_affected;

    tracing::debug!(article_id, deleted, "reconciled article images");
    Ok(deleted)
}
