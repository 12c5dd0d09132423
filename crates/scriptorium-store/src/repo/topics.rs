use std::collections::HashSet;

use scriptorium_core::{FieldError, slugify, unique_from_base};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, TransactionTrait,
    ActiveValue::{NotSet, Set},
    sea_query::Expr,
};
use serde::Serialize;

use crate::entities::{article, topic};
use crate::error::StoreError;

/// Topic joined with the number of articles referencing it.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult, Serialize)]
pub struct TopicWithCount {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub article_count: i64,
}

/// Create a topic. The slug is derived from the name here, once; it is
/// never regenerated afterwards.
pub async fn create(
    db: &DatabaseConnection,
    name: &str,
    description: &str,
) -> Result<topic::Model, StoreError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(FieldError::new("name", "this field is required").into());
    }
    let exists = topic::Entity::find()
        .filter(topic::Column::Name.eq(name))
        .one(db)
        .await?
        .is_some();
    if exists {
        return Err(FieldError::new("name", "a topic with this name already exists").into());
    }

    let slug = assign_slug(db, name).await?;
    Ok(topic::ActiveModel {
        id: NotSet,
        name: Set(name.to_string()),
        slug: Set(slug),
        description: Set(description.to_string()),
    }
    .insert(db)
    .await?)
}

pub async fn find_by_slug(
    db: &DatabaseConnection,
    slug: &str,
) -> Result<Option<topic::Model>, StoreError> {
    Ok(topic::Entity::find()
        .filter(topic::Column::Slug.eq(slug))
        .one(db)
        .await?)
}

/// All topics with their article counts, alphabetical.
pub async fn list_with_counts(
    db: &DatabaseConnection,
) -> Result<Vec<TopicWithCount>, StoreError> {
    Ok(topic::Entity::find()
        .select_only()
        .column(topic::Column::Id)
        .column(topic::Column::Name)
        .column(topic::Column::Slug)
        .column(topic::Column::Description)
        .column_as(article::Column::Id.count(), "article_count")
        .join(JoinType::LeftJoin, topic::Relation::Articles.def())
        .group_by(topic::Column::Id)
        .group_by(topic::Column::Name)
        .group_by(topic::Column::Slug)
        .group_by(topic::Column::Description)
        .order_by_asc(topic::Column::Name)
        .into_model::<TopicWithCount>()
        .all(db)
        .await?)
}

/// Delete a topic. Articles referencing it are detached (topic set to
/// null), never deleted: topics are shared, not owned.
pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<(), StoreError> {
    topic::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(StoreError::TopicNotFound)?;

    let txn = db.begin().await?;
    article::Entity::update_many()
        .col_expr(article::Column::TopicId, Expr::value(Option::<i32>::None))
        .filter(article::Column::TopicId.eq(id))
        .exec(&txn)
        .await?;
    topic::Entity::delete_by_id(id).exec(&txn).await?;
    txn.commit().await?;
    Ok(())
}

async fn assign_slug(db: &DatabaseConnection, name: &str) -> Result<String, StoreError> {
    let base = {
        let slug = slugify(name);
        if slug.is_empty() {
            "topic".to_string()
        } else {
            slug
        }
    };
    let taken: HashSet<String> = topic::Entity::find()
        .filter(
            topic::Column::Slug
                .eq(&base)
                .or(topic::Column::Slug.starts_with(format!("{base}-"))),
        )
        .select_only()
        .column(topic::Column::Slug)
        .into_tuple()
        .all(db)
        .await?
        .into_iter()
        .collect();
    Ok(unique_from_base(&base, &taken))
}
