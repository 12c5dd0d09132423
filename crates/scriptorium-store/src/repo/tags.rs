use std::collections::HashSet;

use scriptorium_core::{FieldError, slugify, unique_from_base};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect,
    ActiveValue::{NotSet, Set},
};

use crate::entities::tag;
use crate::error::StoreError;

pub async fn create(db: &DatabaseConnection, name: &str) -> Result<tag::Model, StoreError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(FieldError::new("name", "this field is required").into());
    }
    let exists = tag::Entity::find()
        .filter(tag::Column::Name.eq(name))
        .one(db)
        .await?
        .is_some();
    if exists {
        return Err(FieldError::new("name", "a tag with this name already exists").into());
    }

    let base = {
        let slug = slugify(name);
        if slug.is_empty() {
            "tag".to_string()
        } else {
            slug
        }
    };
    let taken: HashSet<String> = tag::Entity::find()
        .filter(
            tag::Column::Slug
                .eq(&base)
                .or(tag::Column::Slug.starts_with(format!("{base}-"))),
        )
        .select_only()
        .column(tag::Column::Slug)
        .into_tuple()
        .all(db)
        .await?
        .into_iter()
        .collect();

    Ok(tag::ActiveModel {
        id: NotSet,
        name: Set(name.to_string()),
        slug: Set(unique_from_base(&base, &taken)),
    }
    .insert(db)
    .await?)
}

pub async fn list(db: &DatabaseConnection) -> Result<Vec<tag::Model>, StoreError> {
    Ok(tag::Entity::find()
        .order_by_asc(tag::Column::Name)
        .all(db)
        .await?)
}
