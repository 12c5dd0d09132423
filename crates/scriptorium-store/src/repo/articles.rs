use std::collections::HashSet;

use chrono::{DateTime, Utc};
use scriptorium_core::{ArticleStatus, auto_promote, slugify, unique_slug, validate_publish_date};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, ModelTrait,
    Order, QueryFilter, QueryOrder, QuerySelect, Select, TransactionTrait,
    ActiveValue::{NotSet, Set},
};

use crate::entities::{Status, article, article_image, article_tag, tag};
use crate::error::StoreError;
use crate::media::MediaStore;
use crate::repo::{Page, paginate};

/// Fields accepted when creating an article.
///
/// A caller-provided `slug` is preserved verbatim; otherwise one is derived
/// from the title, disambiguated against existing slugs. Either way the
/// slug is assigned exactly once, here.
#[derive(Debug, Clone, Default)]
pub struct NewArticle {
    pub author_id: i32,
    pub title: String,
    pub slug: Option<String>,
    pub content: String,
    pub excerpt: String,
    pub status: ArticleStatus,
    pub topic_id: Option<i32>,
    pub tag_ids: Vec<i32>,
    pub published_at: Option<DateTime<Utc>>,
    pub featured_image: Option<String>,
}

impl NewArticle {
    /// The empty draft created by the write endpoint.
    pub fn draft(author_id: i32) -> Self {
        Self {
            author_id,
            ..Self::default()
        }
    }
}

/// Full-form update of an existing article. The slug is deliberately
/// absent: it never changes after creation.
#[derive(Debug, Clone)]
pub struct ArticleUpdate {
    pub title: String,
    pub status: ArticleStatus,
    pub topic_id: Option<i32>,
    pub tag_ids: Vec<i32>,
    pub published_at: Option<DateTime<Utc>>,
    pub content: String,
    pub excerpt: String,
    pub featured_image: Option<String>,
}

pub async fn create(
    db: &DatabaseConnection,
    new: NewArticle,
) -> Result<article::Model, StoreError> {
    let now = Utc::now();
    validate_publish_date(new.status, new.published_at, None, now, true)?;

    let slug = match new.slug {
        Some(slug) => slug,
        None => assign_slug(db, &new.title).await?,
    };
    let status = auto_promote(new.status, new.published_at, now);

    let txn = db.begin().await?;
    let model = article::ActiveModel {
        id: NotSet,
        title: Set(new.title),
        slug: Set(slug),
        content: Set(new.content),
        excerpt: Set(new.excerpt),
        status: Set(status.into()),
        topic_id: Set(new.topic_id),
        featured_image: Set(new.featured_image),
        views: Set(0),
        author_id: Set(new.author_id),
        created_at: Set(now),
        updated_at: Set(now),
        published_at: Set(new.published_at),
    }
    .insert(&txn)
    .await?;
    set_tags(&txn, model.id, &new.tag_ids).await?;
    txn.commit().await?;

    tracing::debug!(id = model.id, slug = %model.slug, "article created");
    Ok(model)
}

pub async fn update(
    db: &DatabaseConnection,
    id: i32,
    upd: ArticleUpdate,
) -> Result<article::Model, StoreError> {
    let now = Utc::now();
    let current = find_by_id(db, id).await?.ok_or(StoreError::ArticleNotFound)?;
    validate_publish_date(upd.status, upd.published_at, current.published_at, now, false)?;

    let previous = current.status();
    // An explicit transition to Published stamps the timestamp once; an
    // already-Published article keeps its original one.
    let published_at = if upd.status == ArticleStatus::Published {
        if previous == ArticleStatus::Published {
            current.published_at
        } else {
            Some(now)
        }
    } else {
        upd.published_at
    };
    let status = auto_promote(upd.status, published_at, now);

    let txn = db.begin().await?;
    let mut active: article::ActiveModel = current.into();
    active.title = Set(upd.title);
    active.content = Set(upd.content);
    active.excerpt = Set(upd.excerpt);
    active.status = Set(status.into());
    active.topic_id = Set(upd.topic_id);
    active.featured_image = Set(upd.featured_image);
    active.published_at = Set(published_at);
    active.updated_at = Set(now);
    let model = active.update(&txn).await?;
    set_tags(&txn, id, &upd.tag_ids).await?;
    txn.commit().await?;
    Ok(model)
}

/// Partial update used by the autosave endpoint: title, content and excerpt
/// only. Still a save, so the automatic Scheduled → Published promotion
/// applies and `updated_at` is refreshed; the slug is untouched.
pub async fn autosave(
    db: &DatabaseConnection,
    id: i32,
    title: String,
    content: String,
    excerpt: String,
) -> Result<article::Model, StoreError> {
    let now = Utc::now();
    let current = find_by_id(db, id).await?.ok_or(StoreError::ArticleNotFound)?;
    let status = auto_promote(current.status(), current.published_at, now);

    let mut active: article::ActiveModel = current.into();
    active.title = Set(title);
    active.content = Set(content);
    active.excerpt = Set(excerpt);
    active.status = Set(status.into());
    active.updated_at = Set(now);
    Ok(active.update(db).await?)
}

pub async fn find_by_id(
    db: &impl ConnectionTrait,
    id: i32,
) -> Result<Option<article::Model>, StoreError> {
    Ok(article::Entity::find_by_id(id).one(db).await?)
}

pub async fn find_by_slug(
    db: &DatabaseConnection,
    slug: &str,
) -> Result<Option<article::Model>, StoreError> {
    Ok(article::Entity::find()
        .filter(article::Column::Slug.eq(slug))
        .one(db)
        .await?)
}

/// Slug lookup restricted to the Published status, for anonymous readers.
pub async fn find_published_by_slug(
    db: &DatabaseConnection,
    slug: &str,
) -> Result<Option<article::Model>, StoreError> {
    Ok(article::Entity::find()
        .filter(article::Column::Slug.eq(slug))
        .filter(article::Column::Status.eq(Status::Published))
        .one(db)
        .await?)
}

/// Id lookup restricted to Draft, for the draft edit surface.
pub async fn find_draft_by_id(
    db: &DatabaseConnection,
    id: i32,
) -> Result<Option<article::Model>, StoreError> {
    Ok(article::Entity::find_by_id(id)
        .filter(article::Column::Status.eq(Status::Draft))
        .one(db)
        .await?)
}

pub async fn tags_for(
    db: &DatabaseConnection,
    article: &article::Model,
) -> Result<Vec<tag::Model>, StoreError> {
    Ok(article.find_related(tag::Entity).all(db).await?)
}

pub async fn images_for(
    db: &impl ConnectionTrait,
    article_id: i32,
) -> Result<Vec<article_image::Model>, StoreError> {
    Ok(article_image::Entity::find()
        .filter(article_image::Column::ArticleId.eq(article_id))
        .all(db)
        .await?)
}

/// Default read order: `published_at` DESC with NULLs last, then
/// `created_at` DESC, so published articles surface above drafts that
/// never got a publish date.
fn default_order(query: Select<article::Entity>) -> Select<article::Entity> {
    query
        .order_by(Expr::col(article::Column::PublishedAt).is_null(), Order::Asc)
        .order_by_desc(article::Column::PublishedAt)
        .order_by_desc(article::Column::CreatedAt)
}

pub async fn list_published(
    db: &DatabaseConnection,
    page: u64,
    per_page: u64,
) -> Result<Page<article::Model>, StoreError> {
    let query = default_order(
        article::Entity::find().filter(article::Column::Status.eq(Status::Published)),
    );
    paginate(db, query, page, per_page).await
}

/// Dashboard listing: every status, newest first by creation time.
pub async fn list_all(
    db: &DatabaseConnection,
    page: u64,
    per_page: u64,
) -> Result<Page<article::Model>, StoreError> {
    let query = article::Entity::find().order_by_desc(article::Column::CreatedAt);
    paginate(db, query, page, per_page).await
}

pub async fn list_by_topic(
    db: &DatabaseConnection,
    topic_id: i32,
    page: u64,
    per_page: u64,
) -> Result<Page<article::Model>, StoreError> {
    let query = default_order(
        article::Entity::find().filter(article::Column::TopicId.eq(topic_id)),
    );
    paginate(db, query, page, per_page).await
}

/// Most-viewed articles for a topic (sidebar).
pub async fn top_by_views(
    db: &DatabaseConnection,
    topic_id: i32,
    limit: u64,
) -> Result<Vec<article::Model>, StoreError> {
    Ok(article::Entity::find()
        .filter(article::Column::TopicId.eq(topic_id))
        .order_by_desc(article::Column::Views)
        .limit(limit)
        .all(db)
        .await?)
}

/// Bump the view counter without touching `updated_at`.
pub async fn increment_views(db: &DatabaseConnection, id: i32) -> Result<(), StoreError> {
    article::Entity::update_many()
        .col_expr(
            article::Column::Views,
            Expr::col(article::Column::Views).add(1),
        )
        .filter(article::Column::Id.eq(id))
        .exec(db)
        .await?;
    Ok(())
}

/// Delete an article together with its tag links, image rows and image
/// files. The file removal and the row deletes are separate writes; a
/// crash in between leaves orphaned rows at worst, never dangling files
/// referenced by live rows.
pub async fn delete(
    db: &DatabaseConnection,
    media: &MediaStore,
    id: i32,
) -> Result<(), StoreError> {
    find_by_id(db, id).await?.ok_or(StoreError::ArticleNotFound)?;
    crate::images::reconcile(db, media, id, &HashSet::new()).await?;

    let txn = db.begin().await?;
    article_tag::Entity::delete_many()
        .filter(article_tag::Column::ArticleId.eq(id))
        .exec(&txn)
        .await?;
    article::Entity::delete_by_id(id).exec(&txn).await?;
    txn.commit().await?;

    tracing::debug!(id, "article deleted");
    Ok(())
}

/// Replace the article's tag set. Unknown tag ids fail the whole call
/// before anything is written.
pub async fn set_tags<C: ConnectionTrait>(
    conn: &C,
    article_id: i32,
    tag_ids: &[i32],
) -> Result<(), StoreError> {
    let unique: HashSet<i32> = tag_ids.iter().copied().collect();
    if !unique.is_empty() {
        let found: HashSet<i32> = tag::Entity::find()
            .filter(tag::Column::Id.is_in(unique.iter().copied()))
            .select_only()
            .column(tag::Column::Id)
            .into_tuple()
            .all(conn)
            .await?
            .into_iter()
            .collect();
        for id in &unique {
            if !found.contains(id) {
                return Err(StoreError::TagNotFound(*id));
            }
        }
    }

    article_tag::Entity::delete_many()
        .filter(article_tag::Column::ArticleId.eq(article_id))
        .exec(conn)
        .await?;
    if !unique.is_empty() {
        let rows: Vec<article_tag::ActiveModel> = unique
            .into_iter()
            .map(|tag_id| article_tag::ActiveModel {
                article_id: Set(article_id),
                tag_id: Set(tag_id),
            })
            .collect();
        article_tag::Entity::insert_many(rows).exec(conn).await?;
    }
    Ok(())
}

/// First free slug for `title` among existing article slugs.
async fn assign_slug(db: &impl ConnectionTrait, title: &str) -> Result<String, StoreError> {
    let base = {
        let slug = slugify(title);
        if slug.is_empty() {
            scriptorium_core::FALLBACK_SLUG.to_string()
        } else {
            slug
        }
    };
    // Only slugs sharing the base can collide with a candidate.
    let taken: HashSet<String> = article::Entity::find()
        .filter(
            article::Column::Slug
                .eq(&base)
                .or(article::Column::Slug.starts_with(format!("{base}-"))),
        )
        .select_only()
        .column(article::Column::Slug)
        .into_tuple()
        .all(db)
        .await?
        .into_iter()
        .collect();
    Ok(unique_slug(title, &taken))
}
