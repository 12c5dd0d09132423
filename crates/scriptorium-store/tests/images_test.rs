mod common;

use std::collections::HashSet;

use common::{make_author, setup_db};
use scriptorium_store::repo::articles::{self, NewArticle};
use scriptorium_store::{MediaStore, StoreError, images};
use tempfile::TempDir;

async fn article_with_media(
    db: &sea_orm::DatabaseConnection,
) -> (scriptorium_store::entities::article::Model, MediaStore, TempDir) {
    let author = make_author(db).await;
    let mut new = NewArticle::draft(author.id);
    new.title = "With Images".to_string();
    let article = articles::create(db, new).await.unwrap();
    let root = TempDir::new().unwrap();
    let media = MediaStore::new(root.path());
    (article, media, root)
}

#[tokio::test]
async fn upload_stores_file_and_row() {
    let db = setup_db().await;
    let (article, media, _root) = article_with_media(&db).await;

    let image = images::add(&db, &media, article.id, "photo.jpg", b"fake image bytes")
        .await
        .unwrap();
    assert!(image.file.starts_with("uploads/images/"));
    assert!(image.file.ends_with(".jpg"));
    assert!(media.absolute(&image.file).is_file());
}

#[tokio::test]
async fn upload_to_missing_article_is_not_found() {
    let db = setup_db().await;
    let root = TempDir::new().unwrap();
    let media = MediaStore::new(root.path());
    match images::add(&db, &media, 42, "photo.jpg", b"bytes").await {
        Err(StoreError::ArticleNotFound) => {}
        other => panic!("expected ArticleNotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn reconcile_removes_exactly_the_orphans() {
    let db = setup_db().await;
    let (article, media, _root) = article_with_media(&db).await;

    let a = images::add(&db, &media, article.id, "a.png", b"a").await.unwrap();
    let b = images::add(&db, &media, article.id, "b.png", b"b").await.unwrap();
    let c = images::add(&db, &media, article.id, "c.png", b"c").await.unwrap();

    let keep: HashSet<i32> = [a.id, b.id].into_iter().collect();
    let deleted = images::reconcile(&db, &media, article.id, &keep).await.unwrap();
    assert_eq!(deleted, 1);

    let remaining = articles::images_for(&db, article.id).await.unwrap();
    let mut ids: Vec<i32> = remaining.iter().map(|i| i.id).collect();
    ids.sort();
    assert_eq!(ids, [a.id, b.id]);

    assert!(media.absolute(&a.file).is_file());
    assert!(media.absolute(&b.file).is_file());
    assert!(!media.absolute(&c.file).exists());
}

#[tokio::test]
async fn reconcile_is_idempotent() {
    let db = setup_db().await;
    let (article, media, _root) = article_with_media(&db).await;

    let a = images::add(&db, &media, article.id, "a.png", b"a").await.unwrap();
    images::add(&db, &media, article.id, "b.png", b"b").await.unwrap();

    let keep: HashSet<i32> = [a.id].into_iter().collect();
    assert_eq!(images::reconcile(&db, &media, article.id, &keep).await.unwrap(), 1);
    assert_eq!(images::reconcile(&db, &media, article.id, &keep).await.unwrap(), 0);
}

#[tokio::test]
async fn empty_keep_set_deletes_all_images() {
    let db = setup_db().await;
    let (article, media, _root) = article_with_media(&db).await;

    images::add(&db, &media, article.id, "a.png", b"a").await.unwrap();
    images::add(&db, &media, article.id, "b.png", b"b").await.unwrap();

    let deleted = images::reconcile(&db, &media, article.id, &HashSet::new())
        .await
        .unwrap();
    assert_eq!(deleted, 2);
    assert!(articles::images_for(&db, article.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn reconcile_tolerates_already_missing_files() {
    let db = setup_db().await;
    let (article, media, _root) = article_with_media(&db).await;

    let a = images::add(&db, &media, article.id, "a.png", b"a").await.unwrap();
    tokio::fs::remove_file(media.absolute(&a.file)).await.unwrap();

    let deleted = images::reconcile(&db, &media, article.id, &HashSet::new())
        .await
        .unwrap();
    assert_eq!(deleted, 1);
}

#[tokio::test]
async fn deleting_an_article_deletes_image_rows_and_files() {
    let db = setup_db().await;
    let (article, media, _root) = article_with_media(&db).await;

    let a = images::add(&db, &media, article.id, "a.png", b"a").await.unwrap();
    let b = images::add(&db, &media, article.id, "b.png", b"b").await.unwrap();

    articles::delete(&db, &media, article.id).await.unwrap();

    assert!(articles::find_by_id(&db, article.id).await.unwrap().is_none());
    assert!(articles::images_for(&db, article.id).await.unwrap().is_empty());
    assert!(!media.absolute(&a.file).exists());
    assert!(!media.absolute(&b.file).exists());
}

#[tokio::test]
async fn reconcile_keeps_other_articles_images() {
    let db = setup_db().await;
    let (article, media, _root) = article_with_media(&db).await;
    let other = articles::create(
        &db,
        NewArticle {
            author_id: article.author_id,
            title: "Other".to_string(),
            ..NewArticle::default()
        },
    )
    .await
    .unwrap();

    images::add(&db, &media, article.id, "mine.png", b"m").await.unwrap();
    let theirs = images::add(&db, &media, other.id, "theirs.png", b"t").await.unwrap();

    images::reconcile(&db, &media, article.id, &HashSet::new()).await.unwrap();

    let still_there = articles::images_for(&db, other.id).await.unwrap();
    assert_eq!(still_there.len(), 1);
    assert!(media.absolute(&theirs.file).is_file());
}
