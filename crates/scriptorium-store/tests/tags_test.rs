mod common;

use common::setup_db;
use scriptorium_store::StoreError;
use scriptorium_store::repo::tags;

#[tokio::test]
async fn tag_slug_derives_from_name() {
    let db = setup_db().await;
    let tag = tags::create(&db, "Systems Programming").await.unwrap();
    assert_eq!(tag.slug, "systems-programming");
}

#[tokio::test]
async fn duplicate_tag_name_is_a_field_error() {
    let db = setup_db().await;
    tags::create(&db, "Rust").await.unwrap();
    match tags::create(&db, "Rust").await {
        Err(StoreError::Validation(errors)) => {
            assert_eq!(errors.errors()[0].field, "name");
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn colliding_tag_slugs_get_numbered() {
    let db = setup_db().await;
    let first = tags::create(&db, "Web Dev").await.unwrap();
    let second = tags::create(&db, "Web-Dev").await.unwrap();
    assert_eq!(first.slug, "web-dev");
    assert_eq!(second.slug, "web-dev-1");
}

#[tokio::test]
async fn list_is_alphabetical() {
    let db = setup_db().await;
    for name in ["Tokio", "Async", "Macros"] {
        tags::create(&db, name).await.unwrap();
    }
    let names: Vec<String> = tags::list(&db).await.unwrap().into_iter().map(|t| t.name).collect();
    assert_eq!(names, ["Async", "Macros", "Tokio"]);
}
