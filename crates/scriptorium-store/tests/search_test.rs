mod common;

use chrono::{Duration, Utc};
use common::{make_author, setup_db};
use scriptorium_core::ArticleStatus;
use scriptorium_store::repo::articles::{self, NewArticle};
use scriptorium_store::search::search_titles;

async fn publish(db: &sea_orm::DatabaseConnection, author_id: i32, title: &str) {
    let new = NewArticle {
        author_id,
        title: title.to_string(),
        status: ArticleStatus::Scheduled,
        published_at: Some(Utc::now() - Duration::hours(1)),
        ..NewArticle::default()
    };
    articles::create(db, new).await.unwrap();
}

#[tokio::test]
async fn empty_query_returns_nothing() {
    let db = setup_db().await;
    let author = make_author(&db).await;
    publish(&db, author.id, "Something").await;

    assert!(search_titles(&db, "", 5).await.unwrap().is_empty());
    assert!(search_titles(&db, "   ", 5).await.unwrap().is_empty());
}

#[tokio::test]
async fn match_is_case_insensitive_substring() {
    let db = setup_db().await;
    let author = make_author(&db).await;
    publish(&db, author.id, "Async Rust in Production").await;
    publish(&db, author.id, "Cooking for Two").await;

    let hits = search_titles(&db, "RUST", 5).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].title, "Async Rust in Production");
    assert_eq!(hits[0].slug, "async-rust-in-production");
}

#[tokio::test]
async fn drafts_and_scheduled_are_not_candidates() {
    let db = setup_db().await;
    let author = make_author(&db).await;

    let draft = NewArticle {
        author_id: author.id,
        title: "Rust Draft".to_string(),
        ..NewArticle::default()
    };
    articles::create(&db, draft).await.unwrap();

    let scheduled = NewArticle {
        author_id: author.id,
        title: "Rust Scheduled".to_string(),
        status: ArticleStatus::Scheduled,
        published_at: Some(Utc::now() + Duration::days(1)),
        ..NewArticle::default()
    };
    articles::create(&db, scheduled).await.unwrap();

    assert!(search_titles(&db, "rust", 5).await.unwrap().is_empty());
}

#[tokio::test]
async fn results_are_alphabetical_and_limited() {
    let db = setup_db().await;
    let author = make_author(&db).await;
    // Inserted out of order on purpose; six match, the limit is five.
    for title in [
        "Episode Delta",
        "Episode Alpha",
        "Episode Foxtrot",
        "Episode Charlie",
        "Episode Echo",
        "Episode Bravo",
    ] {
        publish(&db, author.id, title).await;
    }

    let hits = search_titles(&db, "episode", 5).await.unwrap();
    let titles: Vec<&str> = hits.iter().map(|h| h.title.as_str()).collect();
    assert_eq!(
        titles,
        [
            "Episode Alpha",
            "Episode Bravo",
            "Episode Charlie",
            "Episode Delta",
            "Episode Echo",
        ]
    );
}

#[tokio::test]
async fn like_metacharacters_match_literally() {
    let db = setup_db().await;
    let author = make_author(&db).await;
    publish(&db, author.id, "100% Rust").await;
    publish(&db, author.id, "100 Percent Other").await;

    let hits = search_titles(&db, "100%", 5).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].title, "100% Rust");
}
