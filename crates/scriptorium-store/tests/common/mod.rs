use scriptorium_store::entities::author;
use scriptorium_store::repo;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

/// Fresh in-memory database with the full schema.
///
/// A single pooled connection keeps the in-memory database alive for the
/// whole test.
pub async fn setup_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1);
    let db = Database::connect(options).await.expect("connect sqlite");
    scriptorium_store::schema::create_schema(&db)
        .await
        .expect("create schema");
    db
}

pub async fn make_author(db: &DatabaseConnection) -> author::Model {
    repo::authors::create(db, "testuser").await.expect("create author")
}
