use sea_orm::sea_query::TableCreateStatement;
use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr, Schema};

use crate::entities::{article, article_image, article_tag, author, tag, topic};

/// Create all tables from the entity definitions (idempotent).
///
/// Used by `init-db`, by `serve` at startup, and by the integration tests
/// against in-memory SQLite.
pub async fn create_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    let mut statements: Vec<TableCreateStatement> = vec![
        schema.create_table_from_entity(author::Entity),
        schema.create_table_from_entity(topic::Entity),
        schema.create_table_from_entity(tag::Entity),
        schema.create_table_from_entity(article::Entity),
        schema.create_table_from_entity(article_tag::Entity),
        schema.create_table_from_entity(article_image::Entity),
    ];

    for stmt in &mut statements {
        stmt.if_not_exists();
        db.execute(backend.build(&*stmt)).await?;
    }
    Ok(())
}
