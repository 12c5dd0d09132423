use anyhow::{Context, Result};
use clap::Parser;
use scriptorium_server::config::{Cli, Command, DbArgs, ServeArgs};
use scriptorium_server::{AppState, app};
use scriptorium_store::{MediaStore, repo, schema};
use sea_orm::{Database, DatabaseConnection};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Serve(args) => serve(args).await,
        Command::InitDb(args) => {
            let db = connect(&args).await?;
            schema::create_schema(&db).await.context("create schema")?;
            tracing::info!("database initialized");
            Ok(())
        }
        Command::AddAuthor { username, db } => {
            let db = connect(&db).await?;
            schema::create_schema(&db).await.context("create schema")?;
            let author = repo::authors::create(&db, &username)
                .await
                .context("create author")?;
            println!("author '{}' created, token: {}", author.username, author.token);
            Ok(())
        }
    }
}

async fn connect(args: &DbArgs) -> Result<DatabaseConnection> {
    Database::connect(&args.database_url)
        .await
        .with_context(|| format!("connect to {}", args.database_url))
}

async fn serve(args: ServeArgs) -> Result<()> {
    let db = connect(&args.db).await?;
    schema::create_schema(&db).await.context("create schema")?;

    let state = AppState::new(db, MediaStore::new(&args.media_root));
    let listener = tokio::net::TcpListener::bind(args.bind)
        .await
        .with_context(|| format!("bind {}", args.bind))?;
    tracing::info!(addr = %args.bind, media_root = %args.media_root.display(), "listening");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serve")
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutting down");
}
