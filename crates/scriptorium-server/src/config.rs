use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// scriptorium command-line interface.
#[derive(Parser, Debug)]
#[command(name = "scriptorium", author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP server.
    Serve(ServeArgs),
    /// Create the database tables.
    InitDb(DbArgs),
    /// Create an author and print their bearer token.
    AddAuthor {
        #[arg(long)]
        username: String,
        #[command(flatten)]
        db: DbArgs,
    },
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to listen on.
    #[arg(long, env = "SCRIPTORIUM_BIND", default_value = "127.0.0.1:8000")]
    pub bind: SocketAddr,
    #[command(flatten)]
    pub db: DbArgs,
    /// Root directory for uploaded media files.
    #[arg(long, env = "SCRIPTORIUM_MEDIA_ROOT", default_value = "media")]
    pub media_root: PathBuf,
}

#[derive(Args, Debug)]
pub struct DbArgs {
    /// Database connection string.
    #[arg(
        long,
        env = "SCRIPTORIUM_DATABASE_URL",
        default_value = "sqlite://scriptorium.db?mode=rwc"
    )]
    pub database_url: String,
}
