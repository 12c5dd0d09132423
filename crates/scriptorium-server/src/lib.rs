pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::app;
pub use state::AppState;
