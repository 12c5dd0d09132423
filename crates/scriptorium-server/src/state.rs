use std::sync::Arc;

use scriptorium_store::MediaStore;
use sea_orm::DatabaseConnection;

/// Shared per-request state: the connection pool and the media file store.
/// Nothing else is shared between requests.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub media: Arc<MediaStore>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, media: MediaStore) -> Self {
        Self {
            db,
            media: Arc::new(media),
        }
    }
}
