pub mod entities;
pub mod error;
pub mod images;
pub mod media;
pub mod repo;
pub mod schema;
pub mod search;

pub use error::StoreError;
pub use media::MediaStore;
pub use repo::Page;
pub use search::SearchHit;
