pub mod error;
pub mod lifecycle;
pub mod slug;

pub use error::{FieldError, ValidationErrors};
pub use lifecycle::{ArticleStatus, InvalidStatus, auto_promote, is_published, validate_publish_date};
pub use slug::{FALLBACK_SLUG, slugify, unique_from_base, unique_slug};
