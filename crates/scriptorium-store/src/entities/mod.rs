pub mod article;
pub mod article_image;
pub mod article_tag;
pub mod author;
pub mod tag;
pub mod topic;

pub use article::Status;
