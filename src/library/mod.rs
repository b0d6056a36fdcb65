mod catalog;
mod error;

pub use catalog::{Article, ArticleMeta, Catalog};
pub use error::Error;
