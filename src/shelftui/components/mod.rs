mod article_list;
pub mod filter;
mod reader;

pub use article_list::ShelfPage;
pub use reader::ReaderPage;
