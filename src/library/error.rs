use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("An error occurred while parsing the article index: {0}")]
    Index(#[from] serde_json::Error),
    #[error("The article index lists '{0}' but no body is embedded for it")]
    MissingBody(String),
}
