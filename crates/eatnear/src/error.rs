use thiserror::Error;

#[derive(Error, Debug)]
pub enum EatnearError {
    #[error("Finder error: {0}")]
    FinderError(#[from] crate::core::FinderError),
    #[error("Search error: {0}")]
    SearchError(#[from] crate::search::SearchError),
    #[error("Places error: {0}")]
    PlacesError(#[from] eatnear_places::PlacesError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Init Logging error: {0}")]
    InitLoggingError(#[from] tracing_subscriber::filter::ParseError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, EatnearError>;
