use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("cannot read playlist `{path}`: {source}")]
    Source {
        path: String,
        source: std::io::Error,
    },

    #[error("cannot parse playlist: {0}")]
    Playlist(#[from] m3u::FormatError),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("report error: {0}")]
    Report(#[from] serde_json::Error),
}
