use thiserror::Error;

/// Errors produced by the gritty protocol layer.
#[derive(Debug, Error)]
pub enum GrittyError {
    #[error("codec error: {0}")]
    Codec(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("surface error: {0}")]
    Surface(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for GrittyError {
    fn from(e: serde_json::Error) -> Self {
        GrittyError::Codec(e.to_string())
    }
}

pub type GrittyResult<T> = Result<T, GrittyError>;
