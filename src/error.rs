use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Language model error: {status} {body}")]
    Llm { status: u16, body: String },

    #[error("Telegram API error: {0}")]
    Telegram(String),

    #[error("No amount found in message")]
    ParseFailure,

    #[error("Could not classify expense: {0}")]
    ClassificationFailure(String),

    #[error("Could not generate advice: {0}")]
    AdvisoryFailure(String),

    #[error("Chart error: {0}")]
    Chart(String),

    #[error("{0} is not set. Add it to the environment or a .env file")]
    MissingSecret(&'static str),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, AppError>;
