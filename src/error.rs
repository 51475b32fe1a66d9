use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("Unknown mutation rule(s): {0}")]
    UnknownRules(String),

    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("Corpus error: {0}")]
    Corpus(String),

    #[error("Manifest error: {0}")]
    Manifest(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, AuditError>;
