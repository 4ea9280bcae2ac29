use privacy_engine::PrivacyError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Privacy(#[from] PrivacyError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("authorization failed local verification")]
    VerificationFailed,
}
