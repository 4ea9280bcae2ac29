use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PrivacyError {
    #[error("invalid encoding: {0}")]
    InvalidEncoding(String),

    #[error("invalid private key: scalar must be in [1, n)")]
    InvalidPrivateKey,

    #[error("ring too small: expected at least {min} members, got {got}")]
    RingTooSmall { got: usize, min: usize },

    #[error("malformed signature: {0}")]
    MalformedSignature(String),

    #[error("invalid coordinate: {0}")]
    InvalidCoordinate(String),

    #[error("invalid privacy budget: {0}")]
    InvalidPrivacyBudget(String),

    #[error("invalid grid size: {0}")]
    InvalidGridSize(f64),

    #[error("invalid message field: {0}")]
    InvalidMessageField(String),

    #[error("random source failed to produce a usable scalar after {0} attempts")]
    RandomnessExhausted(usize),
}
