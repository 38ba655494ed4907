use thiserror::Error;

/// Failure classes surfaced to the UI as a single banner message.
///
/// Transport and Status cover the two network failure modes; InvalidResponse
/// covers a 2xx body that does not match the committed contract. Feedback
/// submission is fire-and-forget and never reaches the banner, so it has no
/// variant here.
#[derive(Debug, Error)]
pub enum ShopMateError {
    #[error("Network error: {0}")]
    Transport(String),

    #[error("Assistant service returned {status} {reason}")]
    Status { status: u16, reason: String },

    #[error("Invalid response from assistant service: {0}")]
    InvalidResponse(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Image error: {0}")]
    Image(String),
}

impl From<ShopMateError> for String {
    fn from(err: ShopMateError) -> Self {
        err.to_string()
    }
}
