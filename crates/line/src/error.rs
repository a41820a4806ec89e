use thiserror::Error;

#[derive(Debug, Error)]
pub enum LineError {
    /// Missing, undecodable or mismatched `X-Line-Signature`.
    #[error("invalid webhook signature")]
    InvalidSignature,

    #[error("malformed payload: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("LINE API returned {status}: {body}")]
    Api { status: u16, body: String },
}

impl LineError {
    pub fn is_invalid_signature(&self) -> bool {
        matches!(self, Self::InvalidSignature)
    }
}
