use fila_core::CoreError;

/// Failures talking to the remote queue backend.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend answered with an error envelope. The message is meant for
    /// direct display.
    #[error("{0}")]
    Rejected(String),

    /// Non-2xx status without a recognisable error envelope.
    #[error("backend returned {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    /// The body could not be decoded into the expected shape.
    #[error("could not decode backend response: {0}")]
    Decode(String),
}

impl BackendError {
    /// Whether the failure carries a message the operator should see as-is.
    pub fn is_rejection(&self) -> bool {
        matches!(self, BackendError::Rejected(_))
    }
}

impl From<serde_json::Error> for BackendError {
    fn from(err: serde_json::Error) -> Self {
        BackendError::Decode(err.to_string())
    }
}

/// Domain failures raised by the in-memory backend surface the same way the
/// remote backend reports its own: as a rejection with a display message.
impl From<CoreError> for BackendError {
    fn from(err: CoreError) -> Self {
        BackendError::Rejected(err.detail())
    }
}
