/// Client-side API error.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Non-2xx response. `message` is the server's `error` field when the
    /// body is a JSON error object, the raw body otherwise.
    #[error("HTTP {status}: {message}")]
    Server { status: u16, message: String },

    #[error("network: {0}")]
    Network(#[from] reqwest::Error),

    #[error("decode: {0}")]
    Decode(String),

    /// The form was rejected before anything was sent.
    #[error("{0}")]
    Form(String),
}

impl ClientError {
    /// Whether the server answered 404.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::Server { status: 404, .. })
    }
}
