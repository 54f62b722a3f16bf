use thiserror::Error;

#[derive(Error, Debug)]
pub enum BlobError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("invalid blob key: {0}")]
    InvalidKey(String),

    #[error("request signing failed: {0}")]
    Signing(String),

    #[error("object storage request failed: {0}")]
    Remote(String),

    #[error("object storage rejected {key}: HTTP {status}")]
    Rejected { key: String, status: u16 },
}
