use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClassificationError {
    #[error("Classifier request failed: {0}")]
    Request(String),

    #[error("Classifier responded with status {0}")]
    Status(u16),

    #[error("Malformed classifier response: {0}")]
    Malformed(String),

    #[error("Unexpected classification type: {0:?}")]
    UnexpectedType(String),
}

/// Rejections raised before anything touches storage.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please add a file, a link, or a comment to create a post.")]
    EmptyPost,

    #[error("Links must start with http:// or https://")]
    InvalidLink,

    #[error("Unknown board: {0}")]
    UnknownBoard(String),
}
