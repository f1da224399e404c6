use thiserror::Error;

use twocat_media::MediaError;
use twocat_shared::error::ValidationError;
use twocat_shared::types::PostId;
use twocat_store::StoreError;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Could not start video call: {0}")]
    Media(#[from] MediaError),

    #[error("Please select a board before posting.")]
    NoBoardSelected,

    #[error("Post {0} does not exist on this board")]
    ParentNotFound(PostId),

    #[error("No media behind {0}")]
    MediaNotFound(String),

    #[error("Unknown call room: {0}")]
    UnknownCallRoom(String),

    #[error("Already in a call")]
    AlreadyInCall,

    #[error("Not in a call")]
    NotInCall,

    #[error("Lock poisoned: {0}")]
    LockPoisoned(String),
}
