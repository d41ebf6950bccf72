use outofoffice_shared::ValidationError;
use outofoffice_store::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Chat not found: {0}")]
    ChatNotFound(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, CoreError>;
