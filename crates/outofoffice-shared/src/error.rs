use thiserror::Error;

/// Input rejected before anything is written. Retrying without changing the
/// input will fail the same way.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Cannot send empty message")]
    EmptyMessage,

    #[error("Missing identifier: {0}")]
    EmptyId(&'static str),
}
