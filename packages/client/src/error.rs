//! Client error type.

use thiserror::Error;
use typerace_core::{
    domain::{StoreError, ValueObjectError},
    session::ConfigError,
    usecase::SessionError,
};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Validation(#[from] ValueObjectError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("cannot reach the room host: {0}")]
    Store(#[from] StoreError),

    #[error("unsupported practice duration: {0} seconds (choose 60, 120 or 300)")]
    PracticeDuration(u32),
}
