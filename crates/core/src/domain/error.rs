// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid device id: {0}")]
    InvalidDeviceId(String),

    #[error("No local file paths given")]
    EmptyPaths,
}

pub type Result<T> = std::result::Result<T, DomainError>;
