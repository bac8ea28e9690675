use formwright_config::ConfigError;
use formwright_core::CoreError;
use thiserror::Error;

/// Error type for builder and application-level failures.
#[derive(Debug, Error)]
pub enum FormError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("No step removal is pending")]
    NoPendingRemoval,
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, FormError>;
