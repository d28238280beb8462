//! Event loop error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoopError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("nix error: {0}")]
    Nix(#[from] nix::Error),

    #[error("display connection lost: {0}")]
    Disconnected(String),
}
