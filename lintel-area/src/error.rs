//! Error types for the area crate.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum StyleError {
    #[error("gradient stop at {0}% is outside the open range (0, 100)")]
    StopOutOfRange(f64),

    #[error("unknown gradient kind '{0}'")]
    UnknownGradientKind(String),

    #[error("unknown task action '{0}'")]
    UnknownTaskAction(String),
}
