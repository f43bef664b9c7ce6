use thiserror::Error;

use stockroom_infra::StoreError;

/// Failures that end the interactive session.
///
/// Everything recoverable (bad input, failed validation, missing items) is
/// printed and re-prompted inside the shell and never reaches this type.
#[derive(Debug, Error)]
pub enum ShellError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// End of input. Treated as a normal exit.
    #[error("input closed")]
    InputClosed,

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type ShellResult<T> = Result<T, ShellError>;
