use thiserror::Error;

/// Errors surfaced by the access layer.
///
/// Missing records are not errors: lookups return `None` and deletes return
/// `false`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("Progress must be between 0 and 100, got {0}")]
    InvalidProgress(u8),

    #[error("Invalid request: {0}")]
    Validation(String),
}

/// Upper bound for `House::progress`
pub const MAX_PROGRESS: u8 = 100;

impl ApiError {
    pub fn check_progress(progress: u8) -> Result<(), ApiError> {
        if progress > MAX_PROGRESS {
            Err(ApiError::InvalidProgress(progress))
        } else {
            Ok(())
        }
    }
}
