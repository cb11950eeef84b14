//! Error kinds raised by the interval register and the model composition code.
//!
//! Errors are returned inside [`anyhow::Error`] like everywhere else in the program. Where the
//! caller needs to tell the kinds apart (e.g. to report configuration problems differently from
//! missing data), it can use [`error_kind`].
use thiserror::Error;

/// The kinds of failure which can occur when building or simulating a system-of-systems model
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SosError {
    /// A named interval, interval set, model, output or dependency could not be found
    #[error("{0}")]
    NotFound(String),
    /// The model or interval configuration is invalid
    #[error("{0}")]
    Configuration(String),
}

/// Get the [`SosError`] at the root of `error`, if there is one
pub fn error_kind(error: &anyhow::Error) -> Option<&SosError> {
    error.chain().find_map(|cause| cause.downcast_ref::<SosError>())
}

/// Return early with a [`SosError::Configuration`] error
macro_rules! config_bail {
    ($($arg:tt)*) => {
        return Err($crate::error::SosError::Configuration(format!($($arg)*)).into())
    };
}
pub(crate) use config_bail;

/// Return early with a [`SosError::NotFound`] error
macro_rules! not_found_bail {
    ($($arg:tt)*) => {
        return Err($crate::error::SosError::NotFound(format!($($arg)*)).into())
    };
}
pub(crate) use not_found_bail;
