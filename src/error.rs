use thiserror::Error;

/// Programmer-error-class failures. None of these are recoverable runtime
/// conditions: callers propagate them and the tick that hit one is not
/// replayed.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("no schedule with id {0} found")]
    ScheduleNotFound(usize),
}
