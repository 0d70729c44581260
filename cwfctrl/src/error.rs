use cwfcore::error::{
    BackendError,
    TransitionError,
    ValueError,
};
use cwfrbac::Denial;
use thiserror::Error;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    /// A referenced entity is absent.
    #[error("not found: {0}")]
    NotFound(String),
    #[error("unauthorized: {0}")]
    Unauthorized(#[from] Denial),
    /// The transition does not apply to the current state, including a
    /// race lost at the store.
    #[error("invalid state: {0}")]
    InvalidState(String),
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
    #[error(transparent)]
    Backend(BackendError),
}

impl From<BackendError> for Error {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Conflict(msg) => Error::InvalidState(msg),
            BackendError::Unavailable(msg) => Error::StoreUnavailable(msg),
            err => Error::Backend(err),
        }
    }
}

impl From<TransitionError> for Error {
    fn from(err: TransitionError) -> Self {
        match err {
            TransitionError::NoApprover { .. } => Error::InvalidConfiguration(err.to_string()),
            err => Error::InvalidState(err.to_string()),
        }
    }
}

impl From<ValueError> for Error {
    fn from(err: ValueError) -> Self {
        Error::Validation(err.to_string())
    }
}

impl From<cwfrbac::error::Error> for Error {
    fn from(err: cwfrbac::error::Error) -> Self {
        Error::InvalidConfiguration(err.to_string())
    }
}

#[cfg(test)]
mod test {
    use cwfcore::workflow::InstanceStatus;
    use super::*;

    #[test]
    fn backend() {
        assert!(matches!(
            Error::from(BackendError::Conflict("task 1".into())),
            Error::InvalidState(_),
        ));
        assert!(matches!(
            Error::from(BackendError::Unavailable("busy".into())),
            Error::StoreUnavailable(_),
        ));
        assert!(matches!(
            Error::from(BackendError::Unknown),
            Error::Backend(BackendError::Unknown),
        ));
    }

    #[test]
    fn transition() {
        assert!(matches!(
            Error::from(TransitionError::NoApprover { resource_id: 1 }),
            Error::InvalidConfiguration(_),
        ));
        let err = Error::from(TransitionError::InstanceTerminal {
            instance_id: 2,
            status: InstanceStatus::Approved,
        });
        assert_eq!(
            err.to_string(),
            "invalid state: workflow instance 2 is already Approved",
        );
    }
}
