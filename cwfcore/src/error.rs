use thiserror::Error;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum BackendError {
    #[cfg(feature = "sqlx")]
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
    /// A conditional write found the record in a state other than the
    /// one it was expected to be in; nothing was written.
    #[error("conflicting modification: {0}")]
    Conflict(String),
    /// Transient failures persisted beyond the retry allowance.
    #[error("backend unavailable: {0}")]
    Unavailable(String),
    /// Denotes custom application invariant; generally informative.
    #[error("application invariant violated: {0}")]
    AppInvariantViolation(String),
    #[error("unknown error")]
    Unknown,
}

#[non_exhaustive]
#[derive(Debug, Error, PartialEq)]
pub enum ValueError {
    #[error("unsupported value: {0}")]
    Unsupported(String),
    #[error("invalid code: {0}")]
    InvalidCode(i64),
    #[error("uninitialized value")]
    Uninitialized,
}

/// Failures raised by the state machine when a requested transition
/// does not apply to the current state of the workflow.
#[derive(Debug, Error, PartialEq)]
pub enum TransitionError {
    #[error("task {task_id} is not part of workflow instance {instance_id}")]
    UnknownTask {
        instance_id: i64,
        task_id: i64,
    },
    #[error("task {task_id} is {status:?} and cannot be actioned")]
    TaskNotPending {
        task_id: i64,
        status: crate::workflow::TaskStatus,
    },
    #[error("workflow instance {instance_id} is already {status:?}")]
    InstanceTerminal {
        instance_id: i64,
        status: crate::workflow::InstanceStatus,
    },
    #[error("no group may approve the submission for resource {resource_id}")]
    NoApprover {
        resource_id: i64,
    },
    #[error(transparent)]
    Value(#[from] ValueError),
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification transport closed")]
    Closed,
    #[error("notification transport failure: {0}")]
    Transport(String),
}
