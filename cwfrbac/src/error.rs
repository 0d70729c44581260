#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Builder Error")]
    Builder,
    #[error("Admin override requires at least one admin user type")]
    AdminTypesRequired,
}

/// The reason a request was refused by the gate.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum Denial {
    #[error("user {user_id} is not a member of group {group_id}")]
    NotGroupMember {
        user_id: i64,
        group_id: i64,
    },
    #[error("user {user_id} did not submit workflow instance {instance_id}")]
    NotSubmitter {
        user_id: i64,
        instance_id: i64,
    },
    #[error("{transition} applies to a task, none was provided")]
    TaskRequired {
        transition: cwfcore::workflow::Transition,
    },
}
