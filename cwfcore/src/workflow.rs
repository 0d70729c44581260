use num_enum::{
    IntoPrimitive,
    TryFromPrimitive,
};
use serde::{Deserialize, Serialize};
use crate::ac::Authority;

mod impls;
pub mod machine;
pub mod traits;
pub mod transition;

pub use transition::{
    Decision,
    Transition,
};

/// The action on a resource that a workflow seeks approval for.
#[derive(
    Clone, Copy, Debug, Default, Eq, Hash, PartialEq,
    Deserialize, Serialize, IntoPrimitive, TryFromPrimitive,
)]
#[repr(i64)]
pub enum ActionType {
    #[default]
    Publish = 1,
    Unpublish = 2,
    Edit = 3,
}

#[derive(
    Clone, Copy, Debug, Eq, Hash, PartialEq,
    Deserialize, Serialize, IntoPrimitive, TryFromPrimitive,
)]
#[repr(i64)]
pub enum InstanceStatus {
    InProgress = 1,
    Approved = 2,
    Rejected = 3,
    Cancelled = 4,
}

#[derive(
    Clone, Copy, Debug, Eq, Hash, PartialEq,
    Deserialize, Serialize, IntoPrimitive, TryFromPrimitive,
)]
#[repr(i64)]
pub enum TaskStatus {
    /// The single active step of an in-progress instance.
    PendingApproval = 1,
    Approved = 2,
    Rejected = 3,
    Cancelled = 4,
    /// Terminal from creation; the responsible group lacked the
    /// authority to approve.
    NotRequired = 5,
    /// A required step that has yet to become active.
    Awaiting = 6,
}

/// One submitted action on one resource, along with its approval chain.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct WorkflowInstance {
    pub id: i64,
    pub resource_id: i64,
    pub action: ActionType,
    pub status: InstanceStatus,
    pub submitted_by: i64,
    pub comment: Option<String>,
    pub created_ts: i64,
    pub completed_ts: Option<i64>,

    pub tasks: Option<TaskInstances>,
}

/// One approval step within a workflow instance.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct TaskInstance {
    pub id: i64,
    pub workflow_instance_id: i64,
    pub step_index: i64,
    pub group_id: i64,
    pub status: TaskStatus,
    pub actioned_by: Option<i64>,
    pub created_ts: i64,
    pub completed_ts: Option<i64>,
    pub comment: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct TaskInstances(Vec<TaskInstance>);

/// A workflow instance that has yet to be persisted.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct NewWorkflowInstance {
    pub resource_id: i64,
    pub action: ActionType,
    pub status: InstanceStatus,
    pub submitted_by: i64,
    pub comment: Option<String>,
    pub created_ts: i64,
    pub completed_ts: Option<i64>,
    pub tasks: Vec<NewTaskInstance>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct NewTaskInstance {
    pub step_index: i64,
    pub group_id: i64,
    pub status: TaskStatus,
    pub completed_ts: Option<i64>,
}

/// A candidate group along with the authority it resolved to for the
/// resource being submitted.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub struct ChainStep {
    pub group_id: i64,
    pub authority: Authority,
}

/// The ordered steps for a submission, in the order of the configured
/// candidate groups.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Chain(Vec<ChainStep>);
