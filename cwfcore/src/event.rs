use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::{
    error::NotifyError,
    workflow::ActionType,
};

mod impls;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Deserialize, Serialize)]
pub enum EventKind {
    InstanceSubmitted,
    TaskApproved,
    TaskRejected,
    InstanceApproved,
    InstanceRejected,
    InstanceCancelled,
}

/// A domain event raised once the state change it describes has been
/// committed to the store.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct WorkflowEvent {
    pub kind: EventKind,
    pub instance_id: i64,
    pub task_id: Option<i64>,
    pub resource_id: i64,
    pub action: ActionType,
    pub actor_id: i64,
    pub group_id: Option<i64>,
    pub comment: Option<String>,
    pub ts: i64,
}

/// Hands events over to whatever is responsible for delivering them.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn emit(&self, event: &WorkflowEvent) -> Result<(), NotifyError>;
}

/// A notifier that only records events in the log.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNotifier;
