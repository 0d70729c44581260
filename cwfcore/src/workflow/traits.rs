use async_trait::async_trait;
use crate::error::BackendError;
use super::{
    ActionType,
    NewWorkflowInstance,
    TaskInstance,
    TaskInstances,
    WorkflowInstance,
    machine::Changeset,
};

#[async_trait]
pub trait WorkflowBackend {
    /// Stores the instance along with its full task chain in a single
    /// transaction, returning the id of the new instance.
    ///
    /// Fails with `BackendError::Conflict` should the resource already
    /// have an instance in progress.
    async fn insert_instance(
        &self,
        instance: &NewWorkflowInstance,
    ) -> Result<i64, BackendError>;
    /// Returns the instance with its tasks loaded in step order.
    async fn get_instance(
        &self,
        id: i64,
    ) -> Result<Option<WorkflowInstance>, BackendError>;
    async fn get_task(
        &self,
        id: i64,
    ) -> Result<Option<TaskInstance>, BackendError>;
    /// Instances for the resource, most recent first, tasks loaded.
    async fn list_instances_for_resource(
        &self,
        resource_id: i64,
    ) -> Result<Vec<WorkflowInstance>, BackendError>;
    /// Tasks pending approval, restricted to the listed groups when
    /// provided.
    async fn list_pending_tasks(
        &self,
        group_ids: Option<&[i64]>,
    ) -> Result<TaskInstances, BackendError>;
    /// Applies every change in the set or none of them.  Each change is
    /// conditional on the record still holding its `from` status; any
    /// mismatch aborts the whole set with `BackendError::Conflict`.
    async fn commit_changeset(
        &self,
        changeset: &Changeset,
    ) -> Result<(), BackendError>;
}

/// Persists the ordered candidate groups configured per action type.
#[async_trait]
pub trait ApproverMappingBackend {
    async fn set_approver_mapping(
        &self,
        action: ActionType,
        group_ids: &[i64],
    ) -> Result<(), BackendError>;
    /// `None` when no mapping was ever set for the action.
    async fn get_approver_mapping(
        &self,
        action: ActionType,
    ) -> Result<Option<Vec<i64>>, BackendError>;
}
