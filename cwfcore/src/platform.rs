use async_trait::async_trait;
use crate::{
    ac::traits::{
        GroupBackend,
        PermissionBackend,
        UserBackend,
    },
    resource::traits::ResourceBackend,
    workflow::traits::{
        ApproverMappingBackend,
        WorkflowBackend,
    },
};

mod connector;
pub use connector::ConnectorOption;

pub trait PlatformUrl {
    fn url(&self) -> &str;
}

/// WorkflowPlatform - Workflow Platform
///
/// This platform persists everything the approval workflow engine
/// consumes: the identity and resource collaborators, the permissions
/// bound to resources, the approver mapping, and the workflow records
/// themselves.
///
/// This trait is applicable to everything that correctly implements the
/// relevant backends that compose this trait.
#[async_trait]
pub trait WorkflowPlatform: UserBackend
    + GroupBackend
    + PermissionBackend
    + ResourceBackend
    + ApproverMappingBackend
    + WorkflowBackend

    + PlatformUrl

    + Send
    + Sync
{
    fn as_dyn(&self) -> &dyn WorkflowPlatform;
}

pub trait DefaultWorkflowPlatform: WorkflowPlatform {}

impl<P: UserBackend
    + GroupBackend
    + PermissionBackend
    + ResourceBackend
    + ApproverMappingBackend
    + WorkflowBackend

    + PlatformUrl

    + DefaultWorkflowPlatform

    + Send
    + Sync
> WorkflowPlatform for P {
    fn as_dyn(&self) -> &(dyn WorkflowPlatform) {
        self
    }
}
