use async_trait::async_trait;
use crate::error::BackendError;
use super::{
    Authority,
    group::Group,
    permission::ResourcePermission,
    user::{
        User,
        Users,
    },
};

#[async_trait]
pub trait UserBackend {
    async fn add_user(
        &self,
        name: &str,
        email: Option<&str>,
        user_type: &str,
    ) -> Result<i64, BackendError>;
    async fn get_user_by_id(
        &self,
        id: i64,
    ) -> Result<Option<User>, BackendError>;
    async fn get_user_by_name(
        &self,
        name: &str,
    ) -> Result<Option<User>, BackendError>;
}

#[async_trait]
pub trait GroupBackend {
    async fn add_group(
        &self,
        name: &str,
        email: Option<&str>,
    ) -> Result<i64, BackendError>;
    /// Returns the group with its members loaded.
    async fn get_group_by_id(
        &self,
        id: i64,
    ) -> Result<Option<Group>, BackendError>;
    /// Returns the group with its members loaded.
    async fn get_group_by_name(
        &self,
        name: &str,
    ) -> Result<Option<Group>, BackendError>;
    async fn add_group_member(
        &self,
        group_id: i64,
        user_id: i64,
    ) -> Result<bool, BackendError>;
    async fn remove_group_member(
        &self,
        group_id: i64,
        user_id: i64,
    ) -> Result<bool, BackendError>;
    async fn get_group_members(
        &self,
        group_id: i64,
    ) -> Result<Users, BackendError>;
    async fn list_group_ids_for_user(
        &self,
        user_id: i64,
    ) -> Result<Vec<i64>, BackendError>;
}

#[async_trait]
pub trait PermissionBackend {
    /// Creates or replaces the entry for the group at the resource.
    async fn set_permission(
        &self,
        resource_id: i64,
        group_id: i64,
        authority: Authority,
    ) -> Result<(), BackendError>;
    async fn remove_permission(
        &self,
        resource_id: i64,
        group_id: i64,
    ) -> Result<bool, BackendError>;
    /// The entries for the group restricted to the listed resources.
    async fn get_permissions_for_group(
        &self,
        group_id: i64,
        resource_ids: &[i64],
    ) -> Result<Vec<ResourcePermission>, BackendError>;
    async fn list_permissions_for_group(
        &self,
        group_id: i64,
    ) -> Result<Vec<ResourcePermission>, BackendError>;
    async fn list_permissions_for_resource(
        &self,
        resource_id: i64,
    ) -> Result<Vec<ResourcePermission>, BackendError>;
}
