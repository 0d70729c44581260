use cwfcore::{
    ac::{
        Authority,
        permission::ResourcePermission,
        traits::{
            GroupBackend,
            PermissionBackend,
        },
    },
    resource::{
        Ancestry,
        Resource,
        traits::ResourceBackend,
    },
};
use cwfrbac::{
    PermissionIndex,
    Resolution,
};

use crate::{
    error::Error,
    platform::Platform,
};

impl Platform {
    pub async fn add_resource(
        &self,
        name: &str,
        parent_id: Option<i64>,
    ) -> Result<Resource, Error> {
        if let Some(parent_id) = parent_id {
            self.get_resource(parent_id).await?;
        }
        let id = self.db.add_resource(name, parent_id).await?;
        log::info!("added resource {name:?} as id {id} under {parent_id:?}");
        self.get_resource(id).await
    }

    pub async fn get_resource(&self, id: i64) -> Result<Resource, Error> {
        self.db.get_resource(id).await?
            .ok_or_else(|| Error::NotFound(format!("resource {id}")))
    }

    /// The resource followed by its ancestors up to the root.
    pub async fn get_ancestry(&self, id: i64) -> Result<Ancestry, Error> {
        self.db.get_ancestry(id).await?
            .ok_or_else(|| Error::NotFound(format!("resource {id}")))
    }

    async fn ensure_group(&self, group_id: i64) -> Result<(), Error> {
        self.db.get_group_by_id(group_id).await?
            .map(|_| ())
            .ok_or_else(|| Error::NotFound(format!("group {group_id}")))
    }

    pub async fn set_permission(
        &self,
        resource_id: i64,
        group_id: i64,
        authority: Authority,
    ) -> Result<(), Error> {
        self.get_resource(resource_id).await?;
        self.ensure_group(group_id).await?;
        let result = self.db.set_permission(resource_id, group_id, authority).await;
        self.cache.invalidate();
        result?;
        log::info!("granted {authority} on resource {resource_id} to group {group_id}");
        Ok(())
    }

    pub async fn remove_permission(
        &self,
        resource_id: i64,
        group_id: i64,
    ) -> Result<bool, Error> {
        let result = self.db.remove_permission(resource_id, group_id).await;
        self.cache.invalidate();
        Ok(result?)
    }

    pub async fn list_permissions_for_resource(
        &self,
        resource_id: i64,
    ) -> Result<Vec<ResourcePermission>, Error> {
        self.get_resource(resource_id).await?;
        Ok(self.db.list_permissions_for_resource(resource_id).await?)
    }

    pub async fn list_permissions_for_group(
        &self,
        group_id: i64,
    ) -> Result<Vec<ResourcePermission>, Error> {
        self.ensure_group(group_id).await?;
        Ok(self.db.list_permissions_for_group(group_id).await?)
    }

    /// Discards every cached resolution, for use when the permission
    /// entries were changed by something other than this platform.
    pub fn clear_permission_cache(&self) {
        self.cache.invalidate();
    }

    /// Resolves the authority the group holds over the resource, along
    /// with the resource the entry that decided it is bound to.
    pub async fn resolve_with_source(
        &self,
        resource_id: i64,
        group_id: i64,
    ) -> Result<Resolution, Error> {
        let ancestry = self.get_ancestry(resource_id).await?;
        self.ensure_group(group_id).await?;
        let index: PermissionIndex = self.db
            .get_permissions_for_group(group_id, &ancestry.ids())
            .await?
            .into_iter()
            .collect();
        Ok(index.resolve(&ancestry, group_id))
    }

    pub async fn resolve(
        &self,
        resource_id: i64,
        group_id: i64,
    ) -> Result<Authority, Error> {
        if let Some(authority) = self.cache.get(resource_id, group_id) {
            return Ok(authority);
        }
        let ancestry = self.get_ancestry(resource_id).await?;
        self.ensure_group(group_id).await?;
        self.resolve_ancestry(&ancestry, group_id).await
    }

    /// Resolves against an ancestry that is already loaded, going
    /// through the cache.
    pub(crate) async fn resolve_ancestry(
        &self,
        ancestry: &Ancestry,
        group_id: i64,
    ) -> Result<Authority, Error> {
        let resource_id = ancestry.resource()?.id;
        if let Some(authority) = self.cache.get(resource_id, group_id) {
            return Ok(authority);
        }
        let ticket = self.cache.ticket();
        let index: PermissionIndex = self.db
            .get_permissions_for_group(group_id, &ancestry.ids())
            .await?
            .into_iter()
            .collect();
        let resolution = index.resolve(ancestry, group_id);
        log::trace!(
            "resolved {} for group {group_id} on resource {resource_id} from {:?}",
            resolution.authority,
            resolution.source,
        );
        self.cache.insert(ticket, resource_id, group_id, resolution.authority);
        Ok(resolution.authority)
    }
}
