use cwfcore::{
    ac::permission::ResourcePermission,
    resource::Ancestry,
};
use super::*;

impl FromIterator<ResourcePermission> for PermissionIndex {
    fn from_iter<I: IntoIterator<Item=ResourcePermission>>(iter: I) -> Self {
        Self(iter.into_iter()
            .map(|entry| ((entry.resource_id, entry.group_id), entry.authority))
            .collect()
        )
    }
}

impl PermissionIndex {
    pub fn get(&self, resource_id: i64, group_id: i64) -> Option<Authority> {
        self.0.get(&(resource_id, group_id)).copied()
    }

    /// Walks the ancestry from the resource itself towards the root,
    /// stopping at the first entry for the group.
    pub fn resolve(&self, ancestry: &Ancestry, group_id: i64) -> Resolution {
        ancestry.iter()
            .find_map(|resource| self.get(resource.id, group_id)
                .map(|authority| Resolution {
                    authority,
                    source: Some(resource.id),
                })
            )
            .unwrap_or_default()
    }
}

impl From<Resolution> for Authority {
    fn from(resolution: Resolution) -> Self {
        resolution.authority
    }
}
