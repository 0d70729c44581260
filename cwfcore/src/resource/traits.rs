use async_trait::async_trait;
use std::collections::HashSet;
use crate::error::BackendError;
use super::{
    Ancestry,
    Resource,
};

#[async_trait]
pub trait ResourceBackend {
    async fn add_resource(
        &self,
        name: &str,
        parent_id: Option<i64>,
    ) -> Result<i64, BackendError>;
    async fn get_resource(
        &self,
        id: i64,
    ) -> Result<Option<Resource>, BackendError>;

    /// Walks from the resource up through its parents.  Returns `None`
    /// if the resource itself does not exist.
    async fn get_ancestry(
        &self,
        id: i64,
    ) -> Result<Option<Ancestry>, BackendError> {
        let mut seen = HashSet::new();
        let mut nodes = Vec::new();
        let mut next = Some(id);
        while let Some(current) = next {
            if !seen.insert(current) {
                return Err(BackendError::AppInvariantViolation(format!(
                    "resource {id} has a cycle in its ancestry at resource {current}"
                )));
            }
            match self.get_resource(current).await? {
                Some(resource) => {
                    next = resource.parent_id;
                    nodes.push(resource);
                }
                None if nodes.is_empty() => return Ok(None),
                None => return Err(BackendError::AppInvariantViolation(format!(
                    "resource {id} has a missing ancestor {current}"
                ))),
            }
        }
        Ok(Some(nodes.into()))
    }
}
