use cwfcore::{
    resource::Ancestry,
    workflow::{
        ActionType,
        Chain,
        ChainStep,
        traits::ApproverMappingBackend,
    },
};

use crate::{
    error::Error,
    platform::Platform,
};

impl Platform {
    /// Configures the ordered candidate groups for the action type,
    /// replacing any earlier configuration.
    pub async fn set_approver_mapping(
        &self,
        action: ActionType,
        group_ids: &[i64],
    ) -> Result<(), Error> {
        for (index, id) in group_ids.iter().enumerate() {
            if group_ids[..index].contains(id) {
                return Err(Error::Validation(format!(
                    "group {id} listed more than once for {action}"
                )));
            }
            self.get_group(*id).await?;
        }
        self.db.set_approver_mapping(action, group_ids).await?;
        log::info!("approver mapping for {action} set to {group_ids:?}");
        Ok(())
    }

    /// The ordered candidate groups for the action type.
    pub async fn get_approver_mapping(
        &self,
        action: ActionType,
    ) -> Result<Vec<i64>, Error> {
        match self.db.get_approver_mapping(action).await? {
            Some(group_ids) if !group_ids.is_empty() => Ok(group_ids),
            _ => Err(Error::InvalidConfiguration(format!(
                "no approver groups configured for {action}"
            ))),
        }
    }

    /// Builds the chain of steps a submission of the action on the
    /// resource would go through.
    pub async fn build_chain(
        &self,
        resource_id: i64,
        action: ActionType,
    ) -> Result<Chain, Error> {
        let ancestry = self.get_ancestry(resource_id).await?;
        self.build_chain_for(&ancestry, action).await
    }

    pub(crate) async fn build_chain_for(
        &self,
        ancestry: &Ancestry,
        action: ActionType,
    ) -> Result<Chain, Error> {
        let mut steps = Vec::new();
        for group_id in self.get_approver_mapping(action).await? {
            let authority = self.resolve_ancestry(ancestry, group_id).await?;
            steps.push(ChainStep { group_id, authority });
        }
        Ok(steps.into_iter().collect())
    }
}
