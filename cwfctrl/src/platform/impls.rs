use cwfcore::{
    ac::traits::{
        GroupBackend,
        UserBackend,
    },
    clock::Clock,
};
use cwfrbac::Actor;

use crate::error::Error;
use super::Platform;

mod ac;
mod mapping;
mod resource;
mod workflow;

/// Trims the free text comment, treating blank comments as absent.
pub(crate) fn normalize_comment(comment: Option<&str>) -> Option<String> {
    comment
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

impl Platform {
    pub fn settings(&self) -> &super::Settings {
        &self.settings
    }

    pub(crate) fn now(&self) -> i64 {
        self.clock.now()
    }

    /// Loads the user along with the groups the user belongs to.
    pub(crate) async fn actor(&self, user_id: i64) -> Result<Actor, Error> {
        let user = self.db.get_user_by_id(user_id).await?
            .ok_or_else(|| Error::NotFound(format!("user {user_id}")))?;
        let group_ids = self.db.list_group_ids_for_user(user_id).await?;
        Ok(self.gate.actor(user, group_ids))
    }

    pub(crate) fn require_comment(
        &self,
        required: bool,
        comment: Option<&str>,
        what: &str,
    ) -> Result<Option<String>, Error> {
        let comment = normalize_comment(comment);
        if required && comment.is_none() {
            return Err(Error::Validation(format!("a comment is required to {what}")));
        }
        Ok(comment)
    }
}
