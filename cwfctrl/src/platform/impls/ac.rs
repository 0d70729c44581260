use cwfcore::{
    ac::{
        group::Group,
        traits::{
            GroupBackend,
            UserBackend,
        },
        user::User,
    },
    text::is_valid_email_address,
};

use crate::{
    error::Error,
    platform::Platform,
};

fn validate_email(email: Option<&str>) -> Result<(), Error> {
    match email {
        Some(email) if !is_valid_email_address(email) => Err(Error::Validation(
            format!("invalid email address: {email:?}")
        )),
        _ => Ok(()),
    }
}

fn validate_name(kind: &str, name: &str) -> Result<(), Error> {
    if name.trim().is_empty() {
        Err(Error::Validation(format!("{kind} name must not be empty")))
    } else {
        Ok(())
    }
}

impl Platform {
    pub async fn add_user(
        &self,
        name: &str,
        email: Option<&str>,
        user_type: &str,
    ) -> Result<User, Error> {
        validate_name("user", name)?;
        validate_email(email)?;
        let id = self.db.add_user(name, email, user_type).await?;
        log::info!("added user {name:?} as id {id}");
        self.get_user(id).await
    }

    pub async fn get_user(&self, id: i64) -> Result<User, Error> {
        self.db.get_user_by_id(id).await?
            .ok_or_else(|| Error::NotFound(format!("user {id}")))
    }

    pub async fn get_user_by_name(&self, name: &str) -> Result<User, Error> {
        self.db.get_user_by_name(name).await?
            .ok_or_else(|| Error::NotFound(format!("user {name:?}")))
    }

    pub fn is_admin(&self, user: &User) -> bool {
        self.gate.is_admin(user)
    }

    pub async fn add_group(
        &self,
        name: &str,
        email: Option<&str>,
    ) -> Result<Group, Error> {
        validate_name("group", name)?;
        validate_email(email)?;
        let id = self.db.add_group(name, email).await?;
        log::info!("added group {name:?} as id {id}");
        self.get_group(id).await
    }

    /// Returns the group with its members.
    pub async fn get_group(&self, id: i64) -> Result<Group, Error> {
        self.db.get_group_by_id(id).await?
            .ok_or_else(|| Error::NotFound(format!("group {id}")))
    }

    pub async fn get_group_by_name(&self, name: &str) -> Result<Group, Error> {
        self.db.get_group_by_name(name).await?
            .ok_or_else(|| Error::NotFound(format!("group {name:?}")))
    }

    pub async fn add_group_member(
        &self,
        group_id: i64,
        user_id: i64,
    ) -> Result<bool, Error> {
        self.get_group(group_id).await?;
        self.get_user(user_id).await?;
        Ok(self.db.add_group_member(group_id, user_id).await?)
    }

    pub async fn remove_group_member(
        &self,
        group_id: i64,
        user_id: i64,
    ) -> Result<bool, Error> {
        Ok(self.db.remove_group_member(group_id, user_id).await?)
    }

    pub async fn list_groups_for_user(&self, user_id: i64) -> Result<Vec<Group>, Error> {
        self.get_user(user_id).await?;
        let mut result = Vec::new();
        for id in self.db.list_group_ids_for_user(user_id).await? {
            result.push(self.get_group(id).await?);
        }
        Ok(result)
    }
}
