use cwfcore::ac::user::DEFAULT_ADMIN_USER_TYPES;
use crate::{
    error::Error,
    gate::Gate,
};

/// Builds the authorization [`Gate`].
///
/// Methods can be chained in order to set the configuration values.
/// The `Gate` is constructed by calling [`build`](Builder::build).
///
/// `Builder::new` provides the default admin user types with the admin
/// override enabled.
#[derive(Clone, Debug)]
pub struct Builder {
    admin_user_types: Vec<String>,
    admin_override: bool,
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            admin_user_types: DEFAULT_ADMIN_USER_TYPES.iter()
                .map(|s| s.to_string())
                .collect(),
            admin_override: true,
        }
    }
}

impl Builder {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn admin_user_types<I, S>(mut self, val: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.admin_user_types = val.into_iter()
            .map(Into::into)
            .collect();
        self
    }

    pub fn admin_override(mut self, val: bool) -> Self {
        self.admin_override = val;
        self
    }

    pub fn build(&self) -> Result<Gate, Error> {
        log::trace!("building a Gate for admin types {:?}", self.admin_user_types);
        if self.admin_override && self.admin_user_types.is_empty() {
            return Err(Error::AdminTypesRequired);
        }
        Ok(Gate {
            admin_user_types: self.admin_user_types.clone(),
            admin_override: self.admin_override,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn build() -> anyhow::Result<()> {
        Builder::new().build()?;
        let empty: [&str; 0] = [];
        assert!(matches!(
            Builder::new().admin_user_types(empty).build(),
            Err(Error::AdminTypesRequired),
        ));
        Builder::new()
            .admin_user_types(empty)
            .admin_override(false)
            .build()?;
        Ok(())
    }
}
