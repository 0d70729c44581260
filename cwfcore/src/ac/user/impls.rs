use std::ops::Deref;
use super::*;

impl User {
    pub fn is_type_of(&self, aliases: &[impl AsRef<str>]) -> bool {
        aliases.iter()
            .any(|alias| alias.as_ref() == self.user_type)
    }

    pub fn is_type_of_admin(&self) -> bool {
        self.is_type_of(&DEFAULT_ADMIN_USER_TYPES)
    }
}

impl From<Vec<User>> for Users {
    fn from(args: Vec<User>) -> Self {
        Self(args)
    }
}

impl<const N: usize> From<[User; N]> for Users {
    fn from(args: [User; N]) -> Self {
        Self(args.into())
    }
}

impl Deref for Users {
    type Target = Vec<User>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl IntoIterator for Users {
    type Item = User;
    type IntoIter = std::vec::IntoIter<User>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
