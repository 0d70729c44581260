use crate::error::ValueError;
use super::*;

impl Group {
    pub fn members(&self) -> Result<&Users, ValueError> {
        self.members.as_ref().ok_or(ValueError::Uninitialized)
    }

    /// Membership check against the loaded members; a group without its
    /// members loaded has none.
    pub fn is_member(&self, user_id: i64) -> bool {
        self.members.as_ref()
            .map(|members| members.iter().any(|user| user.id == user_id))
            .unwrap_or(false)
    }

    /// Comma separated names of the members, for display alongside the
    /// group name.
    pub fn users_summary(&self) -> String {
        self.members.as_ref()
            .map(|members| members.iter()
                .map(|user| user.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
            )
            .unwrap_or_default()
    }
}
