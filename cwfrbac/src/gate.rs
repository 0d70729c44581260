use cwfcore::ac::user::User;

/// Decides whether an actor may apply a transition.
///
/// Approval and rejection of a task is reserved to the members of the
/// group the task is assigned to, while cancellation of an instance is
/// reserved to its submitter.  Global administrators may do all of the
/// above when the admin override is enabled.
#[derive(Clone, Debug)]
pub struct Gate {
    pub(crate) admin_user_types: Vec<String>,
    pub(crate) admin_override: bool,
}

/// The acting principal, along with the ids of the groups the principal
/// belongs to.
#[derive(Clone, Debug, PartialEq)]
pub struct Actor {
    pub user: User,
    pub group_ids: Vec<i64>,
    pub is_admin: bool,
}

mod impls;
