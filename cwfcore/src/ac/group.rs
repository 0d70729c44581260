use serde::{Deserialize, Serialize};
use crate::ac::user::Users;

/// A named set of users that may act on the workflow tasks assigned to
/// the group.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Group {
    pub id: i64,
    pub name: String,
    /// Address used when notifying the group as a whole.
    pub email: Option<String>,
    pub created_ts: i64,

    pub members: Option<Users>,
}

mod impls;
