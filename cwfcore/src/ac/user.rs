use serde::{Deserialize, Serialize};

/// The user types that are treated as global workflow administrators
/// unless configured otherwise.
pub const DEFAULT_ADMIN_USER_TYPES: [&str; 2] = ["admin", "siteadmin"];

#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd, Deserialize, Serialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    /// The alias of the user type, e.g. `editor` or `admin`.
    pub user_type: String,
    pub created_ts: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Users(Vec<User>);

mod impls;
