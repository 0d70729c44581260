use serde::{Deserialize, Serialize};

/// A node of the content tree that workflows are submitted against.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub struct Resource {
    pub id: i64,
    pub name: String,
    pub parent_id: Option<i64>,
}

/// The path from a resource up to the root of its tree, with the
/// resource itself first and the root last.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Ancestry(Vec<Resource>);

mod impls;
pub mod traits;
