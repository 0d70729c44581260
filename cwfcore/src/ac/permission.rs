use serde::{Deserialize, Serialize};
use crate::ac::Authority;

/// Binds a group to a node of the resource tree with some authority.
///
/// The binding applies to the node and, unless overridden by a nearer
/// binding for the same group, to every descendant of the node.
#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd, Deserialize, Serialize)]
pub struct ResourcePermission {
    pub id: i64,
    pub resource_id: i64,
    pub group_id: i64,
    pub authority: Authority,
}
