use cwfcore::ac::Authority;
use std::collections::HashMap;

/// Explicit permission entries keyed by `(resource_id, group_id)`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PermissionIndex(HashMap<(i64, i64), Authority>);

/// The authority a group holds over a resource, along with the id of
/// the resource whose entry provided it.  A `source` of `None` means no
/// entry was found anywhere along the ancestry.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Resolution {
    pub authority: Authority,
    pub source: Option<i64>,
}

mod impls;
