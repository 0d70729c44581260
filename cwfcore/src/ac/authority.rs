use serde::{Deserialize, Serialize};

/// The standing a group holds on a resource.
///
/// Variants are declared in ascending order of authority so that the
/// derived ordering may be used for threshold comparisons.
#[derive(
    Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd,
    Deserialize, Serialize,
)]
pub enum Authority {
    // also the catch-all when infallable conversion is required
    #[default]
    None,
    Review,
    Approve,
    Admin,
}

mod impls;
