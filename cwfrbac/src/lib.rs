//! Permission resolution and authorization for the approval workflow.
//!
//! The [`resolver`] determines the authority a group holds over a
//! resource by walking the resource's ancestry, while the [`Gate`]
//! decides whether an actor may apply a transition to a workflow
//! instance or one of its tasks.

mod builder;
pub mod cache;
pub mod error;
pub mod gate;
pub mod resolver;

pub use builder::Builder;
pub use cache::ResolverCache;
pub use error::Denial;
pub use gate::{
    Actor,
    Gate,
};
pub use resolver::{
    PermissionIndex,
    Resolution,
};
