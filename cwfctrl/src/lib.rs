//! The approval workflow engine.
//!
//! A [`Platform`](platform::Platform) ties the store, the authorization
//! gate, the permission cache and the notifier together, and exposes
//! the operations that drive workflow instances through their chain of
//! approval steps.

pub mod error;
pub mod notify;
pub mod platform;
#[cfg(test)]
mod testing;
