pub mod ac;
pub mod clock;
pub mod error;
pub mod event;
pub mod platform;
pub mod resource;
#[cfg(feature = "display")]
pub mod summary;
pub mod text;
pub mod workflow;
