pub mod authority;
pub mod group;
pub mod permission;
pub mod traits;
pub mod user;

pub use self::authority::Authority;
