#[cfg(feature = "chrono")]
pub mod chrono;
pub mod clock;
#[cfg(feature = "platform")]
pub mod ctrl;
pub mod notifier;
#[cfg(feature = "sqlite")]
pub mod sqlite;

mod utils;
pub use utils::*;
