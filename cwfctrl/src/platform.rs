mod builder;
mod impls;
mod types;

pub use builder::Builder;
pub use types::{
    Platform,
    Settings,
};
