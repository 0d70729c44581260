use std::sync::Arc;
use test_cwf::{
    clock::FixedClock,
    sqlite::create_sqlite_backend,
};

use crate::platform::{
    Builder,
    Platform,
};

// Mirrors `test_cwf::ctrl::create_sqlite_platform`; the platform type
// that crate returns is distinct from the one compiled for the unit
// tests of this crate.
pub async fn create_sqlite_platform() -> anyhow::Result<Platform> {
    create_sqlite_platform_with(Builder::new()).await
}

pub async fn create_sqlite_platform_with(builder: Builder) -> anyhow::Result<Platform> {
    Ok(builder
        .platform(create_sqlite_backend().await?)
        .clock(Arc::new(FixedClock::default()))
        .build()
        .await?)
}
