use cwfcore::{
    error::{
        BackendError,
        ValueError,
    },
    platform::{
        ConnectorOption,
        PlatformUrl,
    },
};
use num_enum::TryFromPrimitive;
use sqlx::{migrate::MigrateDatabase, Sqlite, SqlitePool};
use std::{
    str::FromStr,
    sync::Arc,
};

use crate::SqliteBackend;

impl PlatformUrl for SqliteBackend {
    fn url(&self) -> &str {
        self.url.as_ref()
    }
}

impl SqliteBackend {
    pub async fn connect(opts: ConnectorOption) -> Result<SqliteBackend, sqlx::Error> {
        if opts.auto_create_db && !Sqlite::database_exists(&opts.url).await.unwrap_or(false) {
            log::warn!("sqlite database {} does not exist; creating...", &opts.url);
            Sqlite::create_database(&opts.url).await?
        }

        let pool = SqlitePool::connect(&opts.url).await?;
        Ok(SqliteBackend {
            pool: Arc::new(pool),
            url: opts.url,
        })
    }

    pub async fn migrate(self) -> Result<Self, sqlx::Error> {
        sqlx::migrate!("migrations/cwf").run(&*self.pool).await?;
        Ok(self)
    }

    /// Connects to the database and brings its schema up to date.
    pub async fn wf(opts: ConnectorOption) -> Result<Self, sqlx::Error> {
        Self::connect(opts).await?
            .migrate()
            .await
    }
}

/// Decodes an integer code stored in a column.
pub(crate) fn decode_code<T>(code: i64) -> Result<T, sqlx::Error>
where
    T: TryFromPrimitive<Primitive = i64>,
{
    T::try_from_primitive(code)
        .map_err(|_| sqlx::Error::Decode(Box::new(ValueError::InvalidCode(code))))
}

/// Decodes a text value stored in a column.
pub(crate) fn decode_str<T>(value: &str) -> Result<T, sqlx::Error>
where
    T: FromStr<Err = ValueError>,
{
    T::from_str(value).map_err(|e| sqlx::Error::Decode(Box::new(e)))
}

/// Maps a unique constraint violation to a conflict, as it signifies a
/// competing write got there first.
pub(crate) fn conflict_on_unique(err: sqlx::Error, msg: impl FnOnce() -> String) -> BackendError {
    match &err {
        sqlx::Error::Database(e) if e.is_unique_violation() => {
            BackendError::Conflict(msg())
        }
        _ => BackendError::from(err),
    }
}

mod ac;
mod mapping;
mod resource;
mod workflow;

mod default_impl {
    use cwfcore::platform::DefaultWorkflowPlatform;
    use crate::SqliteBackend;

    impl DefaultWorkflowPlatform for SqliteBackend {}
}
