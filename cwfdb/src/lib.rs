use cwfcore::platform::{
    ConnectorOption,
    WorkflowPlatform,
};
#[cfg(feature = "sqlite")]
use cwfdb_sqlite::SqliteBackend;
use std::sync::Arc;

pub struct Backend;

#[derive(Clone, Debug, PartialEq)]
pub struct Error(String);

#[derive(Debug)]
enum BackendKind {
    Sqlite,
}

mod display {
    use super::{BackendKind, Error};
    use std::fmt::{Display, Formatter, Result};

    impl Display for BackendKind {
        fn fmt(&self, f: &mut Formatter<'_>) -> Result {
            match self {
                Self::Sqlite => "sqlite".fmt(f),
            }
        }
    }

    impl Display for Error {
        fn fmt(&self, f: &mut Formatter<'_>) -> Result {
            self.0.fmt(f)
        }
    }

    impl std::error::Error for Error {}
}

impl TryFrom<&str> for BackendKind {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.split(':').next() {
            Some("sqlite") => Ok(BackendKind::Sqlite),
            _ => Err(Error(format!("The connection string {s:?} is unsupported.")))
        }
    }
}

impl Backend {
    /// Connects to the workflow platform identified by the connection
    /// string, bringing its schema up to date.
    pub async fn wf(
        opts: ConnectorOption,
    ) -> Result<Arc<dyn WorkflowPlatform>, Box<dyn std::error::Error + Send + Sync + 'static>> {
        let url = opts.url.clone();
        match BackendKind::try_from(url.as_str()) {
            #[cfg(feature = "sqlite")]
            Ok(BackendKind::Sqlite) => {
                log::debug!("connecting to sqlite workflow platform at {url}");
                Ok(Arc::new(SqliteBackend::wf(opts).await?))
            }
            #[cfg(not(feature = "sqlite"))]
            Ok(s) => Err(Box::new(Error(format!(
                "The feature {s:?} must be enabled for cwfdb in order to connect to {url:?}"
            )))),
            Err(e) => Err(Box::new(e)),
        }
    }
}
