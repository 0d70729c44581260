use async_std::task;
use cwfcore::error::BackendError;
use std::{
    future::Future,
    time::Duration,
};

/// Attempts made at an operation before transient failures are
/// surfaced as `BackendError::Unavailable`.
pub(crate) const MAX_ATTEMPTS: u32 = 3;
const BACKOFF: Duration = Duration::from_millis(25);

// SQLITE_BUSY and SQLITE_LOCKED; extended codes carry these in the low
// byte.  I/O errors are never retried as the commit may have landed.
const SQLITE_BUSY: i64 = 5;
const SQLITE_LOCKED: i64 = 6;

pub(crate) fn is_transient(err: &BackendError) -> bool {
    match err {
        BackendError::Sqlx(sqlx::Error::Database(e)) => e.code()
            .and_then(|code| code.parse::<i64>().ok())
            .map(|code| matches!(code & 0xff, SQLITE_BUSY | SQLITE_LOCKED))
            .unwrap_or(false),
        BackendError::Sqlx(sqlx::Error::PoolTimedOut) => true,
        _ => false,
    }
}

/// Runs the operation, retrying it a bounded number of times for as
/// long as it fails with a transient error.  Each attempt must be safe
/// to repeat from scratch.
pub(crate) async fn with_retry<T, F, Fut>(
    label: &str,
    mut op: F,
) -> Result<T, BackendError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, BackendError>>,
{
    let mut attempt = 1;
    loop {
        match op().await {
            Err(e) if is_transient(&e) => {
                if attempt >= MAX_ATTEMPTS {
                    log::warn!("{label}: giving up after {attempt} attempts: {e}");
                    return Err(BackendError::Unavailable(format!("{label}: {e}")));
                }
                log::debug!("{label}: attempt {attempt} failed transiently: {e}");
                task::sleep(BACKOFF * attempt).await;
                attempt += 1;
            }
            result => return result,
        }
    }
}
