/// Compile time assertion that the type may be shared across threads.
pub fn is_send_sync<T: Send + Sync>() {}
