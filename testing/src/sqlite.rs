use cwfdb_sqlite::SqliteBackend;

pub async fn create_sqlite_backend() -> anyhow::Result<SqliteBackend> {
    Ok(SqliteBackend::wf("sqlite::memory:".into()).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[async_std::test]
    async fn smoke_test_create_backend() -> anyhow::Result<()> {
        create_sqlite_backend().await?;
        Ok(())
    }
}
