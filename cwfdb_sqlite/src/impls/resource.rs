use async_trait::async_trait;
use cwfcore::{
    error::BackendError,
    resource::{
        Resource,
        traits::ResourceBackend,
    },
};
use sqlx::{
    Row,
    sqlite::SqliteRow,
};

use crate::SqliteBackend;

async fn add_resource_sqlite(
    backend: &SqliteBackend,
    name: &str,
    parent_id: Option<i64>,
) -> Result<i64, BackendError> {
    let id = sqlx::query(
        r#"
INSERT INTO resource (
    name,
    parent_id
)
VALUES ( ?1, ?2 )
        "#,
    )
    .bind(name)
    .bind(parent_id)
    .execute(&*backend.pool)
    .await?
    .last_insert_rowid();
    Ok(id)
}

async fn get_resource_sqlite(
    backend: &SqliteBackend,
    id: i64,
) -> Result<Option<Resource>, BackendError> {
    let rec = sqlx::query(r#"
SELECT
    id,
    name,
    parent_id
FROM
    resource
WHERE
    id = ?1
        "#,
    )
    .bind(id)
    .try_map(|row: SqliteRow| Ok(Resource {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        parent_id: row.try_get("parent_id")?,
    }))
    .fetch_optional(&*backend.pool)
    .await?;
    Ok(rec)
}

#[async_trait]
impl ResourceBackend for SqliteBackend {
    async fn add_resource(
        &self,
        name: &str,
        parent_id: Option<i64>,
    ) -> Result<i64, BackendError> {
        add_resource_sqlite(&self, name, parent_id).await
    }

    async fn get_resource(
        &self,
        id: i64,
    ) -> Result<Option<Resource>, BackendError> {
        get_resource_sqlite(&self, id).await
    }
}
