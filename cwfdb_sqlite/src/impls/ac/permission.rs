use async_trait::async_trait;
use cwfcore::{
    ac::{
        Authority,
        permission::ResourcePermission,
        traits::PermissionBackend,
    },
    error::BackendError,
};
use sqlx::{
    QueryBuilder,
    Row,
    Sqlite,
    sqlite::SqliteRow,
};

use crate::{
    SqliteBackend,
    impls::decode_str,
};

fn permission_from_row(row: SqliteRow) -> Result<ResourcePermission, sqlx::Error> {
    Ok(ResourcePermission {
        id: row.try_get("id")?,
        resource_id: row.try_get("resource_id")?,
        group_id: row.try_get("group_id")?,
        authority: decode_str(row.try_get("authority")?)?,
    })
}

async fn set_permission_sqlite(
    backend: &SqliteBackend,
    resource_id: i64,
    group_id: i64,
    authority: Authority,
) -> Result<(), BackendError> {
    sqlx::query(
        r#"
INSERT INTO resource_permission (
    resource_id,
    group_id,
    authority
)
VALUES ( ?1, ?2, ?3 )
ON CONFLICT (resource_id, group_id)
DO UPDATE SET
    authority = excluded.authority
        "#,
    )
    .bind(resource_id)
    .bind(group_id)
    .bind(<&'static str>::from(authority))
    .execute(&*backend.pool)
    .await?;
    Ok(())
}

async fn remove_permission_sqlite(
    backend: &SqliteBackend,
    resource_id: i64,
    group_id: i64,
) -> Result<bool, BackendError> {
    let rows = sqlx::query(
        r#"
DELETE FROM
    resource_permission
WHERE
    resource_id = ?1
    AND group_id = ?2
        "#,
    )
    .bind(resource_id)
    .bind(group_id)
    .execute(&*backend.pool)
    .await?
    .rows_affected();
    Ok(rows > 0)
}

async fn get_permissions_for_group_sqlite(
    backend: &SqliteBackend,
    group_id: i64,
    resource_ids: &[i64],
) -> Result<Vec<ResourcePermission>, BackendError> {
    if resource_ids.is_empty() {
        return Ok(Vec::new());
    }
    let mut query_builder: QueryBuilder<Sqlite> = QueryBuilder::new(r#"
SELECT
    id,
    resource_id,
    group_id,
    authority
FROM
    resource_permission
WHERE
    group_id = "#);
    query_builder.push_bind(group_id);
    query_builder.push(" AND resource_id IN (");

    let mut separated = query_builder.separated(", ");
    for id in resource_ids.iter() {
        separated.push_bind(id);
    }
    separated.push_unseparated(")");

    let recs = query_builder
        .build()
        .try_map(permission_from_row)
        .fetch_all(&*backend.pool)
        .await?;
    Ok(recs)
}

async fn list_permissions_for_group_sqlite(
    backend: &SqliteBackend,
    group_id: i64,
) -> Result<Vec<ResourcePermission>, BackendError> {
    let recs = sqlx::query(r#"
SELECT
    id,
    resource_id,
    group_id,
    authority
FROM
    resource_permission
WHERE
    group_id = ?1
ORDER BY
    resource_id
        "#,
    )
    .bind(group_id)
    .try_map(permission_from_row)
    .fetch_all(&*backend.pool)
    .await?;
    Ok(recs)
}

async fn list_permissions_for_resource_sqlite(
    backend: &SqliteBackend,
    resource_id: i64,
) -> Result<Vec<ResourcePermission>, BackendError> {
    let recs = sqlx::query(r#"
SELECT
    id,
    resource_id,
    group_id,
    authority
FROM
    resource_permission
WHERE
    resource_id = ?1
ORDER BY
    group_id
        "#,
    )
    .bind(resource_id)
    .try_map(permission_from_row)
    .fetch_all(&*backend.pool)
    .await?;
    Ok(recs)
}

#[async_trait]
impl PermissionBackend for SqliteBackend {
    async fn set_permission(
        &self,
        resource_id: i64,
        group_id: i64,
        authority: Authority,
    ) -> Result<(), BackendError> {
        set_permission_sqlite(&self, resource_id, group_id, authority).await
    }

    async fn remove_permission(
        &self,
        resource_id: i64,
        group_id: i64,
    ) -> Result<bool, BackendError> {
        remove_permission_sqlite(&self, resource_id, group_id).await
    }

    async fn get_permissions_for_group(
        &self,
        group_id: i64,
        resource_ids: &[i64],
    ) -> Result<Vec<ResourcePermission>, BackendError> {
        get_permissions_for_group_sqlite(&self, group_id, resource_ids).await
    }

    async fn list_permissions_for_group(
        &self,
        group_id: i64,
    ) -> Result<Vec<ResourcePermission>, BackendError> {
        list_permissions_for_group_sqlite(&self, group_id).await
    }

    async fn list_permissions_for_resource(
        &self,
        resource_id: i64,
    ) -> Result<Vec<ResourcePermission>, BackendError> {
        list_permissions_for_resource_sqlite(&self, resource_id).await
    }
}
