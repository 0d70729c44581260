use async_trait::async_trait;
use cwfcore::{
    error::BackendError,
    workflow::{
        ActionType,
        traits::ApproverMappingBackend,
    },
};
use sqlx::{
    Row,
    sqlite::SqliteRow,
};

use crate::{
    SqliteBackend,
    chrono::Utc,
};

async fn set_approver_mapping_sqlite(
    backend: &SqliteBackend,
    action: ActionType,
    group_ids: &[i64],
) -> Result<(), BackendError> {
    let action = i64::from(action);
    let ts = Utc::now().timestamp();
    let mut tx = backend.pool.begin().await?;
    sqlx::query(
        r#"
INSERT INTO approver_mapping (
    action,
    updated_ts
)
VALUES ( ?1, ?2 )
ON CONFLICT (action)
DO UPDATE SET
    updated_ts = excluded.updated_ts
        "#,
    )
    .bind(action)
    .bind(ts)
    .execute(&mut *tx)
    .await?;
    sqlx::query(
        r#"
DELETE FROM
    approver_mapping_group
WHERE
    action = ?1
        "#,
    )
    .bind(action)
    .execute(&mut *tx)
    .await?;
    for (step_index, group_id) in group_ids.iter().enumerate() {
        sqlx::query(
            r#"
INSERT INTO approver_mapping_group (
    action,
    step_index,
    group_id
)
VALUES ( ?1, ?2, ?3 )
            "#,
        )
        .bind(action)
        .bind(step_index as i64)
        .bind(group_id)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;
    Ok(())
}

async fn get_approver_mapping_sqlite(
    backend: &SqliteBackend,
    action: ActionType,
) -> Result<Option<Vec<i64>>, BackendError> {
    let action = i64::from(action);
    let exists = sqlx::query(r#"
SELECT
    action
FROM
    approver_mapping
WHERE
    action = ?1
        "#,
    )
    .bind(action)
    .fetch_optional(&*backend.pool)
    .await?
    .is_some();
    if !exists {
        return Ok(None);
    }
    let group_ids = sqlx::query(r#"
SELECT
    group_id
FROM
    approver_mapping_group
WHERE
    action = ?1
ORDER BY
    step_index
        "#,
    )
    .bind(action)
    .try_map(|row: SqliteRow| row.try_get::<i64, _>("group_id"))
    .fetch_all(&*backend.pool)
    .await?;
    Ok(Some(group_ids))
}

#[async_trait]
impl ApproverMappingBackend for SqliteBackend {
    async fn set_approver_mapping(
        &self,
        action: ActionType,
        group_ids: &[i64],
    ) -> Result<(), BackendError> {
        set_approver_mapping_sqlite(&self, action, group_ids).await
    }

    async fn get_approver_mapping(
        &self,
        action: ActionType,
    ) -> Result<Option<Vec<i64>>, BackendError> {
        get_approver_mapping_sqlite(&self, action).await
    }
}
