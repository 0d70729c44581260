use async_trait::async_trait;
use cwfcore::{
    error::BackendError,
    workflow::{
        NewWorkflowInstance,
        TaskInstance,
        TaskInstances,
        WorkflowInstance,
        machine::Changeset,
        traits::WorkflowBackend,
    },
};
use itertools::Itertools;
use sqlx::{
    QueryBuilder,
    Row,
    Sqlite,
    sqlite::SqliteRow,
};

use crate::{
    SqliteBackend,
    impls::{
        conflict_on_unique,
        decode_code,
    },
    retry::with_retry,
};

fn instance_from_row(row: SqliteRow) -> Result<WorkflowInstance, sqlx::Error> {
    Ok(WorkflowInstance {
        id: row.try_get("id")?,
        resource_id: row.try_get("resource_id")?,
        action: decode_code(row.try_get("action")?)?,
        status: decode_code(row.try_get("status")?)?,
        submitted_by: row.try_get("submitted_by")?,
        comment: row.try_get("comment")?,
        created_ts: row.try_get("created_ts")?,
        completed_ts: row.try_get("completed_ts")?,
        tasks: None,
    })
}

fn task_from_row(row: SqliteRow) -> Result<TaskInstance, sqlx::Error> {
    Ok(TaskInstance {
        id: row.try_get("id")?,
        workflow_instance_id: row.try_get("workflow_instance_id")?,
        step_index: row.try_get("step_index")?,
        group_id: row.try_get("group_id")?,
        status: decode_code(row.try_get("status")?)?,
        actioned_by: row.try_get("actioned_by")?,
        created_ts: row.try_get("created_ts")?,
        completed_ts: row.try_get("completed_ts")?,
        comment: row.try_get("comment")?,
    })
}

const TASK_COLUMNS: &str = "
SELECT
    id,
    workflow_instance_id,
    step_index,
    group_id,
    status,
    actioned_by,
    created_ts,
    completed_ts,
    comment
FROM
    task_instance
";

async fn insert_instance_tx(
    backend: &SqliteBackend,
    instance: &NewWorkflowInstance,
) -> Result<i64, BackendError> {
    let mut tx = backend.pool.begin().await?;
    let id = sqlx::query(
        r#"
INSERT INTO workflow_instance (
    resource_id,
    action,
    status,
    submitted_by,
    comment,
    created_ts,
    completed_ts
)
VALUES ( ?1, ?2, ?3, ?4, ?5, ?6, ?7 )
        "#,
    )
    .bind(instance.resource_id)
    .bind(i64::from(instance.action))
    .bind(i64::from(instance.status))
    .bind(instance.submitted_by)
    .bind(instance.comment.as_deref())
    .bind(instance.created_ts)
    .bind(instance.completed_ts)
    .execute(&mut *tx)
    .await
    .map_err(|e| conflict_on_unique(e, || format!(
        "resource {} already has a workflow in progress",
        instance.resource_id,
    )))?
    .last_insert_rowid();

    for task in instance.tasks.iter() {
        sqlx::query(
            r#"
INSERT INTO task_instance (
    workflow_instance_id,
    step_index,
    group_id,
    status,
    created_ts,
    completed_ts
)
VALUES ( ?1, ?2, ?3, ?4, ?5, ?6 )
            "#,
        )
        .bind(id)
        .bind(task.step_index)
        .bind(task.group_id)
        .bind(i64::from(task.status))
        .bind(instance.created_ts)
        .bind(task.completed_ts)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;
    log::debug!(
        "inserted workflow instance {id} for resource {} with {} task(s)",
        instance.resource_id,
        instance.tasks.len(),
    );
    Ok(id)
}

async fn insert_instance_sqlite(
    backend: &SqliteBackend,
    instance: &NewWorkflowInstance,
) -> Result<i64, BackendError> {
    with_retry("insert_instance", || insert_instance_tx(backend, instance)).await
}

async fn list_tasks_for_instance_sqlite(
    backend: &SqliteBackend,
    workflow_instance_id: i64,
) -> Result<TaskInstances, BackendError> {
    let recs = sqlx::query(&format!("{TASK_COLUMNS}
WHERE
    workflow_instance_id = ?1
ORDER BY
    step_index
        "))
    .bind(workflow_instance_id)
    .try_map(task_from_row)
    .fetch_all(&*backend.pool)
    .await?;
    Ok(recs.into())
}

async fn get_instance_sqlite(
    backend: &SqliteBackend,
    id: i64,
) -> Result<Option<WorkflowInstance>, BackendError> {
    let instance = sqlx::query(r#"
SELECT
    id,
    resource_id,
    action,
    status,
    submitted_by,
    comment,
    created_ts,
    completed_ts
FROM
    workflow_instance
WHERE
    id = ?1
        "#,
    )
    .bind(id)
    .try_map(instance_from_row)
    .fetch_optional(&*backend.pool)
    .await?;
    Ok(match instance {
        Some(mut instance) => {
            instance.tasks = Some(list_tasks_for_instance_sqlite(backend, id).await?);
            Some(instance)
        }
        None => None,
    })
}

async fn get_task_sqlite(
    backend: &SqliteBackend,
    id: i64,
) -> Result<Option<TaskInstance>, BackendError> {
    let rec = sqlx::query(&format!("{TASK_COLUMNS}
WHERE
    id = ?1
        "))
    .bind(id)
    .try_map(task_from_row)
    .fetch_optional(&*backend.pool)
    .await?;
    Ok(rec)
}

async fn list_instances_for_resource_sqlite(
    backend: &SqliteBackend,
    resource_id: i64,
) -> Result<Vec<WorkflowInstance>, BackendError> {
    let instances = sqlx::query(r#"
SELECT
    id,
    resource_id,
    action,
    status,
    submitted_by,
    comment,
    created_ts,
    completed_ts
FROM
    workflow_instance
WHERE
    resource_id = ?1
ORDER BY
    id DESC
        "#,
    )
    .bind(resource_id)
    .try_map(instance_from_row)
    .fetch_all(&*backend.pool)
    .await?;

    let mut tasks = sqlx::query(&format!("{TASK_COLUMNS}
WHERE
    workflow_instance_id IN (
        SELECT id FROM workflow_instance WHERE resource_id = ?1
    )
ORDER BY
    workflow_instance_id,
    step_index
        "))
    .bind(resource_id)
    .try_map(task_from_row)
    .fetch_all(&*backend.pool)
    .await?
    .into_iter()
    .into_group_map_by(|task| task.workflow_instance_id);

    Ok(instances.into_iter()
        .map(|mut instance| {
            instance.tasks = Some(tasks.remove(&instance.id)
                .unwrap_or_default()
                .into());
            instance
        })
        .collect())
}

async fn list_pending_tasks_sqlite(
    backend: &SqliteBackend,
    group_ids: Option<&[i64]>,
) -> Result<TaskInstances, BackendError> {
    let mut query_builder: QueryBuilder<Sqlite> = QueryBuilder::new(TASK_COLUMNS);
    query_builder.push("WHERE status = ");
    query_builder.push_bind(i64::from(cwfcore::workflow::TaskStatus::PendingApproval));
    if let Some(group_ids) = group_ids {
        if group_ids.is_empty() {
            return Ok(TaskInstances::default());
        }
        query_builder.push(" AND group_id IN (");
        let mut separated = query_builder.separated(", ");
        for id in group_ids.iter() {
            separated.push_bind(id);
        }
        separated.push_unseparated(")");
    }
    query_builder.push(" ORDER BY created_ts, id");

    let recs = query_builder
        .build()
        .try_map(task_from_row)
        .fetch_all(&*backend.pool)
        .await?;
    Ok(recs.into())
}

async fn commit_changeset_tx(
    backend: &SqliteBackend,
    changeset: &Changeset,
) -> Result<(), BackendError> {
    let mut tx = backend.pool.begin().await?;
    // The acted upon task leads the set, so a lost race is detected by
    // the very first conditional update.
    for change in changeset.tasks.iter() {
        let rows = sqlx::query(
            r#"
UPDATE
    task_instance
SET
    status = ?1,
    actioned_by = COALESCE(?2, actioned_by),
    comment = COALESCE(?3, comment),
    completed_ts = ?4
WHERE
    id = ?5
    AND workflow_instance_id = ?6
    AND status = ?7
            "#,
        )
        .bind(i64::from(change.to))
        .bind(change.actioned_by)
        .bind(change.comment.as_deref())
        .bind(change.completed_ts)
        .bind(change.task_id)
        .bind(changeset.instance_id)
        .bind(i64::from(change.from))
        .execute(&mut *tx)
        .await?
        .rows_affected();
        if rows != 1 {
            log::debug!(
                "task {} of instance {} no longer {}; rolling back",
                change.task_id,
                changeset.instance_id,
                change.from,
            );
            return Err(BackendError::Conflict(format!(
                "task {} is no longer {}",
                change.task_id,
                change.from,
            )));
        }
    }
    if let Some(change) = &changeset.instance {
        let rows = sqlx::query(
            r#"
UPDATE
    workflow_instance
SET
    status = ?1,
    completed_ts = ?2
WHERE
    id = ?3
    AND status = ?4
            "#,
        )
        .bind(i64::from(change.to))
        .bind(change.completed_ts)
        .bind(change.instance_id)
        .bind(i64::from(change.from))
        .execute(&mut *tx)
        .await?
        .rows_affected();
        if rows != 1 {
            log::debug!(
                "workflow instance {} no longer {}; rolling back",
                change.instance_id,
                change.from,
            );
            return Err(BackendError::Conflict(format!(
                "workflow instance {} is no longer {}",
                change.instance_id,
                change.from,
            )));
        }
    }
    tx.commit().await?;
    Ok(())
}

async fn commit_changeset_sqlite(
    backend: &SqliteBackend,
    changeset: &Changeset,
) -> Result<(), BackendError> {
    with_retry("commit_changeset", || commit_changeset_tx(backend, changeset)).await
}

#[async_trait]
impl WorkflowBackend for SqliteBackend {
    async fn insert_instance(
        &self,
        instance: &NewWorkflowInstance,
    ) -> Result<i64, BackendError> {
        insert_instance_sqlite(&self, instance).await
    }

    async fn get_instance(
        &self,
        id: i64,
    ) -> Result<Option<WorkflowInstance>, BackendError> {
        get_instance_sqlite(&self, id).await
    }

    async fn get_task(
        &self,
        id: i64,
    ) -> Result<Option<TaskInstance>, BackendError> {
        get_task_sqlite(&self, id).await
    }

    async fn list_instances_for_resource(
        &self,
        resource_id: i64,
    ) -> Result<Vec<WorkflowInstance>, BackendError> {
        list_instances_for_resource_sqlite(&self, resource_id).await
    }

    async fn list_pending_tasks(
        &self,
        group_ids: Option<&[i64]>,
    ) -> Result<TaskInstances, BackendError> {
        list_pending_tasks_sqlite(&self, group_ids).await
    }

    async fn commit_changeset(
        &self,
        changeset: &Changeset,
    ) -> Result<(), BackendError> {
        commit_changeset_sqlite(&self, changeset).await
    }
}
