use async_trait::async_trait;
use cwfcore::{
    ac::{
        group::Group,
        traits::GroupBackend,
        user::Users,
    },
    error::BackendError,
};
use sqlx::{
    Row,
    sqlite::SqliteRow,
};

use crate::{
    SqliteBackend,
    chrono::Utc,
    impls::{
        ac::user::user_from_row,
        conflict_on_unique,
    },
};

fn group_from_row(row: SqliteRow) -> Result<Group, sqlx::Error> {
    Ok(Group {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        created_ts: row.try_get("created_ts")?,
        members: None,
    })
}

async fn add_group_sqlite(
    backend: &SqliteBackend,
    name: &str,
    email: Option<&str>,
) -> Result<i64, BackendError> {
    let ts = Utc::now().timestamp();
    let id = sqlx::query(
        r#"
INSERT INTO user_group (
    name,
    email,
    created_ts
)
VALUES ( ?1, ?2, ?3 )
        "#,
    )
    .bind(name)
    .bind(email)
    .bind(ts)
    .execute(&*backend.pool)
    .await
    .map_err(|e| conflict_on_unique(e, || format!("group {name:?} already exists")))?
    .last_insert_rowid();
    Ok(id)
}

async fn get_group_members_sqlite(
    backend: &SqliteBackend,
    group_id: i64,
) -> Result<Users, BackendError> {
    let recs = sqlx::query(r#"
SELECT
    u.id AS id,
    u.name AS name,
    u.email AS email,
    u.user_type AS user_type,
    u.created_ts AS created_ts
FROM
    user_group_member AS m
JOIN
    "user" AS u ON u.id = m.user_id
WHERE
    m.group_id = ?1
ORDER BY
    u.id
        "#,
    )
    .bind(group_id)
    .try_map(user_from_row)
    .fetch_all(&*backend.pool)
    .await?;
    Ok(recs.into())
}

async fn with_members(
    backend: &SqliteBackend,
    group: Option<Group>,
) -> Result<Option<Group>, BackendError> {
    Ok(match group {
        Some(mut group) => {
            group.members = Some(get_group_members_sqlite(backend, group.id).await?);
            Some(group)
        }
        None => None,
    })
}

async fn get_group_by_id_sqlite(
    backend: &SqliteBackend,
    id: i64,
) -> Result<Option<Group>, BackendError> {
    let group = sqlx::query(r#"
SELECT
    id,
    name,
    email,
    created_ts
FROM
    user_group
WHERE
    id = ?1
        "#,
    )
    .bind(id)
    .try_map(group_from_row)
    .fetch_optional(&*backend.pool)
    .await?;
    with_members(backend, group).await
}

async fn get_group_by_name_sqlite(
    backend: &SqliteBackend,
    name: &str,
) -> Result<Option<Group>, BackendError> {
    let group = sqlx::query(r#"
SELECT
    id,
    name,
    email,
    created_ts
FROM
    user_group
WHERE
    name = ?1
        "#,
    )
    .bind(name)
    .try_map(group_from_row)
    .fetch_optional(&*backend.pool)
    .await?;
    with_members(backend, group).await
}

async fn add_group_member_sqlite(
    backend: &SqliteBackend,
    group_id: i64,
    user_id: i64,
) -> Result<bool, BackendError> {
    let rows = sqlx::query(
        r#"
INSERT OR IGNORE INTO user_group_member (
    group_id,
    user_id
)
VALUES ( ?1, ?2 )
        "#,
    )
    .bind(group_id)
    .bind(user_id)
    .execute(&*backend.pool)
    .await?
    .rows_affected();
    Ok(rows > 0)
}

async fn remove_group_member_sqlite(
    backend: &SqliteBackend,
    group_id: i64,
    user_id: i64,
) -> Result<bool, BackendError> {
    let rows = sqlx::query(
        r#"
DELETE FROM
    user_group_member
WHERE
    group_id = ?1
    AND user_id = ?2
        "#,
    )
    .bind(group_id)
    .bind(user_id)
    .execute(&*backend.pool)
    .await?
    .rows_affected();
    Ok(rows > 0)
}

async fn list_group_ids_for_user_sqlite(
    backend: &SqliteBackend,
    user_id: i64,
) -> Result<Vec<i64>, BackendError> {
    let recs = sqlx::query(r#"
SELECT
    group_id
FROM
    user_group_member
WHERE
    user_id = ?1
ORDER BY
    group_id
        "#,
    )
    .bind(user_id)
    .try_map(|row: SqliteRow| row.try_get::<i64, _>("group_id"))
    .fetch_all(&*backend.pool)
    .await?;
    Ok(recs)
}

#[async_trait]
impl GroupBackend for SqliteBackend {
    async fn add_group(
        &self,
        name: &str,
        email: Option<&str>,
    ) -> Result<i64, BackendError> {
        add_group_sqlite(&self, name, email).await
    }

    async fn get_group_by_id(
        &self,
        id: i64,
    ) -> Result<Option<Group>, BackendError> {
        get_group_by_id_sqlite(&self, id).await
    }

    async fn get_group_by_name(
        &self,
        name: &str,
    ) -> Result<Option<Group>, BackendError> {
        get_group_by_name_sqlite(&self, name).await
    }

    async fn add_group_member(
        &self,
        group_id: i64,
        user_id: i64,
    ) -> Result<bool, BackendError> {
        add_group_member_sqlite(&self, group_id, user_id).await
    }

    async fn remove_group_member(
        &self,
        group_id: i64,
        user_id: i64,
    ) -> Result<bool, BackendError> {
        remove_group_member_sqlite(&self, group_id, user_id).await
    }

    async fn get_group_members(
        &self,
        group_id: i64,
    ) -> Result<Users, BackendError> {
        get_group_members_sqlite(&self, group_id).await
    }

    async fn list_group_ids_for_user(
        &self,
        user_id: i64,
    ) -> Result<Vec<i64>, BackendError> {
        list_group_ids_for_user_sqlite(&self, user_id).await
    }
}
