use async_trait::async_trait;
use cwfcore::{
    ac::{
        traits::UserBackend,
        user::User,
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
    impls::conflict_on_unique,
};

pub(crate) fn user_from_row(row: SqliteRow) -> Result<User, sqlx::Error> {
    Ok(User {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        user_type: row.try_get("user_type")?,
        created_ts: row.try_get("created_ts")?,
    })
}

async fn add_user_sqlite(
    backend: &SqliteBackend,
    name: &str,
    email: Option<&str>,
    user_type: &str,
) -> Result<i64, BackendError> {
    let ts = Utc::now().timestamp();
    let id = sqlx::query(
        r#"
INSERT INTO 'user' (
    name,
    email,
    user_type,
    created_ts
)
VALUES ( ?1, ?2, ?3, ?4 )
        "#,
    )
    .bind(name)
    .bind(email)
    .bind(user_type)
    .bind(ts)
    .execute(&*backend.pool)
    .await
    .map_err(|e| conflict_on_unique(e, || format!("user {name:?} already exists")))?
    .last_insert_rowid();
    Ok(id)
}

async fn get_user_by_id_sqlite(
    backend: &SqliteBackend,
    id: i64,
) -> Result<Option<User>, BackendError> {
    let recs = sqlx::query(r#"
SELECT
    id,
    name,
    email,
    user_type,
    created_ts
FROM
    'user'
WHERE
    id = ?1
        "#,
    )
    .bind(id)
    .try_map(user_from_row)
    .fetch_optional(&*backend.pool)
    .await?;
    Ok(recs)
}

async fn get_user_by_name_sqlite(
    backend: &SqliteBackend,
    name: &str,
) -> Result<Option<User>, BackendError> {
    let recs = sqlx::query(r#"
SELECT
    id,
    name,
    email,
    user_type,
    created_ts
FROM
    'user'
WHERE
    name = ?1
        "#,
    )
    .bind(name)
    .try_map(user_from_row)
    .fetch_optional(&*backend.pool)
    .await?;
    Ok(recs)
}

#[async_trait]
impl UserBackend for SqliteBackend {
    async fn add_user(
        &self,
        name: &str,
        email: Option<&str>,
        user_type: &str,
    ) -> Result<i64, BackendError> {
        add_user_sqlite(
            &self,
            name,
            email,
            user_type,
        ).await
    }

    async fn get_user_by_id(
        &self,
        id: i64,
    ) -> Result<Option<User>, BackendError> {
        get_user_by_id_sqlite(
            &self,
            id,
        ).await
    }

    async fn get_user_by_name(
        &self,
        name: &str,
    ) -> Result<Option<User>, BackendError> {
        get_user_by_name_sqlite(
            &self,
            name,
        ).await
    }
}
