use sqlx::{Executor, Sqlite};

use crate::{auth::ADMIN_USERNAME, models::User, Result};

pub async fn insert<'e, E>(
    executor: E,
    username: &str,
    email: &str,
    password_hash: &str,
) -> Result<User>
where
    E: Executor<'e, Database = Sqlite>,
{
    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (username, email, password_hash)
         VALUES (?, ?, ?)
         RETURNING id, username, email, password_hash, is_active, created_at",
    )
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .fetch_one(executor)
    .await?;

    Ok(user)
}

pub async fn find_by_username<'e, E>(executor: E, username: &str) -> Result<Option<User>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let user = sqlx::query_as::<_, User>(
        "SELECT id, username, email, password_hash, is_active, created_at
         FROM users
         WHERE username = ?",
    )
    .bind(username)
    .fetch_optional(executor)
    .await?;

    Ok(user)
}

/// All users except the reserved admin account.
pub async fn list_except_admin<'e, E>(executor: E) -> Result<Vec<User>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let users = sqlx::query_as::<_, User>(
        "SELECT id, username, email, password_hash, is_active, created_at
         FROM users
         WHERE username != ?
         ORDER BY id",
    )
    .bind(ADMIN_USERNAME)
    .fetch_all(executor)
    .await?;

    Ok(users)
}

/// Delete a user unless it is the admin account. Returns the number of rows
/// removed; 0 covers both "no such id" and "id is the admin", which callers
/// must not distinguish.
pub async fn delete_except_admin<'e, E>(executor: E, id: i64) -> Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("DELETE FROM users WHERE id = ? AND username != ?")
        .bind(id)
        .bind(ADMIN_USERNAME)
        .execute(executor)
        .await?;

    Ok(result.rows_affected())
}
