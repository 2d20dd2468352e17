use sqlx::{Executor, Sqlite};

use crate::{
    models::{Author, AuthorPayload},
    Result,
};

pub async fn insert<'e, E>(executor: E, payload: &AuthorPayload) -> Result<Author>
where
    E: Executor<'e, Database = Sqlite>,
{
    let author = sqlx::query_as::<_, Author>(
        "INSERT INTO authors (name, biography)
         VALUES (?, ?)
         RETURNING id, name, biography",
    )
    .bind(&payload.name)
    .bind(&payload.biography)
    .fetch_one(executor)
    .await?;

    Ok(author)
}

/// Full replace of the mutable fields. Returns `None` if the id is unknown.
pub async fn update<'e, E>(executor: E, id: i64, payload: &AuthorPayload) -> Result<Option<Author>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let author = sqlx::query_as::<_, Author>(
        "UPDATE authors
         SET name = ?, biography = ?
         WHERE id = ?
         RETURNING id, name, biography",
    )
    .bind(&payload.name)
    .bind(&payload.biography)
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(author)
}

pub async fn find_by_id<'e, E>(executor: E, id: i64) -> Result<Option<Author>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let author =
        sqlx::query_as::<_, Author>("SELECT id, name, biography FROM authors WHERE id = ?")
            .bind(id)
            .fetch_optional(executor)
            .await?;

    Ok(author)
}

pub async fn list<'e, E>(executor: E, skip: i64, limit: i64) -> Result<Vec<Author>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let authors = sqlx::query_as::<_, Author>(
        "SELECT id, name, biography FROM authors ORDER BY id LIMIT ? OFFSET ?",
    )
    .bind(limit)
    .bind(skip)
    .fetch_all(executor)
    .await?;

    Ok(authors)
}

/// Case-insensitive substring match on name.
pub async fn search<'e, E>(executor: E, text: &str) -> Result<Vec<Author>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let authors = sqlx::query_as::<_, Author>(
        "SELECT id, name, biography
         FROM authors
         WHERE LOWER(name) LIKE '%' || LOWER(?) || '%'
         ORDER BY id",
    )
    .bind(text)
    .fetch_all(executor)
    .await?;

    Ok(authors)
}

/// Resolve a set of author ids. Missing ids are simply absent from the
/// result; callers compare counts for all-or-nothing validation.
pub async fn find_by_ids<'e, E>(executor: E, ids: &[i64]) -> Result<Vec<Author>>
where
    E: Executor<'e, Database = Sqlite>,
{
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    // SQLite has no array binds; expand one placeholder per id.
    let placeholders = vec!["?"; ids.len()].join(", ");
    let sql = format!(
        "SELECT id, name, biography FROM authors WHERE id IN ({placeholders}) ORDER BY id"
    );

    let mut query = sqlx::query_as::<_, Author>(&sql);
    for id in ids {
        query = query.bind(id);
    }

    let authors = query.fetch_all(executor).await?;
    Ok(authors)
}

/// Authors linked to a book, in link order.
pub async fn for_book<'e, E>(executor: E, book_id: i64) -> Result<Vec<Author>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let authors = sqlx::query_as::<_, Author>(
        "SELECT a.id, a.name, a.biography
         FROM authors a
         JOIN book_authors ba ON ba.author_id = a.id
         WHERE ba.book_id = ?
         ORDER BY a.id",
    )
    .bind(book_id)
    .fetch_all(executor)
    .await?;

    Ok(authors)
}

pub async fn delete<'e, E>(executor: E, id: i64) -> Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("DELETE FROM authors WHERE id = ?")
        .bind(id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected())
}
