use sqlx::{Executor, Sqlite};

use crate::{models::Rating, Result};

pub async fn insert<'e, E>(executor: E, user_id: i64, book_id: i64, value: f64) -> Result<Rating>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rating = sqlx::query_as::<_, Rating>(
        "INSERT INTO user_ratings (user_id, book_id, rating)
         VALUES (?, ?, ?)
         RETURNING id, user_id, book_id, rating",
    )
    .bind(user_id)
    .bind(book_id)
    .bind(value)
    .fetch_one(executor)
    .await?;

    Ok(rating)
}

/// All live ratings of a book.
pub async fn for_book<'e, E>(executor: E, book_id: i64) -> Result<Vec<Rating>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let ratings = sqlx::query_as::<_, Rating>(
        "SELECT id, user_id, book_id, rating
         FROM user_ratings
         WHERE book_id = ?
         ORDER BY id",
    )
    .bind(book_id)
    .fetch_all(executor)
    .await?;

    Ok(ratings)
}

/// Just the rating values of a book, for aggregation.
pub async fn values_for_book<'e, E>(executor: E, book_id: i64) -> Result<Vec<f64>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let values =
        sqlx::query_scalar::<_, f64>("SELECT rating FROM user_ratings WHERE book_id = ?")
            .bind(book_id)
            .fetch_all(executor)
            .await?;

    Ok(values)
}

/// Drop the live rating of one (user, book) pair, if any.
pub async fn delete_for_user_and_book<'e, E>(executor: E, user_id: i64, book_id: i64) -> Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("DELETE FROM user_ratings WHERE user_id = ? AND book_id = ?")
        .bind(user_id)
        .bind(book_id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected())
}
