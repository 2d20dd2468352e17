use sqlx::{Executor, Sqlite, SqliteConnection};

use crate::{
    models::{Book, BookPayload},
    Result,
};

pub async fn insert<'e, E>(executor: E, payload: &BookPayload) -> Result<Book>
where
    E: Executor<'e, Database = Sqlite>,
{
    let book = sqlx::query_as::<_, Book>(
        "INSERT INTO books (title, isbn, publication_year, description)
         VALUES (?, ?, ?, ?)
         RETURNING id, title, isbn, publication_year, description, rating",
    )
    .bind(&payload.title)
    .bind(&payload.isbn)
    .bind(payload.publication_year)
    .bind(&payload.description)
    .fetch_one(executor)
    .await?;

    Ok(book)
}

/// Full replace of the mutable fields (author links are handled separately).
pub async fn update<'e, E>(executor: E, id: i64, payload: &BookPayload) -> Result<Option<Book>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let book = sqlx::query_as::<_, Book>(
        "UPDATE books
         SET title = ?, isbn = ?, publication_year = ?, description = ?
         WHERE id = ?
         RETURNING id, title, isbn, publication_year, description, rating",
    )
    .bind(&payload.title)
    .bind(&payload.isbn)
    .bind(payload.publication_year)
    .bind(&payload.description)
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(book)
}

pub async fn find_by_id<'e, E>(executor: E, id: i64) -> Result<Option<Book>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let book = sqlx::query_as::<_, Book>(
        "SELECT id, title, isbn, publication_year, description, rating
         FROM books
         WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(book)
}

pub async fn find_by_isbn<'e, E>(executor: E, isbn: &str) -> Result<Option<Book>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let book = sqlx::query_as::<_, Book>(
        "SELECT id, title, isbn, publication_year, description, rating
         FROM books
         WHERE isbn = ?",
    )
    .bind(isbn)
    .fetch_optional(executor)
    .await?;

    Ok(book)
}

pub async fn list<'e, E>(executor: E, skip: i64, limit: i64) -> Result<Vec<Book>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let books = sqlx::query_as::<_, Book>(
        "SELECT id, title, isbn, publication_year, description, rating
         FROM books
         ORDER BY id
         LIMIT ? OFFSET ?",
    )
    .bind(limit)
    .bind(skip)
    .fetch_all(executor)
    .await?;

    Ok(books)
}

/// Case-insensitive substring match on title, isbn, or the string form of
/// the publication year.
pub async fn search<'e, E>(executor: E, text: &str) -> Result<Vec<Book>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let books = sqlx::query_as::<_, Book>(
        "SELECT id, title, isbn, publication_year, description, rating
         FROM books
         WHERE LOWER(title) LIKE '%' || LOWER(?1) || '%'
            OR LOWER(isbn) LIKE '%' || LOWER(?1) || '%'
            OR CAST(publication_year AS TEXT) LIKE '%' || ?1 || '%'
         ORDER BY id",
    )
    .bind(text)
    .fetch_all(executor)
    .await?;

    Ok(books)
}

/// Persist a recomputed aggregate rating.
pub async fn update_rating<'e, E>(executor: E, id: i64, rating: f64) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query("UPDATE books SET rating = ? WHERE id = ?")
        .bind(rating)
        .bind(id)
        .execute(executor)
        .await?;

    Ok(())
}

/// Replace the full author set of a book.
pub async fn set_authors(
    conn: &mut SqliteConnection,
    book_id: i64,
    author_ids: &[i64],
) -> Result<()> {
    sqlx::query("DELETE FROM book_authors WHERE book_id = ?")
        .bind(book_id)
        .execute(&mut *conn)
        .await?;

    for author_id in author_ids {
        sqlx::query("INSERT INTO book_authors (book_id, author_id) VALUES (?, ?)")
            .bind(book_id)
            .bind(author_id)
            .execute(&mut *conn)
            .await?;
    }

    Ok(())
}

/// Remove every book link of an author.
pub async fn unlink_author<'e, E>(executor: E, author_id: i64) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query("DELETE FROM book_authors WHERE author_id = ?")
        .bind(author_id)
        .execute(executor)
        .await?;

    Ok(())
}

/// Books linked to an author.
pub async fn for_author<'e, E>(executor: E, author_id: i64) -> Result<Vec<Book>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let books = sqlx::query_as::<_, Book>(
        "SELECT b.id, b.title, b.isbn, b.publication_year, b.description, b.rating
         FROM books b
         JOIN book_authors ba ON ba.book_id = b.id
         WHERE ba.author_id = ?
         ORDER BY b.id",
    )
    .bind(author_id)
    .fetch_all(executor)
    .await?;

    Ok(books)
}

/// Ids of books linked to an author.
pub async fn ids_for_author<'e, E>(executor: E, author_id: i64) -> Result<Vec<i64>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let ids = sqlx::query_scalar::<_, i64>(
        "SELECT book_id FROM book_authors WHERE author_id = ? ORDER BY book_id",
    )
    .bind(author_id)
    .fetch_all(executor)
    .await?;

    Ok(ids)
}

pub async fn author_count<'e, E>(executor: E, book_id: i64) -> Result<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let count =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM book_authors WHERE book_id = ?")
            .bind(book_id)
            .fetch_one(executor)
            .await?;

    Ok(count)
}

/// Remove a book together with its association rows and ratings.
pub async fn delete(conn: &mut SqliteConnection, id: i64) -> Result<u64> {
    sqlx::query("DELETE FROM book_authors WHERE book_id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    sqlx::query("DELETE FROM user_ratings WHERE book_id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    let result = sqlx::query("DELETE FROM books WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected())
}
