use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::book::BookSummary;

/// An `authors` row. Author names are not unique.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Author {
    pub id: i64,
    pub name: String,
    pub biography: Option<String>,
}

/// Author with its linked books, as returned by the author endpoints.
#[derive(Debug, Serialize)]
pub struct AuthorDetail {
    pub id: i64,
    pub name: String,
    pub biography: Option<String>,
    pub books: Vec<BookSummary>,
}

impl AuthorDetail {
    pub fn new(author: Author, books: Vec<BookSummary>) -> Self {
        Self {
            id: author.id,
            name: author.name,
            biography: author.biography,
            books,
        }
    }
}

/// Create/update body. PUT is a full replace of the mutable fields.
#[derive(Debug, Deserialize)]
pub struct AuthorPayload {
    pub name: String,
    pub biography: Option<String>,
}

/// Result of deleting an author, naming any books that were removed
/// because the deletion left them without authors.
#[derive(Debug, Serialize)]
pub struct AuthorDeletion {
    pub message: String,
    pub deleted_books: Vec<String>,
}
