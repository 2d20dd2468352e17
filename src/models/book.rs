use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::{author::Author, rating::Rating};

/// A `books` row. `rating` is the stored aggregate of live user ratings.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub isbn: String,
    pub publication_year: i64,
    pub description: Option<String>,
    pub rating: f64,
}

/// Book without its associations, embedded in author details.
#[derive(Debug, Clone, Serialize)]
pub struct BookSummary {
    pub id: i64,
    pub title: String,
    pub isbn: String,
    pub publication_year: i64,
    pub description: Option<String>,
    pub rating: f64,
}

impl From<Book> for BookSummary {
    fn from(book: Book) -> Self {
        Self {
            id: book.id,
            title: book.title,
            isbn: book.isbn,
            publication_year: book.publication_year,
            description: book.description,
            rating: book.rating,
        }
    }
}

/// Book with authors and live ratings, as returned by the book endpoints.
#[derive(Debug, Serialize)]
pub struct BookDetail {
    pub id: i64,
    pub title: String,
    pub isbn: String,
    pub publication_year: i64,
    pub description: Option<String>,
    pub rating: f64,
    pub authors: Vec<Author>,
    pub user_ratings: Vec<Rating>,
}

impl BookDetail {
    pub fn new(book: Book, authors: Vec<Author>, user_ratings: Vec<Rating>) -> Self {
        Self {
            id: book.id,
            title: book.title,
            isbn: book.isbn,
            publication_year: book.publication_year,
            description: book.description,
            rating: book.rating,
            authors,
            user_ratings,
        }
    }
}

/// Create/update body. The full author set is replaced on update.
#[derive(Debug, Deserialize)]
pub struct BookPayload {
    pub title: String,
    pub isbn: String,
    pub publication_year: i64,
    pub description: Option<String>,
    pub author_ids: Vec<i64>,
}
