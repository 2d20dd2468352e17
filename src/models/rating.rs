use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A `user_ratings` row: one user's live rating of one book.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Rating {
    pub id: i64,
    pub user_id: i64,
    pub book_id: i64,
    pub rating: f64,
}

/// Body of `POST /books/:id/rate`.
///
/// Deserialization failures (missing or non-numeric `rating`) surface as
/// 422 through the crate's `Json` extractor; range validation happens in
/// the service and maps to 400.
#[derive(Debug, Deserialize)]
pub struct RatePayload {
    pub rating: f64,
}
