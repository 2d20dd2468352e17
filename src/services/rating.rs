//! Rating aggregation.
//!
//! A book's displayed rating is derived from its live per-user ratings:
//! the arithmetic mean rounded to 2 decimals, or 0.0 when no ratings
//! exist. The rounding mode is half-away-from-zero (`f64::round`).

use sqlx::SqliteConnection;

use crate::{db, Result};

/// Mean of the given rating values rounded to 2 decimals; 0.0 when empty.
pub fn aggregate(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    (mean * 100.0).round() / 100.0
}

/// Recompute a book's aggregate rating from its live ratings and persist
/// it onto the book row. Callers pass `&mut *tx` to make the recompute
/// part of a larger transaction, or a plain pool connection on the read
/// path (which lazily overwrites a possibly stale stored value).
pub async fn recompute_and_store(conn: &mut SqliteConnection, book_id: i64) -> Result<f64> {
    let values = db::ratings::values_for_book(&mut *conn, book_id).await?;
    let rating = aggregate(&values);
    db::books::update_rating(&mut *conn, book_id, rating).await?;
    Ok(rating)
}
