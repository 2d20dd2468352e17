//! Data access layer.
//!
//! Plain SQL over a shared [`sqlx::SqlitePool`]. Functions are generic over
//! the executor so the same query runs against the pool or inside a
//! transaction; helpers that issue several statements take a
//! `&mut SqliteConnection` and are meant to be called with `&mut *tx`.
//!
//! Associations are fetched explicitly; there is no lazy loading.

pub mod authors;
pub mod books;
pub mod ratings;
pub mod users;
