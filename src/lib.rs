//! A small book-catalog HTTP service.
//!
//! CRUD over books and authors, per-user ratings with a derived aggregate
//! rating per book, username/password authentication and a single-admin
//! authorization model.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;
pub mod state;

pub use config::Config;
pub use error::{Error, Result};
