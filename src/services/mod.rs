//! Business logic layer.
//!
//! Services coordinate the repositories, apply the authorization-adjacent
//! business rules (orphan cleanup, all-or-nothing author resolution, the
//! rate-submission protocol) and own the transaction boundaries.

pub mod account;
pub mod catalog;
pub mod rating;

pub use account::AccountService;
pub use catalog::CatalogService;
