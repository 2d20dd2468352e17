//! HTTP surface: router assembly, request extraction and handlers.

pub mod extract;
pub mod handlers;
pub mod routes;

pub use routes::create_router;
