//! Database rows and API request/response types.

pub mod author;
pub mod book;
pub mod rating;
pub mod user;

pub use author::{Author, AuthorDeletion, AuthorDetail, AuthorPayload};
pub use book::{Book, BookDetail, BookPayload, BookSummary};
pub use rating::{RatePayload, Rating};
pub use user::{LoginForm, RegisterPayload, TokenResponse, User, UserResponse};

use serde::{Deserialize, Serialize};

/// `skip`/`limit` pagination for list endpoints.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    100
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: default_limit(),
        }
    }
}

/// Generic `{"message": ...}` response body.
#[derive(Debug, Serialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
