//! REST API module for the article CRUD surface
//!
//! - `GET /articles` - List articles
//! - `GET /articles/:id` - Get a single article
//! - `POST /articles` - Create an article (JSON or multipart with files)
//! - `PUT /articles/:id` - Update an article
//! - `DELETE /articles/:id` - Delete an article

pub mod articles;

use serde::Serialize;

/// API error response body
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
}

impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            code: "NOT_FOUND".to_string(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            code: "BAD_REQUEST".to_string(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            code: "INTERNAL_ERROR".to_string(),
        }
    }
}
