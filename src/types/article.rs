//! Article record types

use serde::{Deserialize, Serialize};

use super::is_zero;

/// A single article with optional file attachments.
///
/// Two snapshots with the same id describe the same logical article at
/// different points in time; equality of identity is by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub id: String,
    pub title: String,
    pub content: String,
    /// Stored identifiers of uploaded attachments, in upload order
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(rename = "createdAt", default, skip_serializing_if = "is_zero")]
    pub created_at: i64,
    #[serde(rename = "updatedAt", default, skip_serializing_if = "is_zero")]
    pub updated_at: i64,
}

impl Article {
    /// Create a new article snapshot without attachments
    pub fn new(id: String, title: String, content: String) -> Self {
        Self {
            id,
            title,
            content,
            files: Vec::new(),
            created_at: 0,
            updated_at: 0,
        }
    }

    /// Create a new article snapshot with attachments
    pub fn with_files(id: String, title: String, content: String, files: Vec<String>) -> Self {
        Self {
            id,
            title,
            content,
            files,
            created_at: 0,
            updated_at: 0,
        }
    }
}
