//! Book (catalog title) model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Book record from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub isbn: Option<String>,
    /// Number of copies owned
    pub total_copies: i32,
    /// Number of copies currently lendable (0..=total_copies)
    pub copies_available: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Book {
    pub fn is_available(&self) -> bool {
        self.copies_available > 0
    }
}

/// Create book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,
    #[validate(length(min = 1, max = 255, message = "Author must be 1-255 characters"))]
    pub author: String,
    #[validate(length(min = 1, max = 13, message = "ISBN must be 1-13 characters"))]
    pub isbn: Option<String>,
    pub total_copies: i32,
}

/// Update book request. Availability is never set directly.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateBook {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 255, message = "Author must be 1-255 characters"))]
    pub author: Option<String>,
    #[validate(length(min = 1, max = 13, message = "ISBN must be 1-13 characters"))]
    pub isbn: Option<String>,
    pub total_copies: Option<i32>,
}

/// A validated book ready for insertion.
///
/// `copies_available` is derived from `total_copies` here and nowhere else; after
/// insertion it only moves through borrow and return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub isbn: Option<String>,
    pub total_copies: i32,
    pub copies_available: i32,
}

impl NewBook {
    pub fn new(request: CreateBook) -> AppResult<Self> {
        request.validate()?;
        validate_total_copies(request.total_copies)?;

        Ok(Self {
            title: request.title,
            author: request.author,
            isbn: request.isbn,
            total_copies: request.total_copies,
            copies_available: request.total_copies,
        })
    }
}

pub fn validate_total_copies(total_copies: i32) -> AppResult<()> {
    if total_copies <= 0 {
        return Err(AppError::Validation(
            "Total copies must be greater than zero".to_string(),
        ));
    }
    Ok(())
}
