//! Resource logic: authorization, uniqueness pre-checks and response
//! shaping. Handlers stay thin and delegate here.

pub mod access;
pub mod item_service;
pub mod line_item_service;
pub mod project_service;
pub mod user_service;

pub use item_service::ItemService;
pub use line_item_service::LineItemService;
pub use project_service::ProjectService;
pub use user_service::UserService;

use serde::Serialize;
use thiserror::Error;

use crate::database::repository::StoreError;
use crate::types::FieldErrors;

pub const NOT_ENOUGH_PERMISSIONS: &str = "Not enough permissions";

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    NotFound(String),

    /// Authenticated but neither owner nor superuser
    #[error("Not enough permissions")]
    PermissionDenied,

    /// Uniqueness pre-check or constraint failure, reported as 400
    #[error("{0}")]
    Conflict(String),

    /// Account-management refusals, reported as 403
    #[error("{0}")]
    Forbidden(String),

    /// Uniqueness failure on account updates, reported as 409
    #[error("{0}")]
    Duplicate(String),

    #[error("Validation failed")]
    Validation(FieldErrors),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<FieldErrors> for ServiceError {
    fn from(errors: FieldErrors) -> Self {
        ServiceError::Validation(errors)
    }
}

/// List envelope: one page of rows plus the total matching count
#[derive(Debug, Clone, Serialize)]
pub struct Listing<T> {
    pub data: Vec<T>,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}
