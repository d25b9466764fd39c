use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::database::models::{
    Item, ItemCreate, ItemUpdate, LineItem, LineItemCreate, LineItemUpdate, Project,
    ProjectCreate, ProjectUpdate, User, UserCreate, UserUpdate,
};

/// Failures surfaced by any repository implementation
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("Foreign key violated: {0}")]
    ForeignKeyViolation(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl StoreError {
    /// Classifies driver errors so callers can react to constraint failures.
    pub fn from_sqlx(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err {
            let constraint = db.constraint().unwrap_or_default().to_string();
            if db.is_unique_violation() {
                return StoreError::UniqueViolation(constraint);
            }
            if db.is_foreign_key_violation() {
                return StoreError::ForeignKeyViolation(constraint);
            }
        }
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                StoreError::Unavailable(err.to_string())
            }
            other => StoreError::Sqlx(other),
        }
    }
}

/// Offset pagination. No upper bound is imposed on `limit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub skip: i64,
    pub limit: i64,
}

impl Page {
    pub fn new(skip: i64, limit: i64) -> Self {
        Self { skip, limit }
    }
}

/// Which rows of an owner-scoped table a listing may include
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    All,
    OwnedBy(Uuid),
}

impl Scope {
    pub fn admits(&self, owner_id: Uuid) -> bool {
        match self {
            Scope::All => true,
            Scope::OwnedBy(id) => *id == owner_id,
        }
    }
}

#[async_trait]
pub trait LineItemRepository: Send + Sync {
    async fn count(&self) -> Result<i64, StoreError>;
    async fn list(&self, page: Page) -> Result<Vec<LineItem>, StoreError>;
    async fn get(&self, id: Uuid) -> Result<Option<LineItem>, StoreError>;
    async fn find_by_code(&self, code: &str) -> Result<Option<LineItem>, StoreError>;
    async fn insert(&self, input: &LineItemCreate) -> Result<LineItem, StoreError>;
    /// Writes only the fields present in `patch`; `None` when the row is gone.
    async fn update(&self, id: Uuid, patch: &LineItemUpdate) -> Result<Option<LineItem>, StoreError>;
    /// `false` when no row had that id.
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn count(&self, scope: Scope) -> Result<i64, StoreError>;
    async fn list(&self, scope: Scope, page: Page) -> Result<Vec<Project>, StoreError>;
    async fn get(&self, id: Uuid) -> Result<Option<Project>, StoreError>;
    async fn insert(&self, owner_id: Uuid, input: &ProjectCreate) -> Result<Project, StoreError>;
    async fn update(&self, id: Uuid, patch: &ProjectUpdate) -> Result<Option<Project>, StoreError>;
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait ItemRepository: Send + Sync {
    async fn count(&self, scope: Scope) -> Result<i64, StoreError>;
    async fn list(&self, scope: Scope, page: Page) -> Result<Vec<Item>, StoreError>;
    async fn get(&self, id: Uuid) -> Result<Option<Item>, StoreError>;
    async fn insert(&self, owner_id: Uuid, input: &ItemCreate) -> Result<Item, StoreError>;
    async fn update(&self, id: Uuid, patch: &ItemUpdate) -> Result<Option<Item>, StoreError>;
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn count(&self) -> Result<i64, StoreError>;
    async fn list(&self, page: Page) -> Result<Vec<User>, StoreError>;
    async fn get(&self, id: Uuid) -> Result<Option<User>, StoreError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn insert(&self, input: &UserCreate) -> Result<User, StoreError>;
    async fn update(&self, id: Uuid, patch: &UserUpdate) -> Result<Option<User>, StoreError>;
    /// Removes the user together with their items and projects.
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait HealthCheck: Send + Sync {
    async fn ping(&self) -> Result<(), StoreError>;
}

/// The full set of repositories a request handler may reach.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub items: Arc<dyn ItemRepository>,
    pub line_items: Arc<dyn LineItemRepository>,
    pub projects: Arc<dyn ProjectRepository>,
    pub health: Arc<dyn HealthCheck>,
}

impl Repositories {
    /// Wires every repository to one backing store.
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: UserRepository
            + ItemRepository
            + LineItemRepository
            + ProjectRepository
            + HealthCheck
            + 'static,
    {
        Self {
            users: store.clone(),
            items: store.clone(),
            line_items: store.clone(),
            projects: store.clone(),
            health: store,
        }
    }

    pub fn postgres(pool: sqlx::PgPool) -> Self {
        Self::from_store(Arc::new(crate::database::postgres::PgStore::new(pool)))
    }

    #[cfg(any(test, feature = "test-support"))]
    pub fn in_memory() -> Self {
        Self::from_store(Arc::new(crate::database::memory::MemoryStore::new()))
    }
}
