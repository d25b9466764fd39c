pub mod manager;
pub mod models;
pub mod postgres;
pub mod repository;

#[cfg(any(test, feature = "test-support"))]
pub mod memory;

pub use manager::{DatabaseError, DatabaseManager};
pub use repository::{Page, Repositories, Scope, StoreError};
