//! PostgreSQL-backed repositories. One `PgStore` implements every
//! repository trait; each table's queries live in its own file.

mod items;
mod line_items;
mod projects;
mod users;

use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::repository::{HealthCheck, StoreError};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HealthCheck for PgStore {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(StoreError::from_sqlx)?;
        Ok(())
    }
}
