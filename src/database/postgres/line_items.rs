use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use super::PgStore;
use crate::database::models::{LineItem, LineItemCreate, LineItemUpdate};
use crate::database::repository::{LineItemRepository, Page, StoreError};

const COLUMNS: &str = "id, code, description, unit, unit_price, created_at, updated_at";

#[async_trait]
impl LineItemRepository for PgStore {
    async fn count(&self) -> Result<i64, StoreError> {
        sqlx::query_scalar("SELECT COUNT(*) FROM line_items")
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::from_sqlx)
    }

    async fn list(&self, page: Page) -> Result<Vec<LineItem>, StoreError> {
        let sql = format!("SELECT {COLUMNS} FROM line_items OFFSET $1 LIMIT $2");
        sqlx::query_as::<_, LineItem>(&sql)
            .bind(page.skip)
            .bind(page.limit)
            .fetch_all(&self.pool)
            .await
            .map_err(StoreError::from_sqlx)
    }

    async fn get(&self, id: Uuid) -> Result<Option<LineItem>, StoreError> {
        let sql = format!("SELECT {COLUMNS} FROM line_items WHERE id = $1");
        sqlx::query_as::<_, LineItem>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::from_sqlx)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<LineItem>, StoreError> {
        let sql = format!("SELECT {COLUMNS} FROM line_items WHERE code = $1 LIMIT 1");
        sqlx::query_as::<_, LineItem>(&sql)
            .bind(code)
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::from_sqlx)
    }

    async fn insert(&self, input: &LineItemCreate) -> Result<LineItem, StoreError> {
        let sql = format!(
            "INSERT INTO line_items (id, code, description, unit, unit_price) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, LineItem>(&sql)
            .bind(Uuid::new_v4())
            .bind(&input.code)
            .bind(&input.description)
            .bind(&input.unit)
            .bind(input.unit_price)
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::from_sqlx)
    }

    async fn update(&self, id: Uuid, patch: &LineItemUpdate) -> Result<Option<LineItem>, StoreError> {
        if patch.is_empty() {
            return LineItemRepository::get(self, id).await;
        }

        let mut qb = QueryBuilder::<Postgres>::new("UPDATE line_items SET ");
        let mut set = qb.separated(", ");
        set.push("updated_at = now()");
        if let Some(code) = patch.code.as_change() {
            set.push("code = ");
            set.push_bind_unseparated(code.cloned());
        }
        if let Some(description) = patch.description.value() {
            set.push("description = ");
            set.push_bind_unseparated(description.clone());
        }
        if let Some(unit) = patch.unit.value() {
            set.push("unit = ");
            set.push_bind_unseparated(unit.clone());
        }
        if let Some(price) = patch.unit_price.value() {
            set.push("unit_price = ");
            set.push_bind_unseparated(*price);
        }
        qb.push(" WHERE id = ");
        qb.push_bind(id);
        qb.push(format!(" RETURNING {COLUMNS}"));

        qb.build_query_as::<LineItem>()
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::from_sqlx)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM line_items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(StoreError::from_sqlx)?;
        Ok(result.rows_affected() > 0)
    }
}
