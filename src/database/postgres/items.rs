use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use super::PgStore;
use crate::database::models::{Item, ItemCreate, ItemUpdate};
use crate::database::repository::{ItemRepository, Page, Scope, StoreError};

const COLUMNS: &str = "id, title, description, owner_id";

fn push_scope(qb: &mut QueryBuilder<'_, Postgres>, scope: Scope) {
    if let Scope::OwnedBy(owner_id) = scope {
        qb.push(" WHERE owner_id = ");
        qb.push_bind(owner_id);
    }
}

#[async_trait]
impl ItemRepository for PgStore {
    async fn count(&self, scope: Scope) -> Result<i64, StoreError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM items");
        push_scope(&mut qb, scope);
        qb.build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::from_sqlx)
    }

    async fn list(&self, scope: Scope, page: Page) -> Result<Vec<Item>, StoreError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT {COLUMNS} FROM items"));
        push_scope(&mut qb, scope);
        qb.push(" OFFSET ");
        qb.push_bind(page.skip);
        qb.push(" LIMIT ");
        qb.push_bind(page.limit);
        qb.build_query_as::<Item>()
            .fetch_all(&self.pool)
            .await
            .map_err(StoreError::from_sqlx)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Item>, StoreError> {
        let sql = format!("SELECT {COLUMNS} FROM items WHERE id = $1");
        sqlx::query_as::<_, Item>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::from_sqlx)
    }

    async fn insert(&self, owner_id: Uuid, input: &ItemCreate) -> Result<Item, StoreError> {
        let sql = format!(
            "INSERT INTO items (id, title, description, owner_id) VALUES ($1, $2, $3, $4) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Item>(&sql)
            .bind(Uuid::new_v4())
            .bind(&input.title)
            .bind(&input.description)
            .bind(owner_id)
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::from_sqlx)
    }

    async fn update(&self, id: Uuid, patch: &ItemUpdate) -> Result<Option<Item>, StoreError> {
        if patch.is_empty() {
            return ItemRepository::get(self, id).await;
        }

        let mut qb = QueryBuilder::<Postgres>::new("UPDATE items SET ");
        let mut set = qb.separated(", ");
        if let Some(title) = patch.title.value() {
            set.push("title = ");
            set.push_bind_unseparated(title.clone());
        }
        if let Some(description) = patch.description.as_change() {
            set.push("description = ");
            set.push_bind_unseparated(description.cloned());
        }
        qb.push(" WHERE id = ");
        qb.push_bind(id);
        qb.push(format!(" RETURNING {COLUMNS}"));

        qb.build_query_as::<Item>()
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::from_sqlx)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(StoreError::from_sqlx)?;
        Ok(result.rows_affected() > 0)
    }
}
