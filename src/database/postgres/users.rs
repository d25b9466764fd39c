use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use super::PgStore;
use crate::database::models::{User, UserCreate, UserUpdate};
use crate::database::repository::{Page, StoreError, UserRepository};

const COLUMNS: &str = "id, email, full_name, is_active, is_superuser, created_at";

#[async_trait]
impl UserRepository for PgStore {
    async fn count(&self) -> Result<i64, StoreError> {
        sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::from_sqlx)
    }

    async fn list(&self, page: Page) -> Result<Vec<User>, StoreError> {
        let sql = format!("SELECT {COLUMNS} FROM users OFFSET $1 LIMIT $2");
        sqlx::query_as::<_, User>(&sql)
            .bind(page.skip)
            .bind(page.limit)
            .fetch_all(&self.pool)
            .await
            .map_err(StoreError::from_sqlx)
    }

    async fn get(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::from_sqlx)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::from_sqlx)
    }

    async fn insert(&self, input: &UserCreate) -> Result<User, StoreError> {
        let sql = format!(
            "INSERT INTO users (id, email, full_name, is_active, is_superuser) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(Uuid::new_v4())
            .bind(&input.email)
            .bind(&input.full_name)
            .bind(input.is_active)
            .bind(input.is_superuser)
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::from_sqlx)
    }

    async fn update(&self, id: Uuid, patch: &UserUpdate) -> Result<Option<User>, StoreError> {
        if patch.is_empty() {
            return UserRepository::get(self, id).await;
        }

        let mut qb = QueryBuilder::<Postgres>::new("UPDATE users SET ");
        let mut set = qb.separated(", ");
        if let Some(email) = patch.email.value() {
            set.push("email = ");
            set.push_bind_unseparated(email.clone());
        }
        if let Some(full_name) = patch.full_name.as_change() {
            set.push("full_name = ");
            set.push_bind_unseparated(full_name.cloned());
        }
        if let Some(is_active) = patch.is_active.value() {
            set.push("is_active = ");
            set.push_bind_unseparated(*is_active);
        }
        if let Some(is_superuser) = patch.is_superuser.value() {
            set.push("is_superuser = ");
            set.push_bind_unseparated(*is_superuser);
        }
        qb.push(" WHERE id = ");
        qb.push_bind(id);
        qb.push(format!(" RETURNING {COLUMNS}"));

        qb.build_query_as::<User>()
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::from_sqlx)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        // items and projects go with it via ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(StoreError::from_sqlx)?;
        Ok(result.rows_affected() > 0)
    }
}
