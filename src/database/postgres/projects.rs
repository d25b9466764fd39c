use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use super::PgStore;
use crate::database::models::{Project, ProjectCreate, ProjectUpdate};
use crate::database::repository::{Page, ProjectRepository, Scope, StoreError};

const COLUMNS: &str = "id, name, data, owner_id, created_at, updated_at";

/// Appends the owner filter implied by `scope`.
fn push_scope(qb: &mut QueryBuilder<'_, Postgres>, scope: Scope) {
    if let Scope::OwnedBy(owner_id) = scope {
        qb.push(" WHERE owner_id = ");
        qb.push_bind(owner_id);
    }
}

#[async_trait]
impl ProjectRepository for PgStore {
    async fn count(&self, scope: Scope) -> Result<i64, StoreError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM projects");
        push_scope(&mut qb, scope);
        qb.build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::from_sqlx)
    }

    async fn list(&self, scope: Scope, page: Page) -> Result<Vec<Project>, StoreError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT {COLUMNS} FROM projects"));
        push_scope(&mut qb, scope);
        qb.push(" OFFSET ");
        qb.push_bind(page.skip);
        qb.push(" LIMIT ");
        qb.push_bind(page.limit);
        qb.build_query_as::<Project>()
            .fetch_all(&self.pool)
            .await
            .map_err(StoreError::from_sqlx)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Project>, StoreError> {
        let sql = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::from_sqlx)
    }

    async fn insert(&self, owner_id: Uuid, input: &ProjectCreate) -> Result<Project, StoreError> {
        let sql = format!(
            "INSERT INTO projects (id, name, data, owner_id) VALUES ($1, $2, $3, $4) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&sql)
            .bind(Uuid::new_v4())
            .bind(&input.name)
            .bind(&input.data)
            .bind(owner_id)
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::from_sqlx)
    }

    async fn update(&self, id: Uuid, patch: &ProjectUpdate) -> Result<Option<Project>, StoreError> {
        if patch.is_empty() {
            return ProjectRepository::get(self, id).await;
        }

        let mut qb = QueryBuilder::<Postgres>::new("UPDATE projects SET ");
        let mut set = qb.separated(", ");
        set.push("updated_at = now()");
        if let Some(name) = patch.name.value() {
            set.push("name = ");
            set.push_bind_unseparated(name.clone());
        }
        if let Some(data) = patch.data.value() {
            set.push("data = ");
            set.push_bind_unseparated(data.clone());
        }
        qb.push(" WHERE id = ");
        qb.push_bind(id);
        qb.push(format!(" RETURNING {COLUMNS}"));

        qb.build_query_as::<Project>()
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::from_sqlx)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(StoreError::from_sqlx)?;
        Ok(result.rows_affected() > 0)
    }
}
