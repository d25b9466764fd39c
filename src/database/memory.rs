//! In-process repositories for tests and local experiments.
//!
//! Mirrors the storage rules the PostgreSQL schema enforces: unique
//! `line_items.code` and `users.email`, owner foreign keys, and cascading
//! deletes from users to their items and projects. Every operation runs
//! under one lock, so check-and-insert is atomic here just as the unique
//! index makes it atomic in the database.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use crate::database::models::{
    Item, ItemCreate, ItemUpdate, LineItem, LineItemCreate, LineItemUpdate, Project,
    ProjectCreate, ProjectUpdate, User, UserCreate, UserUpdate,
};
use crate::database::repository::{
    HealthCheck, ItemRepository, LineItemRepository, Page, ProjectRepository, Scope, StoreError,
    UserRepository,
};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    items: Vec<Item>,
    line_items: Vec<LineItem>,
    projects: Vec<Project>,
}

impl Tables {
    fn user_exists(&self, id: Uuid) -> bool {
        self.users.iter().any(|u| u.id == id)
    }

    fn code_taken(&self, code: &str, except: Option<Uuid>) -> bool {
        self.line_items
            .iter()
            .any(|li| li.code.as_deref() == Some(code) && Some(li.id) != except)
    }

    fn email_taken(&self, email: &str, except: Option<Uuid>) -> bool {
        self.users
            .iter()
            .any(|u| u.email == email && Some(u.id) != except)
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>, StoreError> {
        self.tables
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }
}

fn page_of<T: Clone>(rows: impl Iterator<Item = T>, page: Page) -> Vec<T> {
    rows.skip(page.skip.max(0) as usize)
        .take(page.limit.max(0) as usize)
        .collect()
}

#[async_trait]
impl HealthCheck for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        self.tables().map(|_| ())
    }
}

#[async_trait]
impl LineItemRepository for MemoryStore {
    async fn count(&self) -> Result<i64, StoreError> {
        Ok(self.tables()?.line_items.len() as i64)
    }

    async fn list(&self, page: Page) -> Result<Vec<LineItem>, StoreError> {
        Ok(page_of(self.tables()?.line_items.iter().cloned(), page))
    }

    async fn get(&self, id: Uuid) -> Result<Option<LineItem>, StoreError> {
        Ok(self.tables()?.line_items.iter().find(|li| li.id == id).cloned())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<LineItem>, StoreError> {
        Ok(self
            .tables()?
            .line_items
            .iter()
            .find(|li| li.code.as_deref() == Some(code))
            .cloned())
    }

    async fn insert(&self, input: &LineItemCreate) -> Result<LineItem, StoreError> {
        let mut tables = self.tables()?;
        if let Some(code) = &input.code {
            if tables.code_taken(code, None) {
                return Err(StoreError::UniqueViolation("line_items_code_key".to_string()));
            }
        }
        let now = Utc::now();
        let item = LineItem {
            id: Uuid::new_v4(),
            code: input.code.clone(),
            description: input.description.clone(),
            unit: input.unit.clone(),
            unit_price: input.unit_price,
            created_at: now,
            updated_at: now,
        };
        tables.line_items.push(item.clone());
        Ok(item)
    }

    async fn update(&self, id: Uuid, patch: &LineItemUpdate) -> Result<Option<LineItem>, StoreError> {
        let mut tables = self.tables()?;
        if let Some(code) = patch.new_code() {
            if tables.code_taken(code, Some(id)) {
                return Err(StoreError::UniqueViolation("line_items_code_key".to_string()));
            }
        }
        let Some(item) = tables.line_items.iter_mut().find(|li| li.id == id) else {
            return Ok(None);
        };
        if !patch.is_empty() {
            patch.apply_to(item);
            item.updated_at = Utc::now();
        }
        Ok(Some(item.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut tables = self.tables()?;
        let before = tables.line_items.len();
        tables.line_items.retain(|li| li.id != id);
        Ok(tables.line_items.len() != before)
    }
}

#[async_trait]
impl ProjectRepository for MemoryStore {
    async fn count(&self, scope: Scope) -> Result<i64, StoreError> {
        let tables = self.tables()?;
        Ok(tables.projects.iter().filter(|p| scope.admits(p.owner_id)).count() as i64)
    }

    async fn list(&self, scope: Scope, page: Page) -> Result<Vec<Project>, StoreError> {
        let tables = self.tables()?;
        let rows = tables.projects.iter().filter(|p| scope.admits(p.owner_id)).cloned();
        Ok(page_of(rows, page))
    }

    async fn get(&self, id: Uuid) -> Result<Option<Project>, StoreError> {
        Ok(self.tables()?.projects.iter().find(|p| p.id == id).cloned())
    }

    async fn insert(&self, owner_id: Uuid, input: &ProjectCreate) -> Result<Project, StoreError> {
        let mut tables = self.tables()?;
        if !tables.user_exists(owner_id) {
            return Err(StoreError::ForeignKeyViolation("projects_owner_id_fkey".to_string()));
        }
        let now = Utc::now();
        let project = Project {
            id: Uuid::new_v4(),
            name: input.name.clone(),
            data: input.data.clone(),
            owner_id,
            created_at: now,
            updated_at: now,
        };
        tables.projects.push(project.clone());
        Ok(project)
    }

    async fn update(&self, id: Uuid, patch: &ProjectUpdate) -> Result<Option<Project>, StoreError> {
        let mut tables = self.tables()?;
        let Some(project) = tables.projects.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        if !patch.is_empty() {
            patch.apply_to(project);
            project.updated_at = Utc::now();
        }
        Ok(Some(project.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut tables = self.tables()?;
        let before = tables.projects.len();
        tables.projects.retain(|p| p.id != id);
        Ok(tables.projects.len() != before)
    }
}

#[async_trait]
impl ItemRepository for MemoryStore {
    async fn count(&self, scope: Scope) -> Result<i64, StoreError> {
        let tables = self.tables()?;
        Ok(tables.items.iter().filter(|i| scope.admits(i.owner_id)).count() as i64)
    }

    async fn list(&self, scope: Scope, page: Page) -> Result<Vec<Item>, StoreError> {
        let tables = self.tables()?;
        let rows = tables.items.iter().filter(|i| scope.admits(i.owner_id)).cloned();
        Ok(page_of(rows, page))
    }

    async fn get(&self, id: Uuid) -> Result<Option<Item>, StoreError> {
        Ok(self.tables()?.items.iter().find(|i| i.id == id).cloned())
    }

    async fn insert(&self, owner_id: Uuid, input: &ItemCreate) -> Result<Item, StoreError> {
        let mut tables = self.tables()?;
        if !tables.user_exists(owner_id) {
            return Err(StoreError::ForeignKeyViolation("items_owner_id_fkey".to_string()));
        }
        let item = Item {
            id: Uuid::new_v4(),
            title: input.title.clone(),
            description: input.description.clone(),
            owner_id,
        };
        tables.items.push(item.clone());
        Ok(item)
    }

    async fn update(&self, id: Uuid, patch: &ItemUpdate) -> Result<Option<Item>, StoreError> {
        let mut tables = self.tables()?;
        let Some(item) = tables.items.iter_mut().find(|i| i.id == id) else {
            return Ok(None);
        };
        patch.apply_to(item);
        Ok(Some(item.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut tables = self.tables()?;
        let before = tables.items.len();
        tables.items.retain(|i| i.id != id);
        Ok(tables.items.len() != before)
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn count(&self) -> Result<i64, StoreError> {
        Ok(self.tables()?.users.len() as i64)
    }

    async fn list(&self, page: Page) -> Result<Vec<User>, StoreError> {
        Ok(page_of(self.tables()?.users.iter().cloned(), page))
    }

    async fn get(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.tables()?.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.tables()?.users.iter().find(|u| u.email == email).cloned())
    }

    async fn insert(&self, input: &UserCreate) -> Result<User, StoreError> {
        let mut tables = self.tables()?;
        if tables.email_taken(&input.email, None) {
            return Err(StoreError::UniqueViolation("users_email_key".to_string()));
        }
        let user = User {
            id: Uuid::new_v4(),
            email: input.email.clone(),
            full_name: input.full_name.clone(),
            is_active: input.is_active,
            is_superuser: input.is_superuser,
            created_at: Utc::now(),
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn update(&self, id: Uuid, patch: &UserUpdate) -> Result<Option<User>, StoreError> {
        let mut tables = self.tables()?;
        if let Some(email) = patch.email.value() {
            if tables.email_taken(email, Some(id)) {
                return Err(StoreError::UniqueViolation("users_email_key".to_string()));
            }
        }
        let Some(user) = tables.users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        patch.apply_to(user);
        Ok(Some(user.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut tables = self.tables()?;
        let before = tables.users.len();
        tables.users.retain(|u| u.id != id);
        if tables.users.len() == before {
            return Ok(false);
        }
        tables.items.retain(|i| i.owner_id != id);
        tables.projects.retain(|p| p.owner_id != id);
        Ok(true)
    }
}
