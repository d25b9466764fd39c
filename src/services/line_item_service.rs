use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::auth::Principal;
use crate::database::models::{LineItem, LineItemCreate, LineItemUpdate};
use crate::database::repository::{LineItemRepository, Page, StoreError};

use super::access::require_superuser;
use super::{Listing, Message, ServiceError};

pub const NOT_FOUND: &str = "Line item not found";
pub const CODE_EXISTS: &str = "Code already exists";

/// Global catalog: readable by anyone authenticated, writable by superusers.
pub struct LineItemService {
    repo: Arc<dyn LineItemRepository>,
}

/// The unique index is the final word; losing the check-then-insert race
/// must look exactly like failing the pre-check.
fn code_conflict(err: StoreError) -> ServiceError {
    match err {
        StoreError::UniqueViolation(_) => ServiceError::Conflict(CODE_EXISTS.to_string()),
        other => ServiceError::Store(other),
    }
}

impl LineItemService {
    pub fn new(repo: Arc<dyn LineItemRepository>) -> Self {
        Self { repo }
    }

    pub async fn list(&self, page: Page) -> Result<Listing<LineItem>, ServiceError> {
        let count = self.repo.count().await?;
        let data = self.repo.list(page).await?;
        Ok(Listing { data, count })
    }

    pub async fn get(&self, id: Uuid) -> Result<LineItem, ServiceError> {
        self.repo
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(NOT_FOUND.to_string()))
    }

    pub async fn create(
        &self,
        principal: &Principal,
        input: LineItemCreate,
    ) -> Result<LineItem, ServiceError> {
        require_superuser(principal)?;
        input.validate()?;

        if let Some(code) = input.code.as_deref() {
            self.ensure_code_free(code).await?;
        }

        let item = self.repo.insert(&input).await.map_err(code_conflict)?;
        info!(line_item_id = %item.id, code = ?item.code, "line item created");
        Ok(item)
    }

    pub async fn update(
        &self,
        principal: &Principal,
        id: Uuid,
        patch: LineItemUpdate,
    ) -> Result<LineItem, ServiceError> {
        require_superuser(principal)?;
        let existing = self.get(id).await?;
        patch.validate()?;

        if let Some(code) = patch.new_code() {
            if existing.code.as_deref() != Some(code) {
                self.ensure_code_free(code).await?;
            }
        }

        let item = self
            .repo
            .update(id, &patch)
            .await
            .map_err(code_conflict)?
            .ok_or_else(|| ServiceError::NotFound(NOT_FOUND.to_string()))?;
        info!(line_item_id = %item.id, "line item updated");
        Ok(item)
    }

    pub async fn delete(&self, principal: &Principal, id: Uuid) -> Result<Message, ServiceError> {
        require_superuser(principal)?;
        if !self.repo.delete(id).await? {
            return Err(ServiceError::NotFound(NOT_FOUND.to_string()));
        }
        info!(line_item_id = %id, "line item deleted");
        Ok(Message::new("Line item deleted successfully"))
    }

    async fn ensure_code_free(&self, code: &str) -> Result<(), ServiceError> {
        if self.repo.find_by_code(code).await?.is_some() {
            return Err(ServiceError::Conflict(CODE_EXISTS.to_string()));
        }
        Ok(())
    }
}
