use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::auth::Principal;
use crate::database::models::{Item, ItemCreate, ItemUpdate};
use crate::database::repository::{ItemRepository, Page};

use super::access::authorize;
use super::{Listing, Message, ServiceError};

pub const NOT_FOUND: &str = "Item not found";

/// Same ownership contract as projects.
pub struct ItemService {
    repo: Arc<dyn ItemRepository>,
}

impl ItemService {
    pub fn new(repo: Arc<dyn ItemRepository>) -> Self {
        Self { repo }
    }

    pub async fn list(&self, principal: &Principal, page: Page) -> Result<Listing<Item>, ServiceError> {
        let scope = principal.scope();
        let count = self.repo.count(scope).await?;
        let data = self.repo.list(scope, page).await?;
        Ok(Listing { data, count })
    }

    pub async fn get(&self, principal: &Principal, id: Uuid) -> Result<Item, ServiceError> {
        authorize(principal, self.repo.get(id).await?, NOT_FOUND)
    }

    pub async fn create(&self, principal: &Principal, input: ItemCreate) -> Result<Item, ServiceError> {
        input.validate()?;
        let item = self.repo.insert(principal.id, &input).await?;
        info!(item_id = %item.id, owner_id = %item.owner_id, "item created");
        Ok(item)
    }

    pub async fn update(&self, principal: &Principal, id: Uuid, patch: ItemUpdate) -> Result<Item, ServiceError> {
        self.get(principal, id).await?;
        patch.validate()?;
        let item = self
            .repo
            .update(id, &patch)
            .await?
            .ok_or_else(|| ServiceError::NotFound(NOT_FOUND.to_string()))?;
        info!(item_id = %item.id, "item updated");
        Ok(item)
    }

    pub async fn delete(&self, principal: &Principal, id: Uuid) -> Result<Message, ServiceError> {
        self.get(principal, id).await?;
        if !self.repo.delete(id).await? {
            return Err(ServiceError::NotFound(NOT_FOUND.to_string()));
        }
        info!(item_id = %id, "item deleted");
        Ok(Message::new("Item deleted successfully"))
    }
}
