use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::Principal;
use crate::database::models::{User, UserCreate, UserUpdate};
use crate::database::repository::{Page, StoreError, UserRepository};

use super::{Listing, Message, ServiceError};

pub const NOT_FOUND: &str = "User not found";
pub const NOT_ENOUGH_PRIVILEGES: &str = "The user doesn't have enough privileges";
pub const EMAIL_EXISTS_ON_CREATE: &str = "The user with this email already exists in the system.";
pub const EMAIL_EXISTS_ON_UPDATE: &str = "User with this email already exists";
pub const UNKNOWN_ID: &str = "The user with this id does not exist in the system";

/// Account management. Everything except reading yourself needs a superuser.
pub struct UserService {
    repo: Arc<dyn UserRepository>,
}

fn require_superuser(principal: &Principal) -> Result<(), ServiceError> {
    if principal.is_superuser {
        Ok(())
    } else {
        warn!(user_id = %principal.id, "account management requires a superuser");
        Err(ServiceError::Forbidden(NOT_ENOUGH_PRIVILEGES.to_string()))
    }
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    pub async fn me(&self, principal: &Principal) -> Result<User, ServiceError> {
        self.repo
            .get(principal.id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(NOT_FOUND.to_string()))
    }

    pub async fn list(&self, principal: &Principal, page: Page) -> Result<Listing<User>, ServiceError> {
        require_superuser(principal)?;
        let count = self.repo.count().await?;
        let data = self.repo.list(page).await?;
        Ok(Listing { data, count })
    }

    pub async fn get(&self, principal: &Principal, id: Uuid) -> Result<User, ServiceError> {
        if id == principal.id {
            return self.me(principal).await;
        }
        require_superuser(principal)?;
        self.repo
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(NOT_FOUND.to_string()))
    }

    pub async fn create(&self, principal: &Principal, input: UserCreate) -> Result<User, ServiceError> {
        require_superuser(principal)?;
        self.register(input).await
    }

    /// Unauthenticated creation used by the local-only seeding route
    pub async fn register(&self, input: UserCreate) -> Result<User, ServiceError> {
        input.validate()?;
        if self.repo.find_by_email(&input.email).await?.is_some() {
            return Err(ServiceError::Conflict(EMAIL_EXISTS_ON_CREATE.to_string()));
        }
        let user = self.repo.insert(&input).await.map_err(|err| match err {
            StoreError::UniqueViolation(_) => ServiceError::Conflict(EMAIL_EXISTS_ON_CREATE.to_string()),
            other => ServiceError::Store(other),
        })?;
        info!(user_id = %user.id, superuser = user.is_superuser, "user created");
        Ok(user)
    }

    pub async fn update(&self, principal: &Principal, id: Uuid, patch: UserUpdate) -> Result<User, ServiceError> {
        require_superuser(principal)?;
        if self.repo.get(id).await?.is_none() {
            return Err(ServiceError::NotFound(UNKNOWN_ID.to_string()));
        }
        patch.validate()?;

        if let Some(email) = patch.email.value() {
            if let Some(existing) = self.repo.find_by_email(email).await? {
                if existing.id != id {
                    return Err(ServiceError::Duplicate(EMAIL_EXISTS_ON_UPDATE.to_string()));
                }
            }
        }

        let user = self
            .repo
            .update(id, &patch)
            .await
            .map_err(|err| match err {
                StoreError::UniqueViolation(_) => ServiceError::Duplicate(EMAIL_EXISTS_ON_UPDATE.to_string()),
                other => ServiceError::Store(other),
            })?
            .ok_or_else(|| ServiceError::NotFound(UNKNOWN_ID.to_string()))?;
        info!(user_id = %user.id, "user updated");
        Ok(user)
    }

    pub async fn delete(&self, principal: &Principal, id: Uuid) -> Result<Message, ServiceError> {
        require_superuser(principal)?;
        if self.repo.get(id).await?.is_none() {
            return Err(ServiceError::NotFound(NOT_FOUND.to_string()));
        }
        if id == principal.id {
            return Err(ServiceError::Forbidden(
                "Super users are not allowed to delete themselves".to_string(),
            ));
        }
        if !self.repo.delete(id).await? {
            return Err(ServiceError::NotFound(NOT_FOUND.to_string()));
        }
        info!(user_id = %id, "user deleted with their items and projects");
        Ok(Message::new("User deleted successfully"))
    }
}
