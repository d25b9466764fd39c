use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::auth::Principal;
use crate::database::models::{Project, ProjectCreate, ProjectUpdate};
use crate::database::repository::{Page, ProjectRepository};

use super::access::authorize;
use super::{Listing, Message, ServiceError};

pub const NOT_FOUND: &str = "Project not found";

/// Owner-scoped projects. Superusers see and change all of them.
pub struct ProjectService {
    repo: Arc<dyn ProjectRepository>,
}

impl ProjectService {
    pub fn new(repo: Arc<dyn ProjectRepository>) -> Self {
        Self { repo }
    }

    /// Non-superusers only ever see their own projects; this filters, it never fails.
    pub async fn list(&self, principal: &Principal, page: Page) -> Result<Listing<Project>, ServiceError> {
        let scope = principal.scope();
        let count = self.repo.count(scope).await?;
        let data = self.repo.list(scope, page).await?;
        Ok(Listing { data, count })
    }

    pub async fn get(&self, principal: &Principal, id: Uuid) -> Result<Project, ServiceError> {
        authorize(principal, self.repo.get(id).await?, NOT_FOUND)
    }

    pub async fn create(&self, principal: &Principal, input: ProjectCreate) -> Result<Project, ServiceError> {
        input.validate()?;
        let project = self.repo.insert(principal.id, &input).await?;
        info!(project_id = %project.id, owner_id = %project.owner_id, "project created");
        Ok(project)
    }

    pub async fn update(
        &self,
        principal: &Principal,
        id: Uuid,
        patch: ProjectUpdate,
    ) -> Result<Project, ServiceError> {
        self.get(principal, id).await?;
        patch.validate()?;
        let project = self
            .repo
            .update(id, &patch)
            .await?
            .ok_or_else(|| ServiceError::NotFound(NOT_FOUND.to_string()))?;
        info!(project_id = %project.id, "project updated");
        Ok(project)
    }

    pub async fn delete(&self, principal: &Principal, id: Uuid) -> Result<Message, ServiceError> {
        self.get(principal, id).await?;
        if !self.repo.delete(id).await? {
            return Err(ServiceError::NotFound(NOT_FOUND.to_string()));
        }
        info!(project_id = %id, "project deleted");
        Ok(Message::new("Project deleted successfully"))
    }
}
