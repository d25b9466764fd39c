//! The single authorization rule shared by every owner-scoped router.

use crate::auth::Principal;
use crate::database::models::Owned;

use super::ServiceError;

/// Gate for catalog writes.
pub fn require_superuser(principal: &Principal) -> Result<(), ServiceError> {
    if principal.is_superuser {
        Ok(())
    } else {
        tracing::warn!(user_id = %principal.id, "superuser required");
        Err(ServiceError::PermissionDenied)
    }
}

/// Existence first, then ownership. A missing row is NotFound even for
/// callers who could never have seen it.
pub fn authorize<R: Owned>(
    principal: &Principal,
    resource: Option<R>,
    not_found: &str,
) -> Result<R, ServiceError> {
    let resource = resource.ok_or_else(|| ServiceError::NotFound(not_found.to_string()))?;
    if !principal.can_access(&resource) {
        tracing::warn!(
            user_id = %principal.id,
            owner_id = %resource.owner_id(),
            "access to another user's resource denied"
        );
        return Err(ServiceError::PermissionDenied);
    }
    Ok(resource)
}
