use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

use super::Owned;
use crate::types::{FieldErrors, Patch, Validator};

pub const NAME_MAX_LEN: usize = 255;

/// Saved budget state. `data` is opaque JSON persisted as JSONB.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub data: Value,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Owned for Project {
    fn owner_id(&self) -> Uuid {
        self.owner_id
    }
}

/// Any `owner_id` in the request body is ignored; the creator owns the project.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectCreate {
    pub name: String,
    pub data: Value,
}

impl ProjectCreate {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut v = Validator::new();
        v.max_len("name", &self.name, NAME_MAX_LEN);
        if self.data.is_null() {
            v.fail("data", "field may not be null");
        }
        v.finish()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectUpdate {
    #[serde(default)]
    pub name: Patch<String>,
    #[serde(default)]
    pub data: Patch<Value>,
}

impl ProjectUpdate {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut v = Validator::new();
        v.not_null("name", &self.name);
        if let Some(name) = self.name.value() {
            v.max_len("name", name, NAME_MAX_LEN);
        }
        v.not_null("data", &self.data);
        v.finish()
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_absent() && self.data.is_absent()
    }

    pub fn apply_to(&self, project: &mut Project) {
        self.name.apply(&mut project.name);
        self.data.apply(&mut project.data);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_ignores_owner_id_in_body() {
        let input: ProjectCreate = serde_json::from_value(json!({
            "name": "Obra",
            "data": {"rows": []},
            "owner_id": Uuid::new_v4(),
        }))
        .unwrap();
        assert!(input.validate().is_ok());
    }

    #[test]
    fn null_data_is_rejected() {
        let input: ProjectCreate =
            serde_json::from_value(json!({ "name": "Obra", "data": null })).unwrap();
        assert!(input.validate().unwrap_err().contains_key("data"));

        let patch: ProjectUpdate = serde_json::from_value(json!({ "data": null })).unwrap();
        assert!(patch.validate().unwrap_err().contains_key("data"));
    }

    #[test]
    fn data_may_be_any_non_null_json() {
        let patch: ProjectUpdate = serde_json::from_value(json!({ "data": [1, "two"] })).unwrap();
        assert!(patch.validate().is_ok());
        assert!(patch.name.is_absent());
    }
}
