use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::Owned;
use crate::types::{FieldErrors, Patch, Validator};

pub const TITLE_MAX_LEN: usize = 255;
pub const DESCRIPTION_MAX_LEN: usize = 255;

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Item {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub owner_id: Uuid,
}

impl Owned for Item {
    fn owner_id(&self) -> Uuid {
        self.owner_id
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ItemCreate {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl ItemCreate {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut v = Validator::new();
        v.min_len("title", &self.title, 1);
        v.max_len("title", &self.title, TITLE_MAX_LEN);
        if let Some(description) = &self.description {
            v.max_len("description", description, DESCRIPTION_MAX_LEN);
        }
        v.finish()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemUpdate {
    #[serde(default)]
    pub title: Patch<String>,
    #[serde(default)]
    pub description: Patch<String>,
}

impl ItemUpdate {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut v = Validator::new();
        v.not_null("title", &self.title);
        if let Some(title) = self.title.value() {
            v.min_len("title", title, 1);
            v.max_len("title", title, TITLE_MAX_LEN);
        }
        if let Some(description) = self.description.value() {
            v.max_len("description", description, DESCRIPTION_MAX_LEN);
        }
        v.finish()
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_absent() && self.description.is_absent()
    }

    pub fn apply_to(&self, item: &mut Item) {
        self.title.apply(&mut item.title);
        self.description.apply_nullable(&mut item.description);
    }
}
