use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::types::{FieldErrors, Patch, Validator};

pub const EMAIL_MAX_LEN: usize = 255;
pub const FULL_NAME_MAX_LEN: usize = 255;

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    pub is_active: bool,
    pub is_superuser: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserCreate {
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_superuser: bool,
}

fn default_true() -> bool {
    true
}

fn check_email(v: &mut Validator, email: &str) {
    v.max_len("email", email, EMAIL_MAX_LEN);
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {}
        _ => v.fail("email", "value is not a valid email address"),
    }
}

impl UserCreate {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut v = Validator::new();
        check_email(&mut v, &self.email);
        if let Some(full_name) = &self.full_name {
            v.max_len("full_name", full_name, FULL_NAME_MAX_LEN);
        }
        v.finish()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserUpdate {
    #[serde(default)]
    pub email: Patch<String>,
    #[serde(default)]
    pub full_name: Patch<String>,
    #[serde(default)]
    pub is_active: Patch<bool>,
    #[serde(default)]
    pub is_superuser: Patch<bool>,
}

impl UserUpdate {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut v = Validator::new();
        v.not_null("email", &self.email);
        if let Some(email) = self.email.value() {
            check_email(&mut v, email);
        }
        if let Some(full_name) = self.full_name.value() {
            v.max_len("full_name", full_name, FULL_NAME_MAX_LEN);
        }
        v.not_null("is_active", &self.is_active);
        v.not_null("is_superuser", &self.is_superuser);
        v.finish()
    }

    pub fn is_empty(&self) -> bool {
        self.email.is_absent()
            && self.full_name.is_absent()
            && self.is_active.is_absent()
            && self.is_superuser.is_absent()
    }

    pub fn apply_to(&self, user: &mut User) {
        self.email.apply(&mut user.email);
        self.full_name.apply_nullable(&mut user.full_name);
        self.is_active.apply(&mut user.is_active);
        self.is_superuser.apply(&mut user.is_superuser);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_defaults() {
        let input: UserCreate = serde_json::from_value(json!({ "email": "a@b.test" })).unwrap();
        assert!(input.is_active);
        assert!(!input.is_superuser);
        assert!(input.validate().is_ok());
    }

    #[test]
    fn rejects_malformed_email() {
        for email in ["plain", "@b.test", "a@"] {
            let input: UserCreate = serde_json::from_value(json!({ "email": email })).unwrap();
            assert!(input.validate().unwrap_err().contains_key("email"), "{email}");
        }
    }
}
