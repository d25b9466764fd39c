//! Shared types used across the codebase
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;

/// Field-level validation messages keyed by field name
pub type FieldErrors = HashMap<String, String>;

/// One field of a partial-update payload.
///
/// Pair with `#[serde(default)]` so a missing key stays `Absent` while an
/// explicit JSON `null` becomes `Null`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Patch<T> {
    #[default]
    Absent,
    Null,
    Value(T),
}

impl<T> Patch<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Patch::Absent)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Patch::Value(v) => Some(v),
            _ => None,
        }
    }

    /// `None` when absent, `Some(None)` when explicitly nulled.
    pub fn as_change(&self) -> Option<Option<&T>> {
        match self {
            Patch::Absent => None,
            Patch::Null => Some(None),
            Patch::Value(v) => Some(Some(v)),
        }
    }

    /// Writes the patch into a nullable slot.
    pub fn apply_nullable(&self, slot: &mut Option<T>)
    where
        T: Clone,
    {
        if let Some(change) = self.as_change() {
            *slot = change.cloned();
        }
    }

    /// Writes the patch into a required slot. `Null` must have been rejected
    /// during validation and is ignored here.
    pub fn apply(&self, slot: &mut T)
    where
        T: Clone,
    {
        if let Patch::Value(v) = self {
            *slot = v.clone();
        }
    }
}

impl<'de, T> Deserialize<'de> for Patch<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(v) => Patch::Value(v),
            None => Patch::Null,
        })
    }
}

/// Accumulates per-field validation failures for a payload.
#[derive(Debug, Default)]
pub struct Validator {
    errors: FieldErrors,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail(&mut self, field: &str, message: impl Into<String>) {
        self.errors.entry(field.to_string()).or_insert_with(|| message.into());
    }

    /// Length in characters, not bytes.
    pub fn max_len(&mut self, field: &str, value: &str, max: usize) {
        if value.chars().count() > max {
            self.fail(field, format!("ensure this value has at most {} characters", max));
        }
    }

    pub fn min_len(&mut self, field: &str, value: &str, min: usize) {
        if value.chars().count() < min {
            self.fail(field, format!("ensure this value has at least {} characters", min));
        }
    }

    pub fn not_null<T>(&mut self, field: &str, patch: &Patch<T>) {
        if matches!(patch, Patch::Null) {
            self.fail(field, "field may not be null");
        }
    }

    pub fn finish(self) -> Result<(), FieldErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}
