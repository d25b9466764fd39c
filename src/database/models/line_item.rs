use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::types::{FieldErrors, Patch, Validator};

pub const CODE_MAX_LEN: usize = 50;
pub const DESCRIPTION_MAX_LEN: usize = 255;
pub const UNIT_MAX_LEN: usize = 10;

/// Unit price stored as NUMERIC(12,2).
///
/// Accepted from JSON strings or integers, never from floats. Values are
/// rounded half away from zero to two decimals on the way in and always
/// rendered with exactly two decimals on the way out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, sqlx::Type)]
#[sqlx(transparent)]
pub struct Price(Decimal);

impl Price {
    pub const SCALE: u32 = 2;
    const PRECISION: u32 = 12;

    pub fn new(value: Decimal) -> Self {
        Price(value.round_dp_with_strategy(Self::SCALE, RoundingStrategy::MidpointAwayFromZero))
    }

    /// Whether the value fits the column without overflow.
    pub fn fits_column(&self) -> bool {
        let limit = Decimal::from(10i64.pow(Self::PRECISION - Self::SCALE));
        self.0.abs() < limit
    }
}

impl FromStr for Price {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim()).map(Price::new)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PriceVisitor;

        impl<'de> de::Visitor<'de> for PriceVisitor {
            type Value = Price;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a decimal string such as \"12.50\" or an integer")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Price, E> {
                Price::from_str(v).map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Price, E> {
                Ok(Price::new(Decimal::from(v)))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Price, E> {
                Ok(Price::new(Decimal::from(v)))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Price, E> {
                Err(E::invalid_type(de::Unexpected::Float(v), &self))
            }
        }

        deserializer.deserialize_any(PriceVisitor)
    }
}

/// Catalog entry with a unit price. Global, not owned by any user.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct LineItem {
    pub id: Uuid,
    pub code: Option<String>,
    pub description: String,
    pub unit: String,
    pub unit_price: Price,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LineItemCreate {
    #[serde(default)]
    pub code: Option<String>,
    pub description: String,
    pub unit: String,
    pub unit_price: Price,
}

impl LineItemCreate {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut v = Validator::new();
        if let Some(code) = &self.code {
            v.max_len("code", code, CODE_MAX_LEN);
        }
        v.max_len("description", &self.description, DESCRIPTION_MAX_LEN);
        v.max_len("unit", &self.unit, UNIT_MAX_LEN);
        if !self.unit_price.fits_column() {
            v.fail("unit_price", "ensure that there are no more than 10 digits before the decimal point");
        }
        v.finish()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LineItemUpdate {
    #[serde(default)]
    pub code: Patch<String>,
    #[serde(default)]
    pub description: Patch<String>,
    #[serde(default)]
    pub unit: Patch<String>,
    #[serde(default)]
    pub unit_price: Patch<Price>,
}

impl LineItemUpdate {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut v = Validator::new();
        if let Some(code) = self.code.value() {
            v.max_len("code", code, CODE_MAX_LEN);
        }
        v.not_null("description", &self.description);
        if let Some(description) = self.description.value() {
            v.max_len("description", description, DESCRIPTION_MAX_LEN);
        }
        v.not_null("unit", &self.unit);
        if let Some(unit) = self.unit.value() {
            v.max_len("unit", unit, UNIT_MAX_LEN);
        }
        v.not_null("unit_price", &self.unit_price);
        if let Some(price) = self.unit_price.value() {
            if !price.fits_column() {
                v.fail("unit_price", "ensure that there are no more than 10 digits before the decimal point");
            }
        }
        v.finish()
    }

    /// The code this patch would assign, when it assigns a non-null one.
    pub fn new_code(&self) -> Option<&str> {
        self.code.value().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_absent()
            && self.description.is_absent()
            && self.unit.is_absent()
            && self.unit_price.is_absent()
    }

    pub fn apply_to(&self, item: &mut LineItem) {
        self.code.apply_nullable(&mut item.code);
        self.description.apply(&mut item.description);
        self.unit.apply(&mut item.unit);
        self.unit_price.apply(&mut item.unit_price);
    }
}
