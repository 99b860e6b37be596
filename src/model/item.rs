//! Item record types
//!
//! The JSON shape follows the document-database convention the static
//! frontend already consumes:
//!
//! ```text
//! { "_id": "<uuid>", "name": "Widget", "price": 12.5, "inStock": true }
//! ```
//!
//! Every data field is optional. Absent fields are omitted on output and
//! unknown fields are dropped on input.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Opaque item identifier, assigned by the store at creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(Uuid);

impl ItemId {
    /// Generate a fresh identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an identifier from its string form.
    ///
    /// Only the lowercase hyphenated form that [`ItemId`] displays as is
    /// accepted, so each item is reachable under exactly one id. Returns
    /// `None` for anything else. Callers treat that the same as an
    /// identifier that does not exist.
    pub fn parse(raw: &str) -> Option<Self> {
        let uuid = Uuid::try_parse(raw).ok()?;
        let mut buf = Uuid::encode_buffer();
        let canonical: &str = uuid.hyphenated().encode_lower(&mut buf);
        (canonical == raw).then_some(Self(uuid))
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The data fields of an item. Also the body accepted by create.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_stock: Option<bool>,
}

impl ItemFields {
    pub fn new(name: impl Into<String>, price: f64, in_stock: bool) -> Self {
        Self {
            name: Some(name.into()),
            price: Some(price),
            in_stock: Some(in_stock),
        }
    }
}

/// A stored item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(rename = "_id")]
    pub id: ItemId,

    #[serde(flatten)]
    pub fields: ItemFields,
}

impl Item {
    pub fn new(id: ItemId, fields: ItemFields) -> Self {
        Self { id, fields }
    }
}

/// Partial update body.
///
/// Each field distinguishes three states: absent (leave unchanged),
/// `null` (clear the field) and a value (replace the field).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPatch {
    #[serde(default, deserialize_with = "present")]
    pub name: Option<Option<String>>,

    #[serde(default, deserialize_with = "present")]
    pub price: Option<Option<f64>>,

    #[serde(default, deserialize_with = "present")]
    pub in_stock: Option<Option<bool>>,
}

/// Marks a field as present, keeping an explicit `null` as `Some(None)`.
fn present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl ItemPatch {
    /// Returns true if the patch touches no field
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.price.is_none() && self.in_stock.is_none()
    }

    /// Apply the present fields onto `fields`, leaving the rest unchanged.
    pub fn apply(self, fields: &mut ItemFields) {
        if let Some(name) = self.name {
            fields.name = name;
        }
        if let Some(price) = self.price {
            fields.price = price;
        }
        if let Some(in_stock) = self.in_stock {
            fields.in_stock = in_stock;
        }
    }
}
