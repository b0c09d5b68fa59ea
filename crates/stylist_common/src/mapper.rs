//! Item mapper: raw catalog records to canonical `{assetId, type}` items.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::params::LOOKUP_LIMIT;
use crate::slot::Slot;

/// Hard cap on mapped output, mirrors the upstream result limit
pub const MAX_MAPPED_ITEMS: usize = LOOKUP_LIMIT as usize;

/// A record as the catalog returns it. Every field is optional so a
/// partially filled record never fails the whole response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCatalogItem {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub item_type: Option<String>,
    #[serde(default)]
    pub asset_type: Option<Value>,
    #[serde(default, alias = "subcategoryId")]
    pub subcategory: Option<Value>,
    #[serde(default)]
    pub name: Option<String>,
}

impl RawCatalogItem {
    /// External id as an opaque string. Numbers are stringified, blanks dropped.
    pub fn asset_id(&self) -> Option<String> {
        match self.id.as_ref()? {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    fn subcategory_slot(&self) -> Option<Slot> {
        self.subcategory
            .as_ref()
            .and_then(as_u32)
            .and_then(Slot::from_subcategory)
    }

    fn asset_type_slot(&self) -> Option<Slot> {
        self.asset_type
            .as_ref()
            .and_then(as_u32)
            .and_then(Slot::from_asset_type)
    }
}

fn as_u32(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Canonical outfit entry
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CatalogItem {
    #[serde(rename = "assetId")]
    pub asset_id: String,
    #[serde(rename = "type")]
    pub slot: Slot,
}

impl CatalogItem {
    pub fn new(asset_id: impl Into<String>, slot: Slot) -> Self {
        Self {
            asset_id: asset_id.into(),
            slot,
        }
    }
}

/// Normalize raw records.
///
/// Records without an id are dropped. Slot comes from the subcategory table,
/// then `fallback`, then the asset type, then `Slot::Unknown`. Output is
/// truncated to the first [`MAX_MAPPED_ITEMS`].
pub fn map_items(raw: &[RawCatalogItem], fallback: Option<Slot>) -> Vec<CatalogItem> {
    let mut dropped = 0usize;
    let items: Vec<CatalogItem> = raw
        .iter()
        .filter_map(|record| {
            let Some(asset_id) = record.asset_id() else {
                dropped += 1;
                return None;
            };
            let slot = record
                .subcategory_slot()
                .or(fallback)
                .or_else(|| record.asset_type_slot())
                .unwrap_or(Slot::Unknown);
            Some(CatalogItem { asset_id, slot })
        })
        .take(MAX_MAPPED_ITEMS)
        .collect();

    if dropped > 0 {
        debug!("Dropped {} catalog records without an id", dropped);
    }
    items
}
