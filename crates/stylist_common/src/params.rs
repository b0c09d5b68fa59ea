//! Search filters sent to the catalog.

use serde::{Deserialize, Serialize};

use crate::slot::Slot;

/// Every lookup requests exactly this many results
pub const LOOKUP_LIMIT: u32 = 10;

/// Optional search constraints. Absent keys are never defaulted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory_id: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre_id: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_price: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_price: Option<u32>,
}

impl FilterParams {
    /// Fixed regardless of what any caller asks for
    pub fn limit(&self) -> u32 {
        LOOKUP_LIMIT
    }

    /// True when no filter signal is present
    pub fn is_empty(&self) -> bool {
        self.keyword.is_none()
            && self.subcategory_id.is_none()
            && self.genre_id.is_none()
            && self.min_price.is_none()
            && self.max_price.is_none()
    }

    pub fn with_keyword(mut self, keyword: Option<String>) -> Self {
        self.keyword = keyword;
        self
    }

    /// Keys present in `other` replace ours; keys it lacks are kept
    pub fn overlay(mut self, other: &FilterParams) -> Self {
        if other.keyword.is_some() {
            self.keyword = other.keyword.clone();
        }
        self.subcategory_id = other.subcategory_id.or(self.subcategory_id);
        self.genre_id = other.genre_id.or(self.genre_id);
        self.min_price = other.min_price.or(self.min_price);
        self.max_price = other.max_price.or(self.max_price);
        self
    }
}

/// One concrete catalog request: filters plus the subcategory to search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogQuery {
    pub params: FilterParams,
    pub subcategory: Option<u32>,
}

impl CatalogQuery {
    /// Query for a slot. The slot's bound subcategory overrides any
    /// subcategory hint carried in the params.
    pub fn for_slot(slot: Slot, params: &FilterParams) -> Self {
        Self {
            params: params.clone(),
            subcategory: slot.subcategory_id().or(params.subcategory_id),
        }
    }

    /// Query that is not tied to a slot
    pub fn unbound(params: &FilterParams) -> Self {
        Self {
            params: params.clone(),
            subcategory: params.subcategory_id,
        }
    }

    /// Query-string pairs in the catalog API's parameter names
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(keyword) = &self.params.keyword {
            pairs.push(("Keyword", keyword.clone()));
        }
        if let Some(sub) = self.subcategory {
            pairs.push(("Subcategory", sub.to_string()));
        }
        if let Some(genre) = self.params.genre_id {
            pairs.push(("Genres", genre.to_string()));
        }
        if let Some(min) = self.params.min_price {
            pairs.push(("MinPrice", min.to_string()));
        }
        if let Some(max) = self.params.max_price {
            pairs.push(("MaxPrice", max.to_string()));
        }
        pairs.push(("Limit", LOOKUP_LIMIT.to_string()));
        pairs
    }
}
