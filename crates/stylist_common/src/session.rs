//! Outfit session state.
//!
//! Each slot moves independently between three phases:
//!
//! - `Empty`: never filled
//! - `Filled`: holds a selection that came from a real lookup
//! - `Exhausted`: filled, and "show more" has wrapped past the end of the
//!   candidate pool at least once
//!
//! A failed or empty lookup never moves a slot backwards.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::mapper::CatalogItem;
use crate::params::FilterParams;
use crate::planner::PlanStep;
use crate::rpc::UserId;
use crate::slot::Slot;

/// Current pick for one slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotSelection {
    pub asset_id: String,
    /// Params that produced the candidate pool, reused by "show more"
    pub params_used: FilterParams,
    pub last_shown_index: usize,
    #[serde(default)]
    pub exhausted: bool,
}

impl SlotSelection {
    fn first_of(items: &[CatalogItem], params: &FilterParams) -> Option<Self> {
        items.first().map(|item| Self {
            asset_id: item.asset_id.clone(),
            params_used: params.clone(),
            last_shown_index: 0,
            exhausted: false,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotPhase {
    Empty,
    Filled,
    Exhausted,
}

/// Lookup results for one plan step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    pub step: PlanStep,
    pub items: Vec<CatalogItem>,
}

impl StepOutcome {
    pub fn new(step: PlanStep, items: Vec<CatalogItem>) -> Self {
        Self { step, items }
    }
}

/// What one state transition did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    /// Slots that took a selection from a non-empty pool
    pub updated: Vec<Slot>,
    /// Slots whose lookup came back empty, left as they were
    pub missed: Vec<Slot>,
}

impl ApplyReport {
    /// At least one slot changed
    pub fn succeeded(&self) -> bool {
        !self.updated.is_empty()
    }

    fn record(&mut self, slot: Slot, applied: bool) {
        if applied {
            self.updated.push(slot);
        } else {
            self.missed.push(slot);
        }
    }
}

/// Per-user outfit state. Holds at most one selection per slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutfitSession {
    pub user_id: UserId,
    selections: BTreeMap<Slot, SlotSelection>,
}

impl OutfitSession {
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            selections: BTreeMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }

    pub fn selection(&self, slot: Slot) -> Option<&SlotSelection> {
        self.selections.get(&slot)
    }

    pub fn phase(&self, slot: Slot) -> SlotPhase {
        match self.selections.get(&slot) {
            None => SlotPhase::Empty,
            Some(sel) if sel.exhausted => SlotPhase::Exhausted,
            Some(_) => SlotPhase::Filled,
        }
    }

    /// Filled slots in canonical order
    pub fn filled_slots(&self) -> Vec<Slot> {
        self.selections.keys().copied().collect()
    }

    /// Params last used to fill `slot`
    pub fn params_for(&self, slot: Slot) -> Option<&FilterParams> {
        self.selections.get(&slot).map(|sel| &sel.params_used)
    }

    /// Apply every step of a new-outfit plan. Empty pools leave their slot
    /// untouched.
    pub fn apply_new_outfit(&mut self, outcomes: &[StepOutcome]) -> ApplyReport {
        let mut report = ApplyReport::default();
        for outcome in outcomes {
            let applied = self.fill(&outcome.step, &outcome.items);
            report.record(outcome.step.slot, applied);
        }
        report
    }

    /// Overwrite one slot with the first item of `items`
    pub fn apply_replace(&mut self, step: &PlanStep, items: &[CatalogItem]) -> ApplyReport {
        let mut report = ApplyReport::default();
        let applied = self.fill(step, items);
        report.record(step.slot, applied);
        report
    }

    /// Rotate a filled slot to the next item of a fresh pool.
    ///
    /// The index wraps modulo the pool size, so a pool of one collapses it
    /// back to zero. Unfilled slots and empty pools are left untouched.
    pub fn apply_show_more(&mut self, slot: Slot, items: &[CatalogItem]) -> ApplyReport {
        let mut report = ApplyReport::default();
        let Some(sel) = self.selections.get_mut(&slot) else {
            debug!("show more on empty slot {}", slot);
            report.missed.push(slot);
            return report;
        };
        if items.is_empty() {
            report.missed.push(slot);
            return report;
        }

        let next = sel.last_shown_index + 1;
        if next >= items.len() {
            sel.exhausted = true;
        }
        sel.last_shown_index = next % items.len();
        sel.asset_id = items[sel.last_shown_index].asset_id.clone();
        report.updated.push(slot);
        report
    }

    /// Full outfit in canonical slot order
    pub fn current_outfit(&self) -> Vec<CatalogItem> {
        self.selections
            .iter()
            .map(|(slot, sel)| CatalogItem::new(sel.asset_id.clone(), *slot))
            .collect()
    }

    fn fill(&mut self, step: &PlanStep, items: &[CatalogItem]) -> bool {
        match SlotSelection::first_of(items, &step.params) {
            Some(sel) => {
                self.selections.insert(step.slot, sel);
                true
            }
            None => {
                debug!("no candidates for {}, keeping prior state", step.slot);
                false
            }
        }
    }
}
