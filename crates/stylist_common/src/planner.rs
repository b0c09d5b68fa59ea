//! Planner: request text to an ordered list of catalog lookups.

use serde::{Deserialize, Serialize};

use crate::heuristics::{detect_filters, extract_keyword};
use crate::params::FilterParams;
use crate::slot::{mentioned_slots, Slot};
use crate::text;

/// Maximum lookups in one plan
pub const MAX_PLAN_STEPS: usize = 5;

/// Slots every new outfit starts from, in order
pub const BASE_SLOTS: [Slot; 3] = [Slot::Head, Slot::Shirt, Slot::Pants];

/// Extra slots used when no theme rule matches
pub const DEFAULT_EXTRAS: &[Slot] = &[Slot::BackAccessory];

/// Theme keywords and the extra slots they pull in. First matching rule wins.
pub const THEME_RULES: &[(&[&str], &[Slot])] = &[
    (
        &["knight", "medieval", "armor", "armour", "warrior"],
        &[Slot::BackAccessory, Slot::FrontAccessory],
    ),
    (
        &["ninja", "stealth", "dark", "assassin"],
        &[Slot::FaceAccessory, Slot::BackAccessory],
    ),
    (&["casual", "everyday", "simple"], &[]),
    (&["fancy", "formal", "elegant"], &[Slot::NeckAccessory]),
];

/// One catalog lookup to perform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanStep {
    pub slot: Slot,
    pub params: FilterParams,
}

/// Filters shared by every step built from `text`
pub fn plan_params(text: &str) -> FilterParams {
    detect_filters(text).with_keyword(extract_keyword(text))
}

fn theme_extras(tokens: &[String]) -> Option<&'static [Slot]> {
    THEME_RULES
        .iter()
        .find(|(words, _)| text::contains_any(tokens, words))
        .map(|(_, slots)| *slots)
}

/// True when `text` matches one of the theme rules
pub fn has_theme(text: &str) -> bool {
    theme_extras(&text::tokens(text)).is_some()
}

/// Build the lookup plan.
///
/// With a `target` slot the plan is exactly one step for it. Otherwise a plan
/// needs a theme rule, a genre word or a slot word, and is the base set, then
/// the theme extras, then any explicitly mentioned slots, capped at
/// [`MAX_PLAN_STEPS`]. An empty plan means nothing actionable was found; a
/// price on its own is not enough.
pub fn plan_steps(text: &str, target: Option<Slot>) -> Vec<PlanStep> {
    let params = plan_params(text);

    if let Some(slot) = target {
        return vec![PlanStep { slot, params }];
    }

    let tokens = text::tokens(text);
    let theme = theme_extras(&tokens);
    let named = mentioned_slots(text);

    if theme.is_none() && params.genre_id.is_none() && named.is_empty() {
        return Vec::new();
    }

    let mut slots: Vec<Slot> = BASE_SLOTS.to_vec();
    let extras = theme
        .unwrap_or(DEFAULT_EXTRAS)
        .iter()
        .copied()
        .chain(named);
    for slot in extras {
        if !slots.contains(&slot) {
            slots.push(slot);
        }
    }
    slots.truncate(MAX_PLAN_STEPS);

    slots
        .into_iter()
        .map(|slot| PlanStep {
            slot,
            params: params.clone(),
        })
        .collect()
}
