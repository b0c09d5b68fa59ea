//! Deterministic turn intent classification.
//!
//! Checks run in a fixed order and the first match wins:
//! greeting, replace, show more, then new outfit.

use serde::{Deserialize, Serialize};

use crate::heuristics::detect_filters;
use crate::planner::has_theme;
use crate::rpc::TurnAction;
use crate::session::{OutfitSession, SlotPhase};
use crate::slot::{mentioned_slots, Slot};
use crate::text;

const GREETING_WORDS: &[&str] = &["hi", "hello", "hey", "hiya", "howdy", "yo", "sup", "greetings"];

/// Greet only after "good", so "evening outfit" stays a request
const TIME_OF_DAY_WORDS: &[&str] = &["morning", "afternoon", "evening"];

/// Longest text still treated as a bare greeting
const MAX_GREETING_WORDS: usize = 4;

const REPLACE_WORDS: &[&str] = &["change", "replace", "swap", "different", "new"];

/// "new" followed by one of these asks for a whole new look
const WHOLE_LOOK_WORDS: &[&str] = &["outfit", "look", "costume", "avatar"];

const CONTINUATION_WORDS: &[&str] = &["more", "next", "another", "others"];

/// Why a turn needs a clarifying question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "reason", content = "slots")]
pub enum ClarifyReason {
    /// Replace named more than one slot
    AmbiguousSlot(Vec<Slot>),
    /// Show more could not pick a filled slot; carries the filled slots
    PickSlot(Vec<Slot>),
    /// Nothing actionable in the text
    NoIntent,
}

/// Classified turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnIntent {
    Greet,
    Replace(Slot),
    ShowMore(Slot),
    NewOutfit,
    Clarify(ClarifyReason),
}

impl TurnIntent {
    pub fn action(&self) -> TurnAction {
        match self {
            TurnIntent::Greet => TurnAction::Greet,
            TurnIntent::Replace(_) => TurnAction::Replace,
            TurnIntent::ShowMore(_) => TurnAction::ShowMore,
            TurnIntent::NewOutfit => TurnAction::NewOutfit,
            TurnIntent::Clarify(_) => TurnAction::Clarify,
        }
    }
}

fn has_greeting_word(tokens: &[String]) -> bool {
    tokens.iter().enumerate().any(|(i, t)| {
        GREETING_WORDS.contains(&t.as_str())
            || (TIME_OF_DAY_WORDS.contains(&t.as_str())
                && i > 0
                && tokens[i - 1] == "good")
    })
}

/// Short text with a greeting word and nothing to search for
pub fn is_greeting(text: &str) -> bool {
    let tokens = text::tokens(text);
    !tokens.is_empty()
        && tokens.len() <= MAX_GREETING_WORDS
        && has_greeting_word(&tokens)
        && mentioned_slots(text).is_empty()
        && !has_theme(text)
        && detect_filters(text).is_empty()
}

/// A replace verb, unless it is "new" introducing a whole look
fn is_replace_request(tokens: &[String]) -> bool {
    tokens.iter().enumerate().any(|(i, t)| {
        REPLACE_WORDS.contains(&t.as_str())
            && !(t == "new" && text::contains_any(&tokens[i + 1..], WHOLE_LOOK_WORDS))
    })
}

/// Continuation words, ignoring "more than" which is a price phrase
fn is_continuation(tokens: &[String]) -> bool {
    tokens.iter().enumerate().any(|(i, t)| {
        CONTINUATION_WORDS.contains(&t.as_str())
            && !(t == "more" && tokens.get(i + 1).map(String::as_str) == Some("than"))
    })
}

/// Classify `text` against the user's current session
pub fn classify(text: &str, session: &OutfitSession) -> TurnIntent {
    if is_greeting(text) {
        return TurnIntent::Greet;
    }

    let tokens = text::tokens(text);
    let slots = mentioned_slots(text);

    if is_replace_request(&tokens) && !slots.is_empty() {
        return match slots.as_slice() {
            [slot] => TurnIntent::Replace(*slot),
            _ => TurnIntent::Clarify(ClarifyReason::AmbiguousSlot(slots)),
        };
    }

    if is_continuation(&tokens) {
        let filled = session.filled_slots();
        let target = match (slots.as_slice(), filled.as_slice()) {
            ([slot], _) => Some(*slot),
            ([], [only]) => Some(*only),
            _ => None,
        };
        return match target {
            Some(slot) if session.phase(slot) != SlotPhase::Empty => TurnIntent::ShowMore(slot),
            _ => TurnIntent::Clarify(ClarifyReason::PickSlot(filled)),
        };
    }

    TurnIntent::NewOutfit
}
