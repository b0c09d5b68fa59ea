//! Templated reply text. Nothing here is model generated.

use crate::intent::ClarifyReason;
use crate::slot::Slot;

pub const APOLOGY: &str =
    "I'm sorry, I had trouble processing your request. Could you try again?";

pub const GREETING: &str = "Hi! Tell me what kind of look you're after, like a knight outfit \
     or a ninja look under 500 robux, and I'll put one together.";

pub const NO_INTENT: &str = "What kind of outfit are you looking for? For example: a knight \
     outfit, a ninja look under 500 robux, or a new hat.";

pub const NO_SUGGESTIONS_YET: &str =
    "I haven't made any suggestions yet. Tell me what kind of outfit you'd like first.";

fn join_labels(slots: &[Slot]) -> String {
    let labels: Vec<String> = slots.iter().map(Slot::label).collect();
    match labels.as_slice() {
        [] => String::new(),
        [one] => one.clone(),
        [init @ .., last] => format!("{} or {}", init.join(", "), last),
    }
}

fn pieces(n: usize) -> String {
    if n == 1 {
        "1 piece".to_string()
    } else {
        format!("{} pieces", n)
    }
}

pub fn clarify(reason: &ClarifyReason) -> String {
    match reason {
        ClarifyReason::NoIntent => NO_INTENT.to_string(),
        ClarifyReason::AmbiguousSlot(slots) => {
            format!("Which one should I change: {}?", join_labels(slots))
        }
        ClarifyReason::PickSlot(filled) if filled.is_empty() => NO_SUGGESTIONS_YET.to_string(),
        ClarifyReason::PickSlot(filled) => {
            format!("More of which item? I can show more {}.", join_labels(filled))
        }
    }
}

/// `updated` slots changed this turn, `outfit_size` is the full outfit after it
pub fn new_outfit(updated: usize, outfit_size: usize) -> String {
    if updated == 0 {
        return "I couldn't find any items for that right now. Try different words or a \
                wider price range."
            .to_string();
    }
    format!(
        "Here's your outfit! I picked {} and your look now has {}.",
        pieces(updated),
        pieces(outfit_size)
    )
}

pub fn replace(slot: Slot, applied: bool) -> String {
    if applied {
        format!("Here's a new {} for you.", slot.label())
    } else {
        format!(
            "I couldn't find a different {} right now. Try describing it another way.",
            slot.label()
        )
    }
}

pub fn show_more(slot: Slot, applied: bool, wrapped: bool) -> String {
    match (applied, wrapped) {
        (false, _) => format!("I couldn't find more {} options right now.", slot.label()),
        (true, true) => format!(
            "That's every {} option I have, so we're back at the start.",
            slot.label()
        ),
        (true, false) => format!("Here's another {} option.", slot.label()),
    }
}
