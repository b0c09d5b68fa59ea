//! Parameter heuristics.
//!
//! Pure functions from raw request text to structured filter hints.
//! Each signal is optional and independent; a missing signal is an absent
//! key, never a default value.

use regex::Regex;
use std::sync::LazyLock;

use crate::params::FilterParams;
use crate::slot::{self, first_slot_keyword};
use crate::text;

static RANGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*(?:-|to|–)\s*(\d+)").unwrap());
static MAX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:under|below|less than)\s*(\d+)").unwrap());
static MIN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:over|above|more than)\s*(\d+)").unwrap());

/// Catalog genre ids
pub mod genre {
    pub const TOWN_AND_CITY: u32 = 1;
    pub const MEDIEVAL: u32 = 2;
    pub const SCI_FI: u32 = 3;
    pub const FIGHTING: u32 = 4;
    pub const HORROR: u32 = 5;
    pub const NAVAL: u32 = 6;
    pub const ADVENTURE: u32 = 7;
    pub const SPORTS: u32 = 8;
    pub const COMEDY: u32 = 9;
    pub const WESTERN: u32 = 10;
    pub const MILITARY: u32 = 11;
    pub const BUILDING: u32 = 13;
    pub const FPS: u32 = 14;
    pub const RPG: u32 = 15;
}

/// Keyword -> genre table, first match in declaration order wins
pub const GENRE_KEYWORDS: &[(&str, u32)] = &[
    ("medieval", genre::MEDIEVAL),
    ("knight", genre::MEDIEVAL),
    ("castle", genre::MEDIEVAL),
    ("armor", genre::MEDIEVAL),
    ("warrior", genre::MEDIEVAL),
    ("sci-fi", genre::SCI_FI),
    ("scifi", genre::SCI_FI),
    ("space", genre::SCI_FI),
    ("robot", genre::SCI_FI),
    ("cyber", genre::SCI_FI),
    ("futuristic", genre::SCI_FI),
    ("alien", genre::SCI_FI),
    ("ninja", genre::FIGHTING),
    ("samurai", genre::FIGHTING),
    ("fighter", genre::FIGHTING),
    ("martial", genre::FIGHTING),
    ("horror", genre::HORROR),
    ("zombie", genre::HORROR),
    ("scary", genre::HORROR),
    ("spooky", genre::HORROR),
    ("vampire", genre::HORROR),
    ("ghost", genre::HORROR),
    ("pirate", genre::NAVAL),
    ("sailor", genre::NAVAL),
    ("naval", genre::NAVAL),
    ("adventure", genre::ADVENTURE),
    ("explorer", genre::ADVENTURE),
    ("sport", genre::SPORTS),
    ("soccer", genre::SPORTS),
    ("football", genre::SPORTS),
    ("basketball", genre::SPORTS),
    ("funny", genre::COMEDY),
    ("comedy", genre::COMEDY),
    ("clown", genre::COMEDY),
    ("cowboy", genre::WESTERN),
    ("western", genre::WESTERN),
    ("sheriff", genre::WESTERN),
    ("military", genre::MILITARY),
    ("soldier", genre::MILITARY),
    ("army", genre::MILITARY),
    ("camo", genre::MILITARY),
    ("builder", genre::BUILDING),
    ("construction", genre::BUILDING),
    ("shooter", genre::FPS),
    ("fps", genre::FPS),
    ("rpg", genre::RPG),
    ("fantasy", genre::RPG),
    ("wizard", genre::RPG),
    ("mage", genre::RPG),
    ("city", genre::TOWN_AND_CITY),
    ("town", genre::TOWN_AND_CITY),
    ("urban", genre::TOWN_AND_CITY),
];

/// Words that never become a search keyword
const STOP_WORDS: &[&str] = &[
    // filler
    "want", "need", "looking", "find", "outfit", "clothes", "items", "gear", "please",
    "something", "some", "show", "give", "make", "with", "that", "this", "like", "look",
    "costume", "avatar",
    // price
    "under", "below", "less", "than", "over", "above", "robux", "price", "cheap",
    // intent
    "change", "replace", "swap", "different", "more", "next", "another", "others",
];

/// Price constraint as `(min, max)`. A range ("100-500", "100 to 500")
/// wins over any "under N" / "over N" phrase in the same text.
pub fn parse_price(text: &str) -> (Option<u32>, Option<u32>) {
    let lower = text.to_lowercase();

    if let Some(caps) = RANGE_RE.captures(&lower) {
        let low = caps.get(1).and_then(|m| m.as_str().parse().ok());
        let high = caps.get(2).and_then(|m| m.as_str().parse().ok());
        if low.is_some() || high.is_some() {
            return (low, high);
        }
    }

    let max = MAX_RE
        .captures(&lower)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok());
    let min = MIN_RE
        .captures(&lower)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok());
    (min, max)
}

/// Subcategory hint from the slot keyword table
pub fn detect_subcategory(text: &str) -> Option<u32> {
    first_slot_keyword(text).and_then(|slot| slot.subcategory_id())
}

pub fn detect_genre(text: &str) -> Option<u32> {
    let tokens = text::tokens(text);
    GENRE_KEYWORDS
        .iter()
        .find(|(keyword, _)| text::contains_word(&tokens, keyword))
        .map(|(_, id)| *id)
}

/// Price, subcategory and genre hints found in `text`. Never sets `keyword`.
pub fn detect_filters(text: &str) -> FilterParams {
    let (min_price, max_price) = parse_price(text);
    FilterParams {
        keyword: None,
        subcategory_id: detect_subcategory(text),
        genre_id: detect_genre(text),
        min_price,
        max_price,
    }
}

/// Up to three meaningful words from `text`, joined by spaces
pub fn extract_keyword(text: &str) -> Option<String> {
    let words: Vec<String> = text::tokens(text)
        .into_iter()
        .filter(|w| w.chars().count() > 3)
        .filter(|w| !w.chars().all(|c| c.is_ascii_digit()))
        .filter(|w| !STOP_WORDS.iter().any(|s| text::word_matches(w, s)))
        .filter(|w| !slot::is_slot_word(w))
        .take(3)
        .collect();

    if words.is_empty() {
        None
    } else {
        Some(words.join(" "))
    }
}
