//! Canonical outfit slots.
//!
//! Every slot is bound at compile time to the catalog subcategory it searches,
//! so there is no string-keyed tool dispatch anywhere in the pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::text;

/// Canonical outfit position.
///
/// Declaration order is the rendering order of an outfit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Slot {
    #[serde(rename = "Head")]
    Head,
    #[serde(rename = "Face")]
    Face,
    #[serde(rename = "Face Accessory")]
    FaceAccessory,
    #[serde(rename = "Hair")]
    Hair,
    #[serde(rename = "Shirt")]
    Shirt,
    #[serde(rename = "T-Shirt")]
    TShirt,
    #[serde(rename = "Pants")]
    Pants,
    #[serde(rename = "Back Accessory")]
    BackAccessory,
    #[serde(rename = "Neck Accessory")]
    NeckAccessory,
    #[serde(rename = "Shoulder Accessory")]
    ShoulderAccessory,
    #[serde(rename = "Front Accessory")]
    FrontAccessory,
    #[serde(rename = "Waist Accessory")]
    WaistAccessory,
    #[serde(rename = "Head (Body Part)")]
    HeadBodypart,
    #[serde(rename = "Dynamic Head")]
    DynamicHead,
    #[serde(rename = "Bundle")]
    Bundle,
    #[serde(rename = "Emote")]
    Emote,
    /// Record whose position could not be resolved
    #[serde(rename = "Unknown")]
    Unknown,
}

/// Keyword -> slot table. First match in declaration order wins, so the
/// more specific spellings sit above the generic ones.
pub const SLOT_KEYWORDS: &[(&str, Slot)] = &[
    ("t-shirt", Slot::TShirt),
    ("tshirt", Slot::TShirt),
    ("tee", Slot::TShirt),
    ("hat", Slot::Head),
    ("helmet", Slot::Head),
    ("cap", Slot::Head),
    ("beanie", Slot::Head),
    ("headgear", Slot::Head),
    ("crown", Slot::Head),
    ("head", Slot::Head),
    ("shirt", Slot::Shirt),
    ("top", Slot::Shirt),
    ("blouse", Slot::Shirt),
    ("jacket", Slot::Shirt),
    ("pants", Slot::Pants),
    ("trousers", Slot::Pants),
    ("jeans", Slot::Pants),
    ("shorts", Slot::Pants),
    ("hair", Slot::Hair),
    ("hairstyle", Slot::Hair),
    ("mask", Slot::FaceAccessory),
    ("eyepatch", Slot::FaceAccessory),
    ("glasses", Slot::FaceAccessory),
    ("face", Slot::Face),
    ("back", Slot::BackAccessory),
    ("wings", Slot::BackAccessory),
    ("cape", Slot::BackAccessory),
    ("jetpack", Slot::BackAccessory),
    ("necklace", Slot::NeckAccessory),
    ("scarf", Slot::NeckAccessory),
    ("neck", Slot::NeckAccessory),
    ("pauldron", Slot::ShoulderAccessory),
    ("shoulder", Slot::ShoulderAccessory),
    ("chestplate", Slot::FrontAccessory),
    ("front", Slot::FrontAccessory),
    ("belt", Slot::WaistAccessory),
    ("tail", Slot::WaistAccessory),
    ("waist", Slot::WaistAccessory),
    ("bundle", Slot::Bundle),
    ("emote", Slot::Emote),
    ("dance", Slot::Emote),
];

/// Catalog subcategory ids that resolve to a slot. Includes the classic and
/// accessory variants that share a position with the primary subcategory.
const SUBCATEGORY_SLOTS: &[(u32, Slot)] = &[
    (9, Slot::Head),
    (54, Slot::Head),
    (10, Slot::Face),
    (21, Slot::FaceAccessory),
    (20, Slot::Hair),
    (12, Slot::Shirt),
    (56, Slot::Shirt),
    (13, Slot::TShirt),
    (55, Slot::TShirt),
    (14, Slot::Pants),
    (57, Slot::Pants),
    (25, Slot::BackAccessory),
    (22, Slot::NeckAccessory),
    (23, Slot::ShoulderAccessory),
    (24, Slot::FrontAccessory),
    (26, Slot::WaistAccessory),
    (15, Slot::HeadBodypart),
    (66, Slot::DynamicHead),
    (37, Slot::Bundle),
    (39, Slot::Emote),
];

/// Catalog asset type ids that resolve to a slot
const ASSET_TYPE_SLOTS: &[(u32, Slot)] = &[
    (2, Slot::TShirt),
    (8, Slot::Head),
    (11, Slot::Shirt),
    (12, Slot::Pants),
    (17, Slot::HeadBodypart),
    (18, Slot::Face),
    (41, Slot::Hair),
    (42, Slot::FaceAccessory),
    (43, Slot::NeckAccessory),
    (44, Slot::ShoulderAccessory),
    (45, Slot::FrontAccessory),
    (46, Slot::BackAccessory),
    (47, Slot::WaistAccessory),
    (61, Slot::Emote),
    (79, Slot::DynamicHead),
];

impl Slot {
    /// Every fillable slot in canonical order (excludes `Unknown`)
    pub const ALL: [Slot; 16] = [
        Slot::Head,
        Slot::Face,
        Slot::FaceAccessory,
        Slot::Hair,
        Slot::Shirt,
        Slot::TShirt,
        Slot::Pants,
        Slot::BackAccessory,
        Slot::NeckAccessory,
        Slot::ShoulderAccessory,
        Slot::FrontAccessory,
        Slot::WaistAccessory,
        Slot::HeadBodypart,
        Slot::DynamicHead,
        Slot::Bundle,
        Slot::Emote,
    ];

    /// UI-facing name, identical to the serialized form
    pub fn display_name(&self) -> &'static str {
        match self {
            Slot::Head => "Head",
            Slot::Face => "Face",
            Slot::FaceAccessory => "Face Accessory",
            Slot::Hair => "Hair",
            Slot::Shirt => "Shirt",
            Slot::TShirt => "T-Shirt",
            Slot::Pants => "Pants",
            Slot::BackAccessory => "Back Accessory",
            Slot::NeckAccessory => "Neck Accessory",
            Slot::ShoulderAccessory => "Shoulder Accessory",
            Slot::FrontAccessory => "Front Accessory",
            Slot::WaistAccessory => "Waist Accessory",
            Slot::HeadBodypart => "Head (Body Part)",
            Slot::DynamicHead => "Dynamic Head",
            Slot::Bundle => "Bundle",
            Slot::Emote => "Emote",
            Slot::Unknown => "Unknown",
        }
    }

    /// Lowercase name used inside reply sentences
    pub fn label(&self) -> String {
        self.display_name().to_lowercase()
    }

    /// Subcategory searched when looking up candidates for this slot
    pub fn subcategory_id(&self) -> Option<u32> {
        match self {
            Slot::Head => Some(9),
            Slot::Face => Some(10),
            Slot::FaceAccessory => Some(21),
            Slot::Hair => Some(20),
            Slot::Shirt => Some(12),
            Slot::TShirt => Some(13),
            Slot::Pants => Some(14),
            Slot::BackAccessory => Some(25),
            Slot::NeckAccessory => Some(22),
            Slot::ShoulderAccessory => Some(23),
            Slot::FrontAccessory => Some(24),
            Slot::WaistAccessory => Some(26),
            Slot::HeadBodypart => Some(15),
            Slot::DynamicHead => Some(66),
            Slot::Bundle => Some(37),
            Slot::Emote => Some(39),
            Slot::Unknown => None,
        }
    }

    pub fn from_subcategory(id: u32) -> Option<Slot> {
        SUBCATEGORY_SLOTS
            .iter()
            .find(|(sub, _)| *sub == id)
            .map(|(_, slot)| *slot)
    }

    pub fn from_asset_type(id: u32) -> Option<Slot> {
        ASSET_TYPE_SLOTS
            .iter()
            .find(|(asset_type, _)| *asset_type == id)
            .map(|(_, slot)| *slot)
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// First slot keyword found in `text`, following table order
pub fn first_slot_keyword(text: &str) -> Option<Slot> {
    let tokens = text::tokens(text);
    SLOT_KEYWORDS
        .iter()
        .find(|(keyword, _)| text::contains_word(&tokens, keyword))
        .map(|(_, slot)| *slot)
}

/// Every distinct slot mentioned in `text`, in canonical order
pub fn mentioned_slots(text: &str) -> Vec<Slot> {
    let tokens = text::tokens(text);
    let mut slots: Vec<Slot> = SLOT_KEYWORDS
        .iter()
        .filter(|(keyword, _)| text::contains_word(&tokens, keyword))
        .map(|(_, slot)| *slot)
        .collect();
    slots.sort();
    slots.dedup();
    slots
}

/// True when `word` is one of the slot keywords
pub fn is_slot_word(word: &str) -> bool {
    SLOT_KEYWORDS
        .iter()
        .any(|(keyword, _)| text::word_matches(word, keyword))
}
