//! Data model for creature cards

use serde::{Deserialize, Serialize};

/// One attack listed on a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attack {
    pub name: String,
    pub damage: u32,
}

impl Attack {
    pub fn new(name: impl Into<String>, damage: u32) -> Self {
        Self { name: name.into(), damage }
    }
}

/// A creature to be rendered as a card.
///
/// Matches the roster fixture shape:
/// `{"name", "type", "hp", "attack", "defense", "attacks": [{"name", "damage"}], "text"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatureRecord {
    pub name: String,
    /// Type name, looked up in the palette table
    #[serde(rename = "type")]
    pub kind: String,
    pub hp: u32,
    pub attack: u32,
    pub defense: u32,
    /// Two or three attacks, in display order
    pub attacks: Vec<Attack>,
    /// Flavor text shown at the bottom of the card
    #[serde(rename = "text", default)]
    pub flavor_text: String,
}

impl CreatureRecord {
    /// Build a record from the positional arguments of the legacy card entry point.
    ///
    /// The legacy entry point has no flavor text, so it is left empty.
    pub fn from_legacy(
        name: &str,
        kind: &str,
        attack: u32,
        defense: u32,
        hp: u32,
        attacks: &[(String, u32)],
    ) -> Self {
        Self {
            name: name.to_string(),
            kind: kind.to_string(),
            hp,
            attack,
            defense,
            attacks: attacks.iter().map(|(n, d)| Attack::new(n.clone(), *d)).collect(),
            flavor_text: String::new(),
        }
    }
}
