//! Hit type classification for damage-type-specific mitigation.
//!
//! The game's attack-type table splits into physical (slash, thrust,
//! strike, shoot), magical (magic, breath, sound wave) and special (limit
//! break) categories. Logs do not carry the attack type, so hits start
//! Unknown and are corrected through the persisted override mapping.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HitType {
    Physical,
    Magical,
    Special,
    #[default]
    Unknown,
}

impl HitType {
    /// Map a game attack-type id to its mitigation category.
    pub fn from_attack_type(attack_type_id: u8) -> HitType {
        match attack_type_id {
            1..=4 => HitType::Physical,
            5..=7 => HitType::Magical,
            8 => HitType::Special,
            _ => HitType::Unknown,
        }
    }
}

impl fmt::Display for HitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HitType::Physical => "Physical",
            HitType::Magical => "Magical",
            HitType::Special => "Special",
            HitType::Unknown => "Unknown",
        };
        f.write_str(s)
    }
}

impl FromStr for HitType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "physical" => Ok(HitType::Physical),
            "magical" | "magic" => Ok(HitType::Magical),
            "special" => Ok(HitType::Special),
            "unknown" => Ok(HitType::Unknown),
            _ => Err(()),
        }
    }
}
