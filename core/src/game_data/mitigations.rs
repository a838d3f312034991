//! Static mitigation knowledge base.
//!
//! Maps status effect ids to their damage-reduction data: player-side
//! mitigation buffs, enemy-side debuffs (Reprisal, Feint, Addle), and
//! absorption shields. Sourced from the client add-on's definition tables
//! for patch 7.1x. A lookup miss means 0% mitigation, never a failure.
//!
//! Effect ids are the numeric values from status-apply lines. Some add-on
//! builds report inconsistent ids for renamed effects, so a display-name
//! fallback map exists for those.

use phf::phf_map;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MitigationKind {
    /// Reduces damage the buffed target takes.
    PlayerBuff,
    /// Reduces damage the debuffed enemy deals.
    BossDebuff,
    /// Absorbs damage up to a capacity learned from effect-result deltas.
    Shield,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MitigationInfo {
    pub name: &'static str,
    pub kind: MitigationKind,
    pub physical_percent: f32,
    pub magical_percent: f32,
    /// Reapplication accumulates stacks instead of refreshing.
    pub stacking: bool,
}

impl MitigationInfo {
    pub fn is_shield(&self) -> bool {
        self.kind == MitigationKind::Shield
    }

    pub fn is_boss_debuff(&self) -> bool {
        self.kind == MitigationKind::BossDebuff
    }
}

const fn buff(name: &'static str, percent: f32) -> MitigationInfo {
    MitigationInfo {
        name,
        kind: MitigationKind::PlayerBuff,
        physical_percent: percent,
        magical_percent: percent,
        stacking: false,
    }
}

const fn buff_split(name: &'static str, physical: f32, magical: f32) -> MitigationInfo {
    MitigationInfo {
        name,
        kind: MitigationKind::PlayerBuff,
        physical_percent: physical,
        magical_percent: magical,
        stacking: false,
    }
}

const fn debuff(name: &'static str, physical: f32, magical: f32) -> MitigationInfo {
    MitigationInfo {
        name,
        kind: MitigationKind::BossDebuff,
        physical_percent: physical,
        magical_percent: magical,
        stacking: false,
    }
}

const fn shield(name: &'static str) -> MitigationInfo {
    MitigationInfo {
        name,
        kind: MitigationKind::Shield,
        physical_percent: 0.0,
        magical_percent: 0.0,
        stacking: false,
    }
}

static MITIGATIONS: phf::Map<u32, MitigationInfo> = phf_map! {
    // Tank role action
    0x4A7u32 => buff("Rampart", 20.0),
    // Paladin
    0x4Au32 => buff("Sentinel", 30.0),
    0xEF5u32 => buff("Guardian", 40.0),
    0x740u32 => buff("Sheltron", 15.0),
    0xA72u32 => buff("Holy Sheltron", 15.0),
    0x498u32 => buff("Arms Up", 15.0),
    0x496u32 => buff("Intervention", 10.0),
    0xA73u32 => buff("Knight's Resolve", 10.0),
    // Warrior
    0x59u32 => buff("Vengeance", 30.0),
    0xEF8u32 => buff("Damnation", 40.0),
    0x2DFu32 => buff("Raw Intuition", 10.0),
    0xA76u32 => buff("Bloodwhetting", 10.0),
    0xA77u32 => buff("Stem the Flow", 10.0),
    0x742u32 => buff("Nascent Glint", 10.0),
    // Dark Knight
    0x2EBu32 => buff("Shadow Wall", 30.0),
    0xEFBu32 => buff("Shadowed Vigil", 40.0),
    0x2EAu32 => buff_split("Dark Mind", 0.0, 20.0),
    0xA7Au32 => buff("Oblation", 10.0),
    0x766u32 => buff_split("Dark Missionary", 0.0, 10.0),
    // Gunbreaker
    0x728u32 => buff("Camouflage", 10.0),
    0x72Au32 => buff("Nebula", 30.0),
    0xEFEu32 => buff("Great Nebula", 40.0),
    0x730u32 => buff("Heart of Stone", 15.0),
    0xA7Bu32 => buff("Heart of Corundum", 15.0),
    0xA7Cu32 => buff("Clarity of Corundum", 15.0),
    0x72Fu32 => buff_split("Heart of Light", 0.0, 10.0),
    // White Mage
    0x751u32 => buff("Temperance", 10.0),
    0xA94u32 => buff("Aquaveil", 15.0),
    // Scholar
    0x12Bu32 => buff("Sacred Soil", 10.0),
    0xA98u32 => buff("Expedience", 10.0),
    0x13Du32 => buff_split("Fey Illumination", 0.0, 5.0),
    0x753u32 => buff_split("Seraphic Illumination", 0.0, 5.0),
    // Astrologian
    0x351u32 => buff("Collective Unconscious", 10.0),
    0xA9Du32 => buff("Exaltation", 10.0),
    0x75Du32 => buff("The Spear", 10.0),
    0xF38u32 => buff("Sun Sign", 10.0),
    // Sage
    0xA3Au32 => buff("Kerachole", 10.0),
    0xA3Bu32 => buff("Taurochole", 10.0),
    0xBBBu32 => buff("Holos", 10.0),
    // Physical ranged party mitigation
    0x78Eu32 => buff("Troubadour", 15.0),
    0x79Fu32 => buff("Tactician", 15.0),
    0x722u32 => buff("Shield Samba", 15.0),
    // Caster party mitigation
    0xA93u32 => buff_split("Magick Barrier", 0.0, 10.0),

    // Enemy-side debuffs. Feint and Addle have split values per damage
    // type; the split applies only when the hit type is known.
    0x4A9u32 => debuff("Reprisal", 10.0, 10.0),
    0x4ABu32 => debuff("Feint", 10.0, 5.0),
    0x4B3u32 => debuff("Addle", 5.0, 10.0),
    0x35Cu32 => debuff("Dismantle", 10.0, 10.0),

    // Absorption shields. Capacity is not declared on the apply line; it
    // is reconstructed from effect-result shield deltas.
    0x129u32 => shield("Galvanize"),
    0x4C2u32 => shield("Divine Benison"),
    0x77Du32 => shield("Seraphic Veil"),
    0xA2Fu32 => shield("Eukrasian Diagnosis"),
    0xA31u32 => shield("Eukrasian Prognosis"),
};

/// Name fallback for add-on builds that log renamed effect ids.
static MITIGATIONS_BY_NAME: phf::Map<&'static str, u32> = phf_map! {
    "Rampart" => 0x4A7u32,
    "Sentinel" => 0x4Au32,
    "Guardian" => 0xEF5u32,
    "Vengeance" => 0x59u32,
    "Damnation" => 0xEF8u32,
    "Shadow Wall" => 0x2EBu32,
    "Shadowed Vigil" => 0xEFBu32,
    "Nebula" => 0x72Au32,
    "Great Nebula" => 0xEFEu32,
    "Reprisal" => 0x4A9u32,
    "Feint" => 0x4ABu32,
    "Addle" => 0x4B3u32,
    "Dismantle" => 0x35Cu32,
    "Galvanize" => 0x129u32,
};

pub fn lookup_effect(effect_id: u32) -> Option<&'static MitigationInfo> {
    MITIGATIONS.get(&effect_id)
}

pub fn lookup_effect_by_name(name: &str) -> Option<&'static MitigationInfo> {
    MITIGATIONS_BY_NAME
        .get(name)
        .and_then(|id| MITIGATIONS.get(id))
}
