use std::fmt;

use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};

use super::damage::DecodedHit;
use crate::context::IStr;

/// Actor id as logged by the client add-on. The high byte encodes the
/// actor category: `0x10` for players, `0x40` for NPCs, `0xE0000000` for
/// the environment pseudo-actor. This id-range convention, not name
/// matching, is authoritative for categorisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActorId(pub u32);

impl ActorId {
    pub const ENVIRONMENT: ActorId = ActorId(0xE000_0000);

    pub fn from_hex(s: &str) -> Option<ActorId> {
        u32::from_str_radix(s, 16).ok().map(ActorId)
    }

    #[inline]
    pub fn is_player(self) -> bool {
        self.0 >> 24 == 0x10
    }

    #[inline]
    pub fn is_enemy(self) -> bool {
        self.0 >> 24 == 0x40
    }

    #[inline]
    pub fn is_environment(self) -> bool {
        self == Self::ENVIRONMENT
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08X}", self.0)
    }
}

impl Serialize for ActorId {
    fn serialize<S: Serializer>(&self, ser: S) -> Result<S::Ok, S::Error> {
        ser.collect_str(self)
    }
}

/// One classified log line. Closed variant over the nine recognized
/// line-type codes; anything else never makes it past the parser.
#[derive(Debug, Clone)]
pub enum LogLine {
    /// 01 - zone change
    ZoneChange(ZoneChange),
    /// 03 - combatant registration
    AddCombatant(AddCombatant),
    /// 20 - cast begins (predicts a later ability line)
    StartsCasting(CastStart),
    /// 21 (single target) / 22 (AoE) - ability resolved
    Ability(AbilityUse),
    /// 25 - death
    Death(DeathLine),
    /// 26 - status effect applied
    StatusApply(StatusApply),
    /// 27 - head marker placed
    HeadMarker(HeadMarkerLine),
    /// 33 - director control signal (commence/victory/wipe/...)
    ActorControl(ActorControl),
    /// 37 - effect resolution with post-effect HP/shield state
    EffectResult(EffectResult),
}

impl LogLine {
    /// Get the timestamp from any line variant.
    pub fn timestamp(&self) -> NaiveDateTime {
        match self {
            Self::ZoneChange(l) => l.timestamp,
            Self::AddCombatant(l) => l.timestamp,
            Self::StartsCasting(l) => l.timestamp,
            Self::Ability(l) => l.timestamp,
            Self::Death(l) => l.timestamp,
            Self::StatusApply(l) => l.timestamp,
            Self::HeadMarker(l) => l.timestamp,
            Self::ActorControl(l) => l.timestamp,
            Self::EffectResult(l) => l.timestamp,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ZoneChange {
    pub timestamp: NaiveDateTime,
    pub zone_id: u32,
    pub zone_name: IStr,
}

#[derive(Debug, Clone)]
pub struct AddCombatant {
    pub timestamp: NaiveDateTime,
    pub id: ActorId,
    pub name: IStr,
    pub job_id: u8,
    pub level: u8,
    pub max_hp: u32,
}

#[derive(Debug, Clone)]
pub struct CastStart {
    pub timestamp: NaiveDateTime,
    pub source_id: ActorId,
    pub source_name: IStr,
    pub ability_id: u32,
    pub ability_name: IStr,
    pub target_id: ActorId,
    pub target_name: IStr,
    pub cast_secs: f32,
}

#[derive(Debug, Clone)]
pub struct AbilityUse {
    pub timestamp: NaiveDateTime,
    pub source_id: ActorId,
    pub source_name: IStr,
    pub ability_id: u32,
    pub ability_name: IStr,
    pub target_id: ActorId,
    pub target_name: IStr,
    /// Decoded sub-hits from the effect pair block (multi-hit abilities
    /// pack several strikes into one line).
    pub hits: Vec<DecodedHit>,
    /// Correlation key shared with the later EffectResult line.
    pub sequence_id: Option<u32>,
    pub aoe: bool,
    pub target_current_hp: u32,
    pub target_max_hp: u32,
}

#[derive(Debug, Clone)]
pub struct DeathLine {
    pub timestamp: NaiveDateTime,
    pub target_id: ActorId,
    pub target_name: IStr,
    /// Killing blow source, when the add-on could attribute one.
    pub source_id: Option<ActorId>,
    pub source_name: IStr,
}

#[derive(Debug, Clone)]
pub struct StatusApply {
    pub timestamp: NaiveDateTime,
    pub effect_id: u32,
    pub effect_name: IStr,
    pub duration_secs: f32,
    pub source_id: ActorId,
    pub source_name: IStr,
    pub target_id: ActorId,
    pub target_name: IStr,
    pub stacks: u8,
    pub target_max_hp: u32,
}

#[derive(Debug, Clone)]
pub struct HeadMarkerLine {
    pub timestamp: NaiveDateTime,
    pub target_id: ActorId,
    pub target_name: IStr,
    pub marker_id: u32,
}

#[derive(Debug, Clone)]
pub struct ActorControl {
    pub timestamp: NaiveDateTime,
    pub instance_id: u32,
    pub command: u32,
    pub params: [u32; 4],
}

#[derive(Debug, Clone)]
pub struct EffectResult {
    pub timestamp: NaiveDateTime,
    pub target_id: ActorId,
    pub target_name: IStr,
    pub sequence_id: u32,
    pub current_hp: u32,
    pub max_hp: u32,
    /// Remaining shield as a percentage of max HP (0-100).
    pub shield_percent: u8,
}
