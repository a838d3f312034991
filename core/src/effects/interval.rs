//! Time-bounded mitigation intervals.
//!
//! An interval opens when a status-apply line registers a known mitigation
//! or shield, and closes at its declared expiry, at a refresh from the
//! same effect, or at the target's death. Open-ended intervals (no
//! declared duration) stay active until superseded.

use chrono::NaiveDateTime;

use crate::combat_log::ActorId;
use crate::context::IStr;
use crate::game_data::HitType;

#[derive(Debug, Clone)]
pub struct MitigationInterval {
    pub effect_id: u32,
    pub effect_name: IStr,
    pub source_id: ActorId,
    pub target_id: ActorId,
    pub start: NaiveDateTime,
    /// None while open-ended; set by declared duration, refresh clipping
    /// or explicit expiry.
    pub end: Option<NaiveDateTime>,
    pub physical_percent: f32,
    pub magical_percent: f32,
    pub is_boss_debuff: bool,
    pub is_shield: bool,
    pub stacks: u8,
}

impl MitigationInterval {
    /// Interval coverage is half-open: [start, end).
    pub fn covers(&self, time: NaiveDateTime) -> bool {
        self.start <= time && self.end.is_none_or(|end| time < end)
    }

    /// The reduction percentage applying to a hit of the given type.
    /// Unknown and special hits take the larger of the two values, the
    /// same assumption the add-on definitions make when the type cannot
    /// be resolved.
    pub fn percent_for(&self, hit_type: HitType) -> f32 {
        match hit_type {
            HitType::Physical => self.physical_percent,
            HitType::Magical => self.magical_percent,
            HitType::Special | HitType::Unknown => {
                self.physical_percent.max(self.magical_percent)
            }
        }
    }
}
