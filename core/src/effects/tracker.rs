//! Active mitigation tracking.
//!
//! Maintains, per target, the history of mitigation and shield intervals
//! seen during one pull. Intervals are append-only while parsing and are
//! consulted read-only by the unmitigated-damage reconstruction.

use chrono::{Duration, NaiveDateTime};
use hashbrown::HashMap;

use super::MitigationInterval;
use crate::combat_log::ActorId;
use crate::context::IStr;
use crate::game_data::{MitigationInfo, MitigationKind};

#[derive(Debug, Clone, Default)]
pub struct MitigationTracker {
    intervals: HashMap<ActorId, Vec<MitigationInterval>>,
}

impl MitigationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new interval for an effect application.
    ///
    /// Reapplying an effect that is still active on the same target
    /// refreshes it: the old interval's end is clipped to the new start,
    /// so at no point do two intervals of the same effect overlap. Effects
    /// marked stack-accumulating instead increment their stack count and
    /// extend the open interval.
    pub fn apply(
        &mut self,
        target_id: ActorId,
        effect_id: u32,
        effect_name: IStr,
        source_id: ActorId,
        start: NaiveDateTime,
        duration_secs: f32,
        info: &MitigationInfo,
    ) {
        let end = declared_end(start, duration_secs);
        let list = self.intervals.entry(target_id).or_default();

        if let Some(open) = list
            .iter_mut()
            .rev()
            .find(|iv| iv.effect_id == effect_id && iv.covers(start))
        {
            if info.stacking {
                open.stacks = open.stacks.saturating_add(1);
                open.end = match (open.end, end) {
                    (Some(a), Some(b)) => Some(a.max(b)),
                    _ => None,
                };
                return;
            }
            open.end = Some(start);
        }

        list.push(MitigationInterval {
            effect_id,
            effect_name,
            source_id,
            target_id,
            start,
            end,
            physical_percent: info.physical_percent,
            magical_percent: info.magical_percent,
            is_boss_debuff: info.kind == MitigationKind::BossDebuff,
            is_shield: info.kind == MitigationKind::Shield,
            stacks: 1,
        });
    }

    /// Close an open interval early on an explicit removal signal.
    pub fn expire(&mut self, target_id: ActorId, effect_id: u32, time: NaiveDateTime) {
        if let Some(list) = self.intervals.get_mut(&target_id)
            && let Some(iv) = list
                .iter_mut()
                .rev()
                .find(|iv| iv.effect_id == effect_id && iv.covers(time))
        {
            iv.end = Some(time);
        }
    }

    /// Close every interval covering `time` on a target (death handling).
    pub fn expire_all(&mut self, target_id: ActorId, time: NaiveDateTime) {
        if let Some(list) = self.intervals.get_mut(&target_id) {
            for iv in list.iter_mut().filter(|iv| iv.covers(time)) {
                iv.end = Some(time);
            }
        }
    }

    /// Every interval on `target_id` covering `time`.
    pub fn active_at(&self, target_id: ActorId, time: NaiveDateTime) -> Vec<&MitigationInterval> {
        self.intervals
            .get(&target_id)
            .map(|list| list.iter().filter(|iv| iv.covers(time)).collect())
            .unwrap_or_default()
    }

    /// Every enemy-side debuff interval covering `time`, regardless of
    /// which enemy carries it. Damage-dealt reductions apply to every
    /// player the debuffed enemy hits.
    pub fn active_boss_debuffs_at(&self, time: NaiveDateTime) -> Vec<&MitigationInterval> {
        self.intervals
            .values()
            .flatten()
            .filter(|iv| iv.is_boss_debuff && iv.covers(time))
            .collect()
    }

    /// Percent mitigations affecting a hit on `target_id` at `time`:
    /// the target's own buffs plus all enemy-side debuffs. Shields are
    /// excluded; absorption is reconciled separately.
    pub fn mitigations_affecting(
        &self,
        target_id: ActorId,
        time: NaiveDateTime,
    ) -> Vec<&MitigationInterval> {
        let mut out: Vec<&MitigationInterval> = self
            .active_at(target_id, time)
            .into_iter()
            .filter(|iv| !iv.is_shield && !iv.is_boss_debuff)
            .collect();
        out.extend(self.active_boss_debuffs_at(time));
        out
    }

    /// Shield intervals covering a hit on `target_id` at `time`.
    pub fn shields_at(&self, target_id: ActorId, time: NaiveDateTime) -> Vec<&MitigationInterval> {
        self.active_at(target_id, time)
            .into_iter()
            .filter(|iv| iv.is_shield)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.values().all(|list| list.is_empty())
    }

    pub fn clear(&mut self) {
        self.intervals.clear();
    }
}

fn declared_end(start: NaiveDateTime, duration_secs: f32) -> Option<NaiveDateTime> {
    if duration_secs > 0.0 {
        Some(start + Duration::milliseconds((duration_secs * 1000.0) as i64))
    } else {
        None
    }
}
