//! Unmitigated damage reconstruction.
//!
//! Replays, for every recorded hit, the mitigation state of its target at
//! the hit's timestamp and inverts the reduction to recover the
//! pre-mitigation figure. Shield absorption reported by effect-result
//! deltas is added back before the percent inversion.

use crate::combat_log::HitKind;
use crate::game_data::HitType;
use crate::session::{AbilityHit, Attempt};

use super::{MitigationInterval, MitigationTracker};

/// Combined mitigation is clamped below total: a hit that was observed at
/// all cannot have been 100% mitigated, so anything at or above this is a
/// data problem and the result is flagged low-confidence instead.
const MAX_COMBINED_MITIGATION: f64 = 0.99;

/// Fill `unmitigated_damage` for every hit of an attempt, in timestamp
/// order, from the attempt's recorded interval history. Only the two
/// reconstruction fields are touched.
pub fn reconstruct_attempt(attempt: &mut Attempt) {
    let Attempt {
        ability_hits,
        mitigations,
        ..
    } = attempt;
    for hit in ability_hits.iter_mut() {
        reconstruct_hit(hit, mitigations);
    }
}

/// Reconstruct a single hit against the interval history.
pub fn reconstruct_hit(hit: &mut AbilityHit, tracker: &MitigationTracker) {
    if hit.kind != HitKind::Damage {
        hit.unmitigated_damage = Some(0);
        return;
    }

    let absorbed = hit.absorbed_damage.unwrap_or(0);
    let base = hit.damage + absorbed;
    if base == 0 {
        hit.unmitigated_damage = Some(0);
        return;
    }

    let active = tracker.mitigations_affecting(hit.target_id, hit.timestamp);
    let mut combined = combined_mitigation(&active, hit.hit_type);

    if combined >= MAX_COMBINED_MITIGATION {
        combined = MAX_COMBINED_MITIGATION;
        hit.low_confidence = true;
    }

    hit.unmitigated_damage = if combined <= 0.0 {
        Some(base)
    } else {
        Some((base as f64 / (1.0 - combined)).round() as u32)
    };
}

/// Successive reductions compound multiplicatively: two independent 10%
/// mitigations leave 0.9 * 0.9 of the damage, not 0.8.
fn combined_mitigation(active: &[&MitigationInterval], hit_type: HitType) -> f64 {
    let mut multiplier = 1.0f64;
    for interval in active {
        multiplier *= 1.0 - f64::from(interval.percent_for(hit_type)) / 100.0;
    }
    1.0 - multiplier
}
