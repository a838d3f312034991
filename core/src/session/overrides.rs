//! Manual hit-type overrides.
//!
//! Logs do not carry attack types, so hit types are corrected from a
//! persisted mapping after every parse. Overrides are keyed by uppercase
//! hex ability id. Changing a hit type feeds the Feint/Addle splits, so
//! affected attempts re-run reconstruction from their stored interval
//! history; nothing else is touched.

use std::collections::HashMap;

use crate::effects::reconstruct_hit;
use crate::game_data::HitType;

use super::{Attempt, RaidSession};

/// Apply overrides to every matching hit in the session. Returns the
/// number of hits whose type changed.
pub fn apply_hit_type_overrides(
    session: &mut RaidSession,
    overrides: &HashMap<String, HitType>,
) -> usize {
    if overrides.is_empty() {
        return 0;
    }

    let mut applied = 0;
    for fight in &mut session.fights {
        for attempt in &mut fight.attempts {
            applied += apply_to_attempt(attempt, overrides);
        }
    }
    applied
}

fn apply_to_attempt(attempt: &mut Attempt, overrides: &HashMap<String, HitType>) -> usize {
    let mut changed = 0;
    let Attempt {
        ability_hits,
        mitigations,
        ..
    } = attempt;

    for hit in ability_hits.iter_mut() {
        let key = format!("{:X}", hit.ability_id);
        if let Some(&hit_type) = overrides.get(&key)
            && hit.hit_type != hit_type
        {
            hit.hit_type = hit_type;
            reconstruct_hit(hit, mitigations);
            changed += 1;
        }
    }
    changed
}
