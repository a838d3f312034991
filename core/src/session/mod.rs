mod entities;
mod fight;
mod overrides;
mod processor;

#[cfg(test)]
mod processor_tests;

pub use entities::{Entity, EntityCategory, EntityRegistry};
pub use fight::{
    AbilityHit, Attempt, AttemptOutcome, DebuffApplication, DebuffSource, Fight, HeadMark,
    PlayerDeath,
};
pub use overrides::apply_hit_type_overrides;
pub use processor::{CastTarget, ParserState, SessionParser};

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::context::resolve;

/// Everything reconstructed from one log: the combatant registry, the
/// ordered fight list and the line counters. Rebuilt from scratch on
/// every parse - no state survives across runs except the externally
/// persisted hit-type overrides.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RaidSession {
    pub start_time: Option<NaiveDateTime>,
    pub registry: EntityRegistry,
    pub fights: Vec<Fight>,
    pub lines_processed: u64,
    pub lines_dropped: u64,
}

impl RaidSession {
    pub fn current_fight(&self) -> Option<&Fight> {
        self.fights.last()
    }

    pub fn current_fight_mut(&mut self) -> Option<&mut Fight> {
        self.fights.last_mut()
    }

    pub fn current_attempt(&self) -> Option<&Attempt> {
        self.current_fight().and_then(|f| f.current_attempt())
    }

    /// Completed attempts across all fights, in file order.
    pub fn completed_attempts(&self) -> impl Iterator<Item = &Attempt> {
        self.fights.iter().flat_map(|f| f.completed_attempts())
    }

    pub fn total_wipes(&self) -> usize {
        self.fights.iter().map(|f| f.total_wipes()).sum()
    }

    pub fn total_victories(&self) -> usize {
        self.fights.iter().map(|f| f.total_victories()).sum()
    }

    /// Aggregation across every completed attempt, for the stats surface.
    pub fn cross_attempt_stats(&self) -> SessionStats {
        let mut stats = SessionStats {
            total_fights: self.fights.len(),
            total_attempts: self.completed_attempts().count(),
            total_wipes: self.total_wipes(),
            total_victories: self.total_victories(),
            ..SessionStats::default()
        };

        for attempt in self.completed_attempts() {
            for hit in &attempt.ability_hits {
                *stats
                    .hits_by_ability
                    .entry(resolve(hit.ability_name).to_string())
                    .or_default() += 1;
            }
            for death in &attempt.deaths {
                *stats
                    .deaths_by_player
                    .entry(resolve(death.player_name).to_string())
                    .or_default() += 1;
            }
            for debuff in &attempt.debuffs {
                *stats
                    .debuffs_by_effect
                    .entry(resolve(debuff.effect_name).to_string())
                    .or_default() += 1;
            }
        }

        stats
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionStats {
    pub total_fights: usize,
    pub total_attempts: usize,
    pub total_wipes: usize,
    pub total_victories: usize,
    pub hits_by_ability: BTreeMap<String, u64>,
    pub deaths_by_player: BTreeMap<String, u64>,
    pub debuffs_by_effect: BTreeMap<String, u64>,
}

/// Parse an ordered line source into a fresh session.
pub fn parse_lines<'a, I>(lines: I) -> RaidSession
where
    I: IntoIterator<Item = &'a str>,
{
    let mut parser = SessionParser::new();
    for line in lines {
        parser.process_line(line);
    }
    parser.finish()
}
