//! Fight and attempt model.
//!
//! A Fight groups every pull of one boss/zone context; an Attempt buffers
//! the events of a single pull. Exactly one attempt per fight is open at
//! any time, and it is always the last one.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::combat_log::{ActorId, HitKind, HitQualifier};
use crate::context::{IStr, empty_istr, serialize_istr, serialize_opt_istr};
use crate::effects::MitigationTracker;
use crate::game_data::HitType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptOutcome {
    InProgress,
    Wipe,
    Victory,
}

/// One enemy ability connecting with (or missing) a player.
#[derive(Debug, Clone, Serialize)]
pub struct AbilityHit {
    pub timestamp: NaiveDateTime,
    /// Seconds from the attempt's timeline start.
    pub relative_secs: f32,
    pub ability_id: u32,
    #[serde(serialize_with = "serialize_istr")]
    pub ability_name: IStr,
    pub source_id: ActorId,
    #[serde(serialize_with = "serialize_istr")]
    pub source_name: IStr,
    pub target_id: ActorId,
    #[serde(serialize_with = "serialize_istr")]
    pub target_name: IStr,
    /// Observed (post-mitigation) damage.
    pub damage: u32,
    pub kind: HitKind,
    pub qualifier: HitQualifier,
    /// Filled by shield reconciliation when an effect-result delta shows
    /// absorption.
    pub absorbed_damage: Option<u32>,
    /// Filled by reconstruction.
    pub unmitigated_damage: Option<u32>,
    pub hit_type: HitType,
    /// Set when the damage token was malformed or mitigation had to be
    /// clamped; the figure is approximate.
    pub low_confidence: bool,
    #[serde(skip)]
    pub sequence_id: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DebuffSource {
    Enemy,
    Environment,
    PlayerMitigation,
}

/// One status effect landing on a tracked participant.
#[derive(Debug, Clone, Serialize)]
pub struct DebuffApplication {
    pub timestamp: NaiveDateTime,
    pub relative_secs: f32,
    pub effect_id: u32,
    #[serde(serialize_with = "serialize_istr")]
    pub effect_name: IStr,
    pub duration_secs: f32,
    pub source_id: ActorId,
    #[serde(serialize_with = "serialize_istr")]
    pub source_name: IStr,
    pub target_id: ActorId,
    #[serde(serialize_with = "serialize_istr")]
    pub target_name: IStr,
    pub stacks: u8,
    pub source_kind: DebuffSource,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerDeath {
    pub timestamp: NaiveDateTime,
    pub relative_secs: f32,
    pub player_id: ActorId,
    #[serde(serialize_with = "serialize_istr")]
    pub player_name: IStr,
    /// Killing blow attribution, when the log carried one.
    #[serde(serialize_with = "serialize_opt_istr")]
    pub source_name: Option<IStr>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HeadMark {
    pub timestamp: NaiveDateTime,
    pub relative_secs: f32,
    pub target_id: ActorId,
    #[serde(serialize_with = "serialize_istr")]
    pub target_name: IStr,
    pub marker_id: u32,
    pub marker_name: String,
}

/// One pull, commence to wipe/victory/truncation.
#[derive(Debug, Clone, Serialize)]
pub struct Attempt {
    pub number: u32,
    pub start_time: NaiveDateTime,
    pub end_time: Option<NaiveDateTime>,
    pub outcome: AttemptOutcome,
    #[serde(serialize_with = "serialize_istr")]
    pub boss_name: IStr,
    /// First player damage on an enemy; anchors the timeline.
    pub first_damage_time: Option<NaiveDateTime>,
    pub duration_secs: f32,
    pub ability_hits: Vec<AbilityHit>,
    pub debuffs: Vec<DebuffApplication>,
    pub deaths: Vec<PlayerDeath>,
    pub head_markers: Vec<HeadMark>,
    /// Interval history of the pull, kept so reconstruction can re-run
    /// after hit-type overrides.
    #[serde(skip)]
    pub mitigations: MitigationTracker,
}

impl Attempt {
    pub fn new(number: u32, start_time: NaiveDateTime, boss_name: IStr) -> Self {
        Self {
            number,
            start_time,
            end_time: None,
            outcome: AttemptOutcome::InProgress,
            boss_name,
            first_damage_time: None,
            duration_secs: 0.0,
            ability_hits: Vec::new(),
            debuffs: Vec::new(),
            deaths: Vec::new(),
            head_markers: Vec::new(),
            mitigations: MitigationTracker::new(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.end_time.is_none()
    }

    /// Timeline reference: first player damage when seen, else commence.
    pub fn timeline_start(&self) -> NaiveDateTime {
        self.first_damage_time.unwrap_or(self.start_time)
    }

    /// Stamp relative times onto every buffered event. Runs at close.
    pub fn finalize_relative_times(&mut self) {
        let origin = self.timeline_start();
        let rel = |ts: NaiveDateTime| {
            (ts.signed_duration_since(origin).num_milliseconds() as f32 / 1000.0).max(0.0)
        };

        for hit in &mut self.ability_hits {
            hit.relative_secs = rel(hit.timestamp);
        }
        for debuff in &mut self.debuffs {
            debuff.relative_secs = rel(debuff.timestamp);
        }
        for death in &mut self.deaths {
            death.relative_secs = rel(death.timestamp);
        }
        for marker in &mut self.head_markers {
            marker.relative_secs = rel(marker.timestamp);
        }
    }
}

/// One boss/zone encounter context and its pulls.
#[derive(Debug, Clone, Serialize)]
pub struct Fight {
    pub id: u32,
    pub zone_id: u32,
    #[serde(serialize_with = "serialize_istr")]
    pub zone_name: IStr,
    #[serde(serialize_with = "serialize_istr")]
    pub boss_name: IStr,
    pub start_time: NaiveDateTime,
    pub attempts: Vec<Attempt>,
    /// Players registered while this fight was the open context.
    pub players: Vec<ActorId>,
    /// Highest enemy max HP seen; drives boss-name inference.
    #[serde(skip)]
    pub boss_max_hp: u32,
}

impl Fight {
    pub fn new(id: u32, zone_id: u32, zone_name: IStr, start_time: NaiveDateTime) -> Self {
        Self {
            id,
            zone_id,
            zone_name,
            boss_name: empty_istr(),
            start_time,
            attempts: Vec::new(),
            players: Vec::new(),
            boss_max_hp: 0,
        }
    }

    pub fn current_attempt(&self) -> Option<&Attempt> {
        self.attempts.last()
    }

    pub fn current_attempt_mut(&mut self) -> Option<&mut Attempt> {
        self.attempts.last_mut()
    }

    pub fn open_attempt_mut(&mut self) -> Option<&mut Attempt> {
        self.attempts.last_mut().filter(|a| a.is_open())
    }

    pub fn completed_attempts(&self) -> impl Iterator<Item = &Attempt> {
        self.attempts
            .iter()
            .filter(|a| a.outcome != AttemptOutcome::InProgress)
    }

    pub fn total_wipes(&self) -> usize {
        self.attempts
            .iter()
            .filter(|a| a.outcome == AttemptOutcome::Wipe)
            .count()
    }

    pub fn total_victories(&self) -> usize {
        self.attempts
            .iter()
            .filter(|a| a.outcome == AttemptOutcome::Victory)
            .count()
    }

    pub fn add_player(&mut self, id: ActorId) {
        if !self.players.contains(&id) {
            self.players.push(id);
        }
    }
}
