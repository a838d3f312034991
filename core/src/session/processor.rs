//! The fight/attempt state machine.
//!
//! Consumes classified lines in file order and maintains the current
//! zone/fight/attempt context:
//!
//! - Idle: no combat zone entered
//! - InInstance: zone entered, no active pull
//! - InCombat: attempt open, events being recorded
//! - WipePending: wipe observed or every player dead, awaiting the
//!   confirming signal before the attempt closes
//!
//! No line is ever fatal. Unrecognized lines increment a drop counter,
//! control signals arriving in unexpected states are ignored, and
//! end-of-input force-closes whatever is still open.

use std::mem;

use chrono::NaiveDateTime;
use hashbrown::{HashMap, HashSet};
use tracing::{debug, warn};

use crate::combat_log::{
    AbilityUse, ActorControl, ActorId, AddCombatant, CastStart, DeathLine, EffectResult, HitKind,
    HitQualifier, HeadMarkerLine, LogLine, StatusApply, ZoneChange, parse_line,
};
use crate::context::{intern, resolve};
use crate::effects::{MitigationTracker, reconstruct_attempt};
use crate::game_data::{
    HitType, control_command, head_marker_label, is_non_combat_zone, is_player_pet, lookup_effect,
    lookup_effect_by_name,
};

use super::fight::{
    AbilityHit, Attempt, AttemptOutcome, DebuffApplication, DebuffSource, Fight, HeadMark,
    PlayerDeath,
};
use super::RaidSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    Idle,
    InInstance,
    InCombat,
    WipePending,
}

/// A hit awaiting its effect-result line for shield reconciliation.
#[derive(Debug, Clone, Copy)]
struct PendingHit {
    hit_index: usize,
    target_id: ActorId,
    shield_before: u8,
    max_hp_before: u32,
}

/// Transient "who is the boss casting on" pointer. Best-effort timeline
/// aid only; never persisted as a first-class event.
#[derive(Debug, Clone, Copy)]
pub struct CastTarget {
    pub source_id: ActorId,
    pub ability_id: u32,
    pub target_id: ActorId,
    pub timestamp: NaiveDateTime,
}

/// One parse pass over one log. Construct fresh per run; there is no
/// ambient state and no accumulation across runs.
pub struct SessionParser {
    state: ParserState,
    session: RaidSession,
    /// Live interval history for the open attempt; moved into the attempt
    /// at close.
    tracker: MitigationTracker,
    pending_wipe_time: Option<NaiveDateTime>,
    dead_players: HashSet<ActorId>,
    /// Last reported shield state per player: (percent of max HP, max HP).
    player_shields: HashMap<ActorId, (u8, u32)>,
    /// Hits keyed by sequence id, awaiting effect-result correlation.
    pending_hits: HashMap<u32, Vec<PendingHit>>,
    cast_target: Option<CastTarget>,
    last_timestamp: Option<NaiveDateTime>,
}

impl Default for SessionParser {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionParser {
    pub fn new() -> Self {
        Self {
            state: ParserState::Idle,
            session: RaidSession::default(),
            tracker: MitigationTracker::new(),
            pending_wipe_time: None,
            dead_players: HashSet::new(),
            player_shields: HashMap::new(),
            pending_hits: HashMap::new(),
            cast_target: None,
            last_timestamp: None,
        }
    }

    pub fn state(&self) -> ParserState {
        self.state
    }

    pub fn session(&self) -> &RaidSession {
        &self.session
    }

    pub fn cast_target(&self) -> Option<CastTarget> {
        self.cast_target
    }

    /// Consume one raw line. Malformed or unknown lines are counted and
    /// dropped; nothing here aborts the pass.
    pub fn process_line(&mut self, raw: &str) {
        let raw = raw.trim();
        if raw.is_empty() {
            return;
        }
        self.session.lines_processed += 1;

        let Some(line) = parse_line(raw) else {
            self.session.lines_dropped += 1;
            return;
        };
        self.last_timestamp = Some(line.timestamp());

        match line {
            LogLine::ZoneChange(z) => self.handle_zone_change(z),
            LogLine::AddCombatant(c) => self.handle_add_combatant(c),
            LogLine::StartsCasting(c) => self.handle_cast_start(c),
            LogLine::Ability(a) => self.handle_ability(a),
            LogLine::Death(d) => self.handle_death(d),
            LogLine::StatusApply(s) => self.handle_status_apply(s),
            LogLine::HeadMarker(m) => self.handle_head_marker(m),
            LogLine::ActorControl(c) => self.handle_actor_control(c),
            LogLine::EffectResult(r) => self.handle_effect_result(r),
        }
    }

    /// End of input: force-close any open attempt as in-progress and hand
    /// the finished session over.
    pub fn finish(mut self) -> RaidSession {
        let last = self.last_timestamp;
        self.force_close_open_attempt(last);
        self.session
    }

    fn set_state(&mut self, next: ParserState) {
        if self.state != next {
            debug!(from = ?self.state, to = ?next, "parser state change");
            self.state = next;
        }
    }

    // ─── Zone and roster ────────────────────────────────────────────────────

    fn handle_zone_change(&mut self, z: ZoneChange) {
        if self.session.start_time.is_none() {
            self.session.start_time = Some(z.timestamp);
        }

        let zone = resolve(z.zone_name);
        if is_non_combat_zone(zone) {
            self.force_close_open_attempt(Some(z.timestamp));
            self.set_state(ParserState::Idle);
            return;
        }

        self.force_close_open_attempt(Some(z.timestamp));

        // Re-entering the zone we were already in continues the same
        // fight; there is no stronger signal for this, so flag it.
        let continues = self.state != ParserState::Idle
            && self
                .session
                .current_fight()
                .is_some_and(|f| f.zone_name == z.zone_name);

        if continues {
            debug!(zone, "re-entered active zone, continuing fight");
        } else {
            let id = self.session.fights.len() as u32 + 1;
            self.session
                .fights
                .push(Fight::new(id, z.zone_id, z.zone_name, z.timestamp));
        }
        self.set_state(ParserState::InInstance);
    }

    fn handle_add_combatant(&mut self, c: AddCombatant) {
        if resolve(c.name).is_empty() {
            return;
        }
        let is_player = c.id.is_player();
        self.session
            .registry
            .register(c.id, c.name, is_player.then_some(c.job_id), c.max_hp);

        if self.state == ParserState::Idle {
            return;
        }
        let Some(fight) = self.session.current_fight_mut() else {
            return;
        };
        if is_player {
            fight.add_player(c.id);
        } else if c.id.is_enemy() && c.max_hp > fight.boss_max_hp {
            // Boss inference: the highest-health enemy seen in the zone.
            fight.boss_max_hp = c.max_hp;
            fight.boss_name = c.name;
            if let Some(attempt) = fight.open_attempt_mut() {
                attempt.boss_name = c.name;
            }
        }
    }

    // ─── Combat events ──────────────────────────────────────────────────────

    fn handle_cast_start(&mut self, c: CastStart) {
        if self.state != ParserState::InCombat {
            return;
        }
        if !c.source_id.is_enemy() || !c.target_id.is_player() || c.source_id == c.target_id {
            return;
        }
        if resolve(c.ability_name).eq_ignore_ascii_case("attack") {
            return;
        }
        self.cast_target = Some(CastTarget {
            source_id: c.source_id,
            ability_id: c.ability_id,
            target_id: c.target_id,
            timestamp: c.timestamp,
        });
    }

    fn handle_ability(&mut self, a: AbilityUse) {
        if self.state != ParserState::InCombat {
            return;
        }

        if a.target_current_hp > 0 || a.target_max_hp > 0 {
            self.session
                .registry
                .update_health(a.target_id, a.target_current_hp, a.target_max_hp);
        }

        let deals_damage = a.hits.iter().any(|h| h.deals_damage());

        // First player damage on an enemy anchors the attempt timeline.
        if a.source_id.is_player() && a.target_id.is_enemy() && deals_damage {
            if let Some(attempt) = self.open_attempt_mut()
                && attempt.first_damage_time.is_none()
            {
                attempt.first_damage_time = Some(a.timestamp);
            }
            return;
        }

        // Only enemy-on-player lines are recorded; everything else is
        // enemy-on-enemy or player-on-player noise for this model.
        if !a.source_id.is_enemy() || !self.session.registry.is_player(a.target_id) {
            return;
        }
        if resolve(a.target_name).is_empty() {
            return;
        }
        // Auto-attacks are filler between mechanics.
        if resolve(a.ability_name).eq_ignore_ascii_case("attack") {
            return;
        }

        let (shield_before, max_hp_before) = self
            .player_shields
            .get(&a.target_id)
            .copied()
            .unwrap_or((0, 0));

        let recordable: Vec<_> = a
            .hits
            .iter()
            .copied()
            .filter(|h| {
                matches!(
                    h.kind,
                    HitKind::Damage | HitKind::Miss | HitKind::Dodge | HitKind::Invulnerable
                )
            })
            .collect();

        // A malformed damage token still leaves a recordable hit - the
        // timing and targeting information is worth keeping.
        let suspect = recordable.is_empty()
            && a.hits.first().is_some_and(|h| h.kind == HitKind::Unknown);

        let Some(attempt) = self.session.current_fight_mut().and_then(|f| f.open_attempt_mut())
        else {
            return;
        };

        let push_hit = |attempt: &mut Attempt,
                            kind: HitKind,
                            qualifier: HitQualifier,
                            damage: u32,
                            low_confidence: bool|
         -> usize {
            attempt.ability_hits.push(AbilityHit {
                timestamp: a.timestamp,
                relative_secs: 0.0,
                ability_id: a.ability_id,
                ability_name: a.ability_name,
                source_id: a.source_id,
                source_name: a.source_name,
                target_id: a.target_id,
                target_name: a.target_name,
                damage,
                kind,
                qualifier,
                absorbed_damage: None,
                unmitigated_damage: None,
                hit_type: HitType::Unknown,
                low_confidence,
                sequence_id: a.sequence_id,
            });
            attempt.ability_hits.len() - 1
        };

        if suspect {
            push_hit(attempt, HitKind::Unknown, HitQualifier::Normal, 0, true);
            return;
        }

        for hit in recordable {
            let index = push_hit(attempt, hit.kind, hit.qualifier, hit.amount, false);
            if hit.deals_damage()
                && let Some(sequence_id) = a.sequence_id
            {
                self.pending_hits
                    .entry(sequence_id)
                    .or_default()
                    .push(PendingHit {
                        hit_index: index,
                        target_id: a.target_id,
                        shield_before,
                        max_hp_before,
                    });
            }
        }
    }

    fn handle_death(&mut self, d: DeathLine) {
        if !matches!(self.state, ParserState::InCombat | ParserState::WipePending) {
            return;
        }
        // Deaths are inherently player events here; enemy deaths carry no
        // per-pull information this model records.
        if !d.target_id.is_player() {
            return;
        }

        let source_name = (!resolve(d.source_name).is_empty()).then_some(d.source_name);
        if let Some(attempt) = self.open_attempt_mut() {
            attempt.deaths.push(PlayerDeath {
                timestamp: d.timestamp,
                relative_secs: 0.0,
                player_id: d.target_id,
                player_name: d.target_name,
                source_name,
            });
        }

        self.dead_players.insert(d.target_id);
        // Mitigation drops with its owner.
        self.tracker.expire_all(d.target_id, d.timestamp);

        if self.state == ParserState::InCombat && self.all_players_dead() {
            self.pending_wipe_time = Some(d.timestamp);
            self.set_state(ParserState::WipePending);
        }
    }

    fn all_players_dead(&self) -> bool {
        let Some(fight) = self.session.current_fight() else {
            return false;
        };
        !fight.players.is_empty() && fight.players.iter().all(|id| self.dead_players.contains(id))
    }

    fn handle_status_apply(&mut self, s: StatusApply) {
        if self.state != ParserState::InCombat {
            return;
        }

        let effect_name = resolve(s.effect_name);
        let source_is_pet = is_player_pet(resolve(s.source_name));
        let enemy_source = s.source_id.is_enemy() && !source_is_pet;
        let environment_source = s.source_id.is_environment();

        // Boss or mechanic debuff landing on a player.
        if (enemy_source || environment_source) && s.target_id.is_player() && !effect_name.is_empty()
        {
            let source_kind = if environment_source {
                DebuffSource::Environment
            } else {
                DebuffSource::Enemy
            };
            if let Some(attempt) = self.open_attempt_mut() {
                attempt.debuffs.push(DebuffApplication {
                    timestamp: s.timestamp,
                    relative_secs: 0.0,
                    effect_id: s.effect_id,
                    effect_name: s.effect_name,
                    duration_secs: s.duration_secs,
                    source_id: s.source_id,
                    source_name: s.source_name,
                    target_id: s.target_id,
                    target_name: s.target_name,
                    stacks: s.stacks,
                    source_kind,
                });
            }
            return;
        }

        // Known mitigation or shield from the knowledge base. A miss means
        // 0% mitigation, never a failure.
        let info = lookup_effect(s.effect_id).or_else(|| lookup_effect_by_name(effect_name));
        let Some(info) = info else {
            debug!(effect_id = s.effect_id, effect_name, "status not in knowledge base");
            return;
        };

        if info.is_boss_debuff() {
            // Player-applied enemy debuff (Reprisal, Feint, Addle).
            if s.source_id.is_player() && s.target_id.is_enemy() {
                self.tracker.apply(
                    s.target_id,
                    s.effect_id,
                    s.effect_name,
                    s.source_id,
                    s.timestamp,
                    s.duration_secs,
                    info,
                );
            }
        } else if s.target_id.is_player() {
            // Player-side mitigation or shield.
            self.tracker.apply(
                s.target_id,
                s.effect_id,
                s.effect_name,
                s.source_id,
                s.timestamp,
                s.duration_secs,
                info,
            );
            if let Some(attempt) = self.open_attempt_mut() {
                attempt.debuffs.push(DebuffApplication {
                    timestamp: s.timestamp,
                    relative_secs: 0.0,
                    effect_id: s.effect_id,
                    effect_name: s.effect_name,
                    duration_secs: s.duration_secs,
                    source_id: s.source_id,
                    source_name: s.source_name,
                    target_id: s.target_id,
                    target_name: s.target_name,
                    stacks: s.stacks,
                    source_kind: DebuffSource::PlayerMitigation,
                });
            }
        }
    }

    fn handle_head_marker(&mut self, m: HeadMarkerLine) {
        if self.state != ParserState::InCombat {
            return;
        }
        if !m.target_id.is_player() || resolve(m.target_name).is_empty() {
            return;
        }
        let marker_name = head_marker_label(m.marker_id);
        if let Some(attempt) = self.open_attempt_mut() {
            attempt.head_markers.push(HeadMark {
                timestamp: m.timestamp,
                relative_secs: 0.0,
                target_id: m.target_id,
                target_name: m.target_name,
                marker_id: m.marker_id,
                marker_name,
            });
        }
    }

    fn handle_effect_result(&mut self, r: EffectResult) {
        if !matches!(self.state, ParserState::InCombat | ParserState::WipePending) {
            return;
        }
        if !r.target_id.is_player() || resolve(r.target_name).is_empty() {
            return;
        }

        // Always update the running shield state for future hits.
        self.player_shields
            .insert(r.target_id, (r.shield_percent, r.max_hp));

        let Some(pending) = self.pending_hits.get_mut(&r.sequence_id) else {
            return;
        };
        let Some(attempt) = self
            .session
            .current_fight_mut()
            .and_then(|f| f.current_attempt_mut())
        else {
            return;
        };

        // AoE lines share one sequence id across targets, each with its
        // own effect result; resolve one target at a time.
        let mut remaining = Vec::new();
        for p in pending.drain(..) {
            if p.target_id != r.target_id {
                remaining.push(p);
                continue;
            }
            let max_hp = if r.max_hp > 0 { r.max_hp } else { p.max_hp_before };
            if max_hp > 0 && p.shield_before > r.shield_percent {
                let before = u64::from(p.shield_before) * u64::from(max_hp) / 100;
                let after = u64::from(r.shield_percent) * u64::from(max_hp) / 100;
                let absorbed = before.saturating_sub(after);
                if absorbed > 0
                    && let Some(hit) = attempt.ability_hits.get_mut(p.hit_index)
                {
                    hit.absorbed_damage = Some(absorbed as u32);
                }
            }
        }

        *pending = remaining;
        let resolved = pending.is_empty();
        if resolved {
            self.pending_hits.remove(&r.sequence_id);
        }
    }

    // ─── Control signals ────────────────────────────────────────────────────

    fn handle_actor_control(&mut self, c: ActorControl) {
        match c.command {
            control_command::COMMENCE => {
                if matches!(self.state, ParserState::Idle | ParserState::InInstance) {
                    self.start_attempt(c.timestamp);
                }
            }
            control_command::RECOMMENCE => {
                if self.state == ParserState::WipePending {
                    let end = self.pending_wipe_time.unwrap_or(c.timestamp);
                    self.finalize_attempt(Some(end), AttemptOutcome::Wipe);
                    self.set_state(ParserState::InInstance);
                }
                if self.state == ParserState::InInstance {
                    self.start_attempt(c.timestamp);
                }
            }
            control_command::VICTORY => {
                if matches!(self.state, ParserState::InCombat | ParserState::WipePending) {
                    self.finalize_attempt(Some(c.timestamp), AttemptOutcome::Victory);
                    self.set_state(ParserState::InInstance);
                }
            }
            control_command::WIPE_FADEOUT => match self.state {
                ParserState::InCombat => {
                    // Deaths continue during the fade-out; hold the
                    // attempt open until the confirming signal.
                    self.pending_wipe_time = Some(c.timestamp);
                    self.set_state(ParserState::WipePending);
                }
                ParserState::WipePending => {
                    self.finalize_attempt(Some(c.timestamp), AttemptOutcome::Wipe);
                    self.set_state(ParserState::InInstance);
                }
                _ => {}
            },
            control_command::BARRIER_UP => {
                if self.state == ParserState::WipePending {
                    let end = self.pending_wipe_time.unwrap_or(c.timestamp);
                    self.finalize_attempt(Some(end), AttemptOutcome::Wipe);
                    self.set_state(ParserState::InInstance);
                }
            }
            _ => {
                // Unknown director command; not ours to interpret.
            }
        }
    }

    // ─── Attempt lifecycle ──────────────────────────────────────────────────

    fn start_attempt(&mut self, timestamp: NaiveDateTime) {
        self.dead_players.clear();
        self.player_shields.clear();
        self.pending_hits.clear();
        self.tracker.clear();
        self.cast_target = None;
        self.pending_wipe_time = None;

        if self.session.current_fight().is_none() {
            // Commence without a prior zone change: log started mid-run.
            warn!("combat commenced with no zone context, opening placeholder fight");
            let id = self.session.fights.len() as u32 + 1;
            self.session
                .fights
                .push(Fight::new(id, 0, intern("Unknown Zone"), timestamp));
        }

        if let Some(fight) = self.session.current_fight_mut() {
            let number = fight.attempts.len() as u32 + 1;
            let attempt = Attempt::new(number, timestamp, fight.boss_name);
            fight.attempts.push(attempt);
        }
        self.set_state(ParserState::InCombat);
    }

    fn finalize_attempt(&mut self, end: Option<NaiveDateTime>, outcome: AttemptOutcome) {
        self.pending_hits.clear();
        self.pending_wipe_time = None;
        self.cast_target = None;

        let tracker = mem::take(&mut self.tracker);
        let Some(attempt) = self
            .session
            .current_fight_mut()
            .and_then(|f| f.open_attempt_mut())
        else {
            return;
        };

        attempt.end_time = end;
        attempt.outcome = outcome;
        attempt.mitigations = tracker;
        if let Some(end) = end {
            attempt.duration_secs = (end
                .signed_duration_since(attempt.timeline_start())
                .num_milliseconds() as f32
                / 1000.0)
                .max(0.0);
        }
        attempt.finalize_relative_times();
        reconstruct_attempt(attempt);
    }

    /// A zone exit or end-of-input with a pull still open: close it as
    /// in-progress. It stays out of completed-attempt views.
    fn force_close_open_attempt(&mut self, end: Option<NaiveDateTime>) {
        if matches!(self.state, ParserState::InCombat | ParserState::WipePending) {
            warn!("open attempt force-closed without a wipe/victory signal");
            self.finalize_attempt(end, AttemptOutcome::InProgress);
        }
    }

    fn open_attempt_mut(&mut self) -> Option<&mut Attempt> {
        self.session
            .current_fight_mut()
            .and_then(|f| f.open_attempt_mut())
    }
}
