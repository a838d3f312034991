//! Scenario tests for the fight/attempt state machine.
//!
//! Lines are built with the same field layouts the add-on emits; see the
//! parser tests for captured examples.

use std::collections::HashMap;

use super::*;
use crate::combat_log::ActorId;
use crate::game_data::HitType;

const BOSS_ID: &str = "4000A132";
const BOSS_NAME: &str = "Doomtrain";
const PLAYER_A: &str = "10000001";
const PLAYER_B: &str = "10000002";

fn zone_line(time: &str, zone: &str) -> String {
    format!("01|2026-01-03T{time}.0000000-06:00|51C|{zone}|hash")
}

fn combatant_line(time: &str, id: &str, name: &str, job: &str, max_hp: u32) -> String {
    format!(
        "03|2026-01-03T{time}.0000000-06:00|{id}|{name}|{job}|64|0000|28|World|0|0|{max_hp}|{max_hp}|10000|10000|||0.00|0.00|0.00|0.00|hash"
    )
}

fn control_line(time: &str, command: &str) -> String {
    format!("33|2026-01-03T{time}.0000000-06:00|80034E8B|{command}|00|00|00|00|hash")
}

fn cast_line(time: &str, src: &str, src_name: &str, ability: &str, name: &str, tgt: &str, tgt_name: &str) -> String {
    format!(
        "20|2026-01-03T{time}.0000000-06:00|{src}|{src_name}|{ability}|{name}|{tgt}|{tgt_name}|3.70|0.00|0.00|0.00|0.00|hash"
    )
}

#[allow(clippy::too_many_arguments)]
fn ability_line(
    time: &str,
    src: &str,
    src_name: &str,
    ability: &str,
    ability_name: &str,
    tgt: &str,
    tgt_name: &str,
    flags: &str,
    value: &str,
    sequence: &str,
) -> String {
    let mut fields: Vec<String> = vec![
        "21".into(),
        format!("2026-01-03T{time}.0000000-06:00"),
        src.into(),
        src_name.into(),
        ability.into(),
        ability_name.into(),
        tgt.into(),
        tgt_name.into(),
        flags.into(),
        value.into(),
    ];
    // Remaining seven effect pairs.
    fields.extend(std::iter::repeat_n("0".to_string(), 14));
    // Target HP/MP block and position filler up to the sequence id.
    fields.extend(
        [
            "290000", "290000", "10000", "10000", "", "", "0.00", "0.00", "0.00", "0.00",
            "44", "44", "0", "10000", "", "", "0.00", "0.00", "0.00", "0.00",
        ]
        .map(String::from),
    );
    fields.push(sequence.into());
    fields.extend(["0", "1", "00"].map(String::from));
    fields.join("|")
}

fn death_line(time: &str, tgt: &str, tgt_name: &str, src: &str, src_name: &str) -> String {
    format!("25|2026-01-03T{time}.0000000-06:00|{tgt}|{tgt_name}|{src}|{src_name}|hash")
}

#[allow(clippy::too_many_arguments)]
fn status_line(
    time: &str,
    effect: &str,
    effect_name: &str,
    duration: &str,
    src: &str,
    src_name: &str,
    tgt: &str,
    tgt_name: &str,
) -> String {
    format!(
        "26|2026-01-03T{time}.0000000-06:00|{effect}|{effect_name}|{duration}|{src}|{src_name}|{tgt}|{tgt_name}|00|290000|290000|hash"
    )
}

fn marker_line(time: &str, tgt: &str, tgt_name: &str, marker: &str) -> String {
    format!("27|2026-01-03T{time}.0000000-06:00|{tgt}|{tgt_name}|0000|0000|{marker}|00|00|00|hash")
}

fn effect_result_line(
    time: &str,
    tgt: &str,
    tgt_name: &str,
    sequence: &str,
    max_hp: u32,
    shield_percent: u8,
) -> String {
    format!(
        "37|2026-01-03T{time}.0000000-06:00|{tgt}|{tgt_name}|{sequence}|{max_hp}|{max_hp}|10000|10000|{shield_percent}|0|0.00|0.00|0.00|0.00|hash"
    )
}

/// Standard opener: zone, two players, one boss.
fn setup_lines() -> Vec<String> {
    vec![
        zone_line("14:22:00", "Hell on Rails (Extreme)"),
        combatant_line("14:22:01", PLAYER_A, "Aya Storm", "13", 100000),
        combatant_line("14:22:01", PLAYER_B, "Bee Healer", "18", 90000),
        combatant_line("14:22:02", BOSS_ID, BOSS_NAME, "00", 98895160),
    ]
}

fn parse_all(lines: &[String]) -> RaidSession {
    parse_lines(lines.iter().map(|l| l.as_str()))
}

#[test]
fn test_wipe_then_reentry_scenario() {
    let mut lines = setup_lines();
    lines.push(control_line("14:22:10", "40000001"));
    lines.push(ability_line(
        "14:22:20", BOSS_ID, BOSS_NAME, "B26F", "Dead Man's Blastpipe", PLAYER_A, "Aya Storm",
        "750003", "03E80000", "00002C2D",
    ));
    lines.push(death_line("14:22:30", PLAYER_A, "Aya Storm", BOSS_ID, BOSS_NAME));
    lines.push(death_line("14:22:31", PLAYER_B, "Bee Healer", BOSS_ID, BOSS_NAME));
    lines.push(control_line("14:22:33", "40000005"));
    lines.push(zone_line("14:23:00", "Hell on Rails (Extreme)"));
    lines.push(control_line("14:23:10", "40000001"));

    let session = parse_all(&lines);

    // Same zone, no intervening different zone: one continued fight.
    assert_eq!(session.fights.len(), 1);
    let fight = &session.fights[0];
    assert_eq!(fight.attempts.len(), 2);

    let first = &fight.attempts[0];
    assert_eq!(first.outcome, AttemptOutcome::Wipe);
    assert_eq!(first.number, 1);
    assert_eq!(first.ability_hits.len(), 1);
    assert_eq!(first.ability_hits[0].damage, 1000);
    assert_eq!(first.deaths.len(), 2);
    assert!(first.end_time.is_some());

    let second = &fight.attempts[1];
    assert_eq!(second.number, 2);
    assert_eq!(second.outcome, AttemptOutcome::InProgress);

    // Attempt exclusivity: the only in-progress attempt is the last one.
    let in_progress: Vec<_> = fight
        .attempts
        .iter()
        .filter(|a| a.outcome == AttemptOutcome::InProgress)
        .collect();
    assert_eq!(in_progress.len(), 1);
    assert_eq!(in_progress[0].number, 2);
}

#[test]
fn test_all_players_dead_then_barrier_up() {
    let mut lines = setup_lines();
    lines.push(control_line("14:22:10", "40000001"));
    lines.push(death_line("14:22:30", PLAYER_A, "Aya Storm", BOSS_ID, BOSS_NAME));
    lines.push(death_line("14:22:31", PLAYER_B, "Bee Healer", BOSS_ID, BOSS_NAME));

    // Deaths alone park the machine in WipePending without closing.
    let mut parser = SessionParser::new();
    for line in &lines {
        parser.process_line(line);
    }
    assert_eq!(parser.state(), ParserState::WipePending);
    assert!(parser.session().current_attempt().is_some_and(|a| a.is_open()));

    parser.process_line(&control_line("14:22:40", "40000011"));
    assert_eq!(parser.state(), ParserState::InInstance);

    let session = parser.finish();
    let attempt = &session.fights[0].attempts[0];
    assert_eq!(attempt.outcome, AttemptOutcome::Wipe);
    // Closed at the all-dead moment, not the barrier restore.
    assert_eq!(
        attempt.end_time.unwrap().format("%H:%M:%S").to_string(),
        "14:22:31"
    );
}

#[test]
fn test_victory_close() {
    let mut lines = setup_lines();
    lines.push(control_line("14:22:10", "40000001"));
    lines.push(control_line("14:31:35", "40000003"));

    let session = parse_all(&lines);
    let fight = &session.fights[0];
    assert_eq!(fight.attempts.len(), 1);
    assert_eq!(fight.attempts[0].outcome, AttemptOutcome::Victory);
    assert_eq!(fight.total_victories(), 1);
    assert_eq!(session.completed_attempts().count(), 1);
}

#[test]
fn test_player_filtering() {
    let mut lines = setup_lines();
    lines.push(control_line("14:22:10", "40000001"));
    // Enemy on enemy: never recorded.
    lines.push(ability_line(
        "14:22:20", BOSS_ID, BOSS_NAME, "B26F", "Blast", "4000A133", "Adds", "750003",
        "03E80000", "0",
    ));
    // Same ability on a player id: recorded.
    lines.push(ability_line(
        "14:22:21", BOSS_ID, BOSS_NAME, "B26F", "Blast", PLAYER_A, "Aya Storm", "750003",
        "03E80000", "0",
    ));

    let session = parse_all(&lines);
    let attempt = &session.fights[0].attempts[0];
    assert_eq!(attempt.ability_hits.len(), 1);
    assert_eq!(attempt.ability_hits[0].target_id, ActorId(0x10000001));
}

#[test]
fn test_auto_attacks_are_skipped() {
    let mut lines = setup_lines();
    lines.push(control_line("14:22:10", "40000001"));
    lines.push(ability_line(
        "14:22:20", BOSS_ID, BOSS_NAME, "0000", "Attack", PLAYER_A, "Aya Storm", "750003",
        "03E80000", "0",
    ));

    let session = parse_all(&lines);
    assert!(session.fights[0].attempts[0].ability_hits.is_empty());
}

#[test]
fn test_drop_counter_monotonicity() {
    let mut lines = setup_lines();
    lines.push("garbage that is not a line".to_string());
    lines.push("99|2026-01-03T14:22:05.0000000-06:00|unknown|type".to_string());
    lines.push("01|bad-timestamp|51C|Somewhere|hash".to_string());

    let session = parse_all(&lines);
    assert_eq!(session.lines_dropped, 3);
    assert_eq!(session.lines_processed, 7);
}

#[test]
fn test_idempotent_reparse() {
    let mut lines = setup_lines();
    lines.push(control_line("14:22:10", "40000001"));
    lines.push(ability_line(
        "14:22:20", BOSS_ID, BOSS_NAME, "B26F", "Blast", PLAYER_A, "Aya Storm", "750003",
        "03E80000", "0",
    ));
    lines.push(control_line("14:22:33", "40000005"));
    lines.push(control_line("14:22:35", "40000011"));

    let first = parse_all(&lines);
    let second = parse_all(&lines);

    assert_eq!(first.fights.len(), second.fights.len());
    assert_eq!(first.lines_processed, second.lines_processed);
    assert_eq!(first.lines_dropped, second.lines_dropped);
    let (a, b) = (&first.fights[0], &second.fights[0]);
    assert_eq!(a.attempts.len(), b.attempts.len());
    assert_eq!(a.attempts[0].ability_hits.len(), b.attempts[0].ability_hits.len());
    assert_eq!(
        a.attempts[0].ability_hits[0].damage,
        b.attempts[0].ability_hits[0].damage
    );
    assert_eq!(a.attempts[0].outcome, b.attempts[0].outcome);
}

#[test]
fn test_unexpected_control_signals_are_ignored() {
    let mut parser = SessionParser::new();
    // Victory in Idle: nothing to close.
    parser.process_line(&control_line("14:00:00", "40000003"));
    assert_eq!(parser.state(), ParserState::Idle);

    for line in setup_lines() {
        parser.process_line(&line);
    }
    parser.process_line(&control_line("14:22:10", "40000001"));
    // A second commence with an attempt already open is ignored.
    parser.process_line(&control_line("14:22:11", "40000001"));

    let session = parser.finish();
    assert_eq!(session.fights[0].attempts.len(), 1);
}

#[test]
fn test_zone_exit_force_closes_attempt() {
    let mut lines = setup_lines();
    lines.push(control_line("14:22:10", "40000001"));
    lines.push(zone_line("14:25:00", "Old Sharlayan"));

    let mut parser = SessionParser::new();
    for line in &lines {
        parser.process_line(line);
    }
    assert_eq!(parser.state(), ParserState::Idle);

    let session = parser.finish();
    let attempt = &session.fights[0].attempts[0];
    assert_eq!(attempt.outcome, AttemptOutcome::InProgress);
    assert!(attempt.end_time.is_some());
    assert_eq!(session.completed_attempts().count(), 0);
}

#[test]
fn test_boss_inference_from_highest_health_enemy() {
    let mut lines = setup_lines();
    lines.push(combatant_line("14:22:03", "4000A140", "Signal Lamp", "00", 150000));
    lines.push(control_line("14:22:10", "40000001"));

    let session = parse_all(&lines);
    let fight = &session.fights[0];
    assert_eq!(crate::context::resolve(fight.boss_name), BOSS_NAME);
    assert_eq!(crate::context::resolve(fight.attempts[0].boss_name), BOSS_NAME);
}

#[test]
fn test_debuff_and_marker_recording() {
    let mut lines = setup_lines();
    lines.push(control_line("14:22:10", "40000001"));
    lines.push(status_line(
        "14:22:15", "ABC", "Vulnerability Up", "15.00", BOSS_ID, BOSS_NAME, PLAYER_A,
        "Aya Storm",
    ));
    lines.push(status_line(
        "14:22:16", "DEF", "Doom", "10.00", "E0000000", "", PLAYER_B, "Bee Healer",
    ));
    // Pet-sourced statuses are not boss debuffs.
    lines.push(status_line(
        "14:22:17", "321", "Fey Union", "10.00", "40001234", "Eos", PLAYER_B, "Bee Healer",
    ));
    lines.push(marker_line("14:22:18", PLAYER_A, "Aya Storm", "0017"));

    let session = parse_all(&lines);
    let attempt = &session.fights[0].attempts[0];

    assert_eq!(attempt.debuffs.len(), 2);
    assert_eq!(attempt.debuffs[0].source_kind, DebuffSource::Enemy);
    assert_eq!(attempt.debuffs[1].source_kind, DebuffSource::Environment);

    assert_eq!(attempt.head_markers.len(), 1);
    assert_eq!(attempt.head_markers[0].marker_name, "Spread");
}

#[test]
fn test_mitigation_reconstruction_end_to_end() {
    let mut lines = setup_lines();
    lines.push(control_line("14:22:10", "40000001"));
    // Rampart (20%) applied to the tank five seconds before the hit.
    lines.push(status_line(
        "14:22:15", "4A7", "Rampart", "20.00", PLAYER_A, "Aya Storm", PLAYER_A, "Aya Storm",
    ));
    lines.push(ability_line(
        "14:22:20", BOSS_ID, BOSS_NAME, "B26F", "Blast", PLAYER_A, "Aya Storm", "750003",
        "03200000", "0",
    ));
    lines.push(control_line("14:22:30", "40000003"));

    let session = parse_all(&lines);
    let attempt = &session.fights[0].attempts[0];

    // Mitigation buff records as a player-mitigation application too.
    assert!(attempt
        .debuffs
        .iter()
        .any(|d| d.source_kind == DebuffSource::PlayerMitigation));

    let hit = &attempt.ability_hits[0];
    assert_eq!(hit.damage, 800);
    assert_eq!(hit.unmitigated_damage, Some(1000));
    assert!(!hit.low_confidence);
}

#[test]
fn test_shield_absorption_end_to_end() {
    let mut lines = setup_lines();
    lines.push(control_line("14:22:10", "40000001"));
    // Effect result reports 10% shield on a 100000 max-HP player.
    lines.push(effect_result_line("14:22:15", PLAYER_A, "Aya Storm", "00000001", 100000, 10));
    lines.push(ability_line(
        "14:22:20", BOSS_ID, BOSS_NAME, "B26F", "Blast", PLAYER_A, "Aya Storm", "750003",
        "01F40000", "00002C2D",
    ));
    // Correlated result: shield dropped to 8%, so 2000 HP were absorbed.
    lines.push(effect_result_line("14:22:21", PLAYER_A, "Aya Storm", "00002C2D", 100000, 8));
    lines.push(control_line("14:22:30", "40000003"));

    let session = parse_all(&lines);
    let hit = &session.fights[0].attempts[0].ability_hits[0];
    assert_eq!(hit.damage, 500);
    assert_eq!(hit.absorbed_damage, Some(2000));
    // Absorption is added back before percent inversion.
    assert_eq!(hit.unmitigated_damage, Some(2500));
}

#[test]
fn test_hit_type_override_reruns_reconstruction() {
    let mut lines = setup_lines();
    lines.push(control_line("14:22:10", "40000001"));
    // Feint on the boss: 10% physical, 5% magical.
    lines.push(status_line(
        "14:22:15", "4AB", "Feint", "15.00", PLAYER_A, "Aya Storm", BOSS_ID, BOSS_NAME,
    ));
    lines.push(ability_line(
        "14:22:20", BOSS_ID, BOSS_NAME, "B26F", "Blast", PLAYER_A, "Aya Storm", "750003",
        "03840000", "0",
    ));
    lines.push(control_line("14:22:30", "40000003"));

    let mut session = parse_all(&lines);
    let hit = &session.fights[0].attempts[0].ability_hits[0];
    assert_eq!(hit.damage, 900);
    // Unknown hit type takes the stronger split: 900 / 0.9.
    assert_eq!(hit.unmitigated_damage, Some(1000));

    let overrides = HashMap::from([("B26F".to_string(), HitType::Magical)]);
    let changed = apply_hit_type_overrides(&mut session, &overrides);
    assert_eq!(changed, 1);

    let hit = &session.fights[0].attempts[0].ability_hits[0];
    assert_eq!(hit.hit_type, HitType::Magical);
    // Magical side of Feint is 5%: 900 / 0.95.
    assert_eq!(hit.unmitigated_damage, Some(947));
}

#[test]
fn test_cast_target_pointer_is_transient() {
    let mut parser = SessionParser::new();
    for line in setup_lines() {
        parser.process_line(&line);
    }
    parser.process_line(&control_line("14:22:10", "40000001"));
    parser.process_line(&cast_line(
        "14:22:12", BOSS_ID, BOSS_NAME, "B270", "Doom Strike", PLAYER_B, "Bee Healer",
    ));

    let cast = parser.cast_target().expect("cast pointer set");
    assert_eq!(cast.target_id, ActorId(0x10000002));
    assert_eq!(cast.ability_id, 0xB270);

    // Attempt close clears the pointer; it is not a recorded event.
    parser.process_line(&control_line("14:22:30", "40000003"));
    assert!(parser.cast_target().is_none());
    let session = parser.finish();
    assert!(session.fights[0].attempts[0].ability_hits.is_empty());
}

#[test]
fn test_commence_without_zone_opens_placeholder_fight() {
    let mut parser = SessionParser::new();
    parser.process_line(&control_line("14:22:10", "40000001"));
    assert_eq!(parser.state(), ParserState::InCombat);

    let session = parser.finish();
    assert_eq!(session.fights.len(), 1);
    assert_eq!(
        crate::context::resolve(session.fights[0].zone_name),
        "Unknown Zone"
    );
}

#[test]
fn test_different_zone_opens_new_fight() {
    let mut lines = setup_lines();
    lines.push(control_line("14:22:10", "40000001"));
    lines.push(control_line("14:25:00", "40000003"));
    lines.push(zone_line("14:30:00", "The Last Stand (Savage)"));
    lines.push(control_line("14:31:00", "40000001"));

    let session = parse_all(&lines);
    assert_eq!(session.fights.len(), 2);
    assert_eq!(session.fights[0].attempts.len(), 1);
    assert_eq!(session.fights[1].attempts.len(), 1);
}
