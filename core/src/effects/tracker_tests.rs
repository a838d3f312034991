//! Tests for mitigation interval tracking.
//!
//! Verifies that:
//! - Reapplication clips the prior interval (refresh, never overlap)
//! - Stack-accumulating effects extend instead of replacing
//! - Explicit expiry and death close intervals early
//! - Overlap queries honour the half-open [start, end) contract

use chrono::NaiveDateTime;

use super::MitigationTracker;
use crate::combat_log::ActorId;
use crate::context::intern;
use crate::game_data::{MitigationInfo, MitigationKind};

const PLAYER: ActorId = ActorId(0x1075_762D);
const BOSS: ActorId = ActorId(0x4000_A132);

fn at(secs: i64) -> NaiveDateTime {
    NaiveDateTime::parse_from_str("2026-01-03 14:00:00", "%Y-%m-%d %H:%M:%S").unwrap()
        + chrono::Duration::seconds(secs)
}

fn percent_buff(percent: f32) -> MitigationInfo {
    MitigationInfo {
        name: "Test Buff",
        kind: MitigationKind::PlayerBuff,
        physical_percent: percent,
        magical_percent: percent,
        stacking: false,
    }
}

fn stacking_buff(percent: f32) -> MitigationInfo {
    MitigationInfo {
        stacking: true,
        ..percent_buff(percent)
    }
}

fn boss_debuff(percent: f32) -> MitigationInfo {
    MitigationInfo {
        name: "Test Debuff",
        kind: MitigationKind::BossDebuff,
        physical_percent: percent,
        magical_percent: percent,
        stacking: false,
    }
}

#[test]
fn test_apply_and_query() {
    let mut tracker = MitigationTracker::new();
    tracker.apply(
        PLAYER,
        0x4A7,
        intern("Rampart"),
        PLAYER,
        at(10),
        20.0,
        &percent_buff(20.0),
    );

    assert_eq!(tracker.active_at(PLAYER, at(10)).len(), 1);
    assert_eq!(tracker.active_at(PLAYER, at(29)).len(), 1);
    // Half-open: expired exactly at the end instant.
    assert!(tracker.active_at(PLAYER, at(30)).is_empty());
    assert!(tracker.active_at(PLAYER, at(9)).is_empty());
    assert!(tracker.active_at(BOSS, at(10)).is_empty());
}

#[test]
fn test_refresh_clips_prior_interval() {
    let mut tracker = MitigationTracker::new();
    let reprisal = boss_debuff(10.0);
    tracker.apply(BOSS, 0x4A9, intern("Reprisal"), PLAYER, at(10), 10.0, &reprisal);
    tracker.apply(BOSS, 0x4A9, intern("Reprisal"), PLAYER, at(15), 10.0, &reprisal);

    // Never two overlapping intervals of the same effect.
    let during_first = tracker.active_at(BOSS, at(12));
    assert_eq!(during_first.len(), 1);
    assert_eq!(during_first[0].end, Some(at(15)));

    let during_second = tracker.active_at(BOSS, at(20));
    assert_eq!(during_second.len(), 1);
    assert_eq!(during_second[0].end, Some(at(25)));

    // The refresh instant itself belongs to the second interval.
    let at_refresh = tracker.active_at(BOSS, at(15));
    assert_eq!(at_refresh.len(), 1);
    assert_eq!(at_refresh[0].start, at(15));
}

#[test]
fn test_stacking_effect_extends() {
    let mut tracker = MitigationTracker::new();
    let buff = stacking_buff(5.0);
    tracker.apply(PLAYER, 0x999, intern("Stacks"), PLAYER, at(0), 10.0, &buff);
    tracker.apply(PLAYER, 0x999, intern("Stacks"), PLAYER, at(5), 10.0, &buff);

    let active = tracker.active_at(PLAYER, at(7));
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].stacks, 2);
    // Extended from the later of (existing end, new start + duration).
    assert_eq!(active[0].end, Some(at(15)));
}

#[test]
fn test_expire_closes_early() {
    let mut tracker = MitigationTracker::new();
    tracker.apply(
        PLAYER,
        0x4A7,
        intern("Rampart"),
        PLAYER,
        at(0),
        20.0,
        &percent_buff(20.0),
    );
    tracker.expire(PLAYER, 0x4A7, at(8));

    assert!(tracker.active_at(PLAYER, at(8)).is_empty());
    assert_eq!(tracker.active_at(PLAYER, at(7)).len(), 1);
}

#[test]
fn test_expire_all_on_death() {
    let mut tracker = MitigationTracker::new();
    tracker.apply(
        PLAYER,
        0x4A7,
        intern("Rampart"),
        PLAYER,
        at(0),
        20.0,
        &percent_buff(20.0),
    );
    tracker.apply(
        PLAYER,
        0x751,
        intern("Temperance"),
        PLAYER,
        at(2),
        22.0,
        &percent_buff(10.0),
    );
    tracker.expire_all(PLAYER, at(5));

    assert!(tracker.active_at(PLAYER, at(6)).is_empty());
    assert_eq!(tracker.active_at(PLAYER, at(4)).len(), 2);
}

#[test]
fn test_open_ended_interval_runs_until_superseded() {
    let mut tracker = MitigationTracker::new();
    let buff = percent_buff(10.0);
    tracker.apply(PLAYER, 0x351, intern("Channeled"), PLAYER, at(0), 0.0, &buff);

    assert_eq!(tracker.active_at(PLAYER, at(600)).len(), 1);

    tracker.apply(PLAYER, 0x351, intern("Channeled"), PLAYER, at(700), 10.0, &buff);
    let active = tracker.active_at(PLAYER, at(650));
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].end, Some(at(700)));
}

#[test]
fn test_boss_debuffs_affect_all_targets() {
    let mut tracker = MitigationTracker::new();
    tracker.apply(BOSS, 0x4A9, intern("Reprisal"), PLAYER, at(0), 10.0, &boss_debuff(10.0));
    tracker.apply(
        PLAYER,
        0x4A7,
        intern("Rampart"),
        PLAYER,
        at(0),
        20.0,
        &percent_buff(20.0),
    );

    let affecting = tracker.mitigations_affecting(PLAYER, at(5));
    assert_eq!(affecting.len(), 2);

    // A different player still benefits from the enemy-side debuff.
    let other = ActorId(0x1071_9475);
    let affecting_other = tracker.mitigations_affecting(other, at(5));
    assert_eq!(affecting_other.len(), 1);
    assert!(affecting_other[0].is_boss_debuff);
}

#[test]
fn test_shields_are_queried_separately() {
    let mut tracker = MitigationTracker::new();
    let shield = MitigationInfo {
        name: "Galvanize",
        kind: MitigationKind::Shield,
        physical_percent: 0.0,
        magical_percent: 0.0,
        stacking: false,
    };
    tracker.apply(PLAYER, 0x129, intern("Galvanize"), PLAYER, at(0), 30.0, &shield);

    assert_eq!(tracker.shields_at(PLAYER, at(5)).len(), 1);
    assert!(tracker.mitigations_affecting(PLAYER, at(5)).is_empty());
}
