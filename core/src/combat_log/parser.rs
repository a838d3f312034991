use chrono::{DateTime, NaiveDateTime};
use memchr::memchr_iter;

use super::damage;
use super::line::*;
use crate::context::intern;


macro_rules! parse_u32 {
    ($s:expr) => {
        $s.parse::<u32>().unwrap_or_default()
    };
}
macro_rules! parse_u32_hex {
    ($s:expr) => {
        u32::from_str_radix($s, 16).unwrap_or_default()
    };
}
macro_rules! parse_u8_hex {
    ($s:expr) => {
        u8::from_str_radix($s, 16).unwrap_or_default()
    };
}

/// Classify one raw log line and extract its typed fields.
///
/// Returns `None` for unknown type codes, lines with fewer fields than
/// their type requires, and unparsable timestamps; the caller counts
/// those as dropped. No semantic filtering happens here - deciding
/// whether a target is a player is the state machine's job.
pub fn parse_line(line: &str) -> Option<LogLine> {
    let line = line.trim_end_matches(['\r', '\n']);
    let bytes = line.as_bytes();

    let mut fields: Vec<&str> = Vec::with_capacity(48);
    let mut start = 0;
    for pipe in memchr_iter(b'|', bytes) {
        fields.push(&line[start..pipe]);
        start = pipe + 1;
    }
    fields.push(&line[start..]);

    if fields.len() < 2 {
        return None;
    }

    match fields[0] {
        "01" => parse_zone_change(&fields),
        "03" => parse_add_combatant(&fields),
        "20" => parse_starts_casting(&fields),
        "21" => parse_ability(&fields, false),
        "22" => parse_ability(&fields, true),
        "25" => parse_death(&fields),
        "26" => parse_status_apply(&fields),
        "27" => parse_head_marker(&fields),
        "33" => parse_actor_control(&fields),
        "37" => parse_effect_result(&fields),
        _ => None,
    }
}

/// Parse the leading timestamp field, e.g.
/// `2026-01-03T14:22:22.5320000-06:00`. The offset is discarded; all
/// timestamps within one log share it.
fn parse_timestamp(segment: &str) -> Option<NaiveDateTime> {
    DateTime::parse_from_rfc3339(segment)
        .ok()
        .map(|dt| dt.naive_local())
}

// 01|timestamp|zone_id|zone_name|hash
fn parse_zone_change(fields: &[&str]) -> Option<LogLine> {
    if fields.len() < 4 {
        return None;
    }
    Some(LogLine::ZoneChange(ZoneChange {
        timestamp: parse_timestamp(fields[1])?,
        zone_id: parse_u32_hex!(fields[2]),
        zone_name: intern(fields[3]),
    }))
}

// 03|timestamp|id|name|job|level|...|max_hp|...
fn parse_add_combatant(fields: &[&str]) -> Option<LogLine> {
    if fields.len() < 12 {
        return None;
    }
    Some(LogLine::AddCombatant(AddCombatant {
        timestamp: parse_timestamp(fields[1])?,
        id: ActorId::from_hex(fields[2])?,
        name: intern(fields[3]),
        job_id: parse_u8_hex!(fields[4]),
        level: parse_u8_hex!(fields[5]),
        max_hp: parse_u32!(fields[11]),
    }))
}

// 20|timestamp|source_id|source_name|ability_id|ability_name|target_id|target_name|cast_time|...
fn parse_starts_casting(fields: &[&str]) -> Option<LogLine> {
    if fields.len() < 9 {
        return None;
    }
    Some(LogLine::StartsCasting(CastStart {
        timestamp: parse_timestamp(fields[1])?,
        source_id: ActorId::from_hex(fields[2])?,
        source_name: intern(fields[3]),
        ability_id: parse_u32_hex!(fields[4]),
        ability_name: intern(fields[5]),
        target_id: ActorId::from_hex(fields[6])?,
        target_name: intern(fields[7]),
        cast_secs: fields[8].parse().unwrap_or_default(),
    }))
}

// 21/22|timestamp|source_id|source_name|ability_id|ability_name|target_id|target_name|
//       flags|value| ... seven more pairs ... |target_hp|target_max_hp|...|sequence_id|...
fn parse_ability(fields: &[&str], aoe: bool) -> Option<LogLine> {
    if fields.len() < 24 {
        return None;
    }
    let hits = damage::decode_effect_block(&fields[8..24]);

    let (target_current_hp, target_max_hp) = if fields.len() > 25 {
        (parse_u32!(fields[24]), parse_u32!(fields[25]))
    } else {
        (0, 0)
    };

    // The sequence id links this line to its EffectResult for shield
    // reconciliation. Older add-on versions truncate the line before it.
    let sequence_id = fields
        .get(44)
        .and_then(|s| u32::from_str_radix(s, 16).ok())
        .filter(|&s| s != 0);

    Some(LogLine::Ability(AbilityUse {
        timestamp: parse_timestamp(fields[1])?,
        source_id: ActorId::from_hex(fields[2])?,
        source_name: intern(fields[3]),
        ability_id: parse_u32_hex!(fields[4]),
        ability_name: intern(fields[5]),
        target_id: ActorId::from_hex(fields[6])?,
        target_name: intern(fields[7]),
        hits,
        sequence_id,
        aoe,
        target_current_hp,
        target_max_hp,
    }))
}

// 25|timestamp|target_id|target_name|source_id|source_name|hash
fn parse_death(fields: &[&str]) -> Option<LogLine> {
    if fields.len() < 6 {
        return None;
    }
    Some(LogLine::Death(DeathLine {
        timestamp: parse_timestamp(fields[1])?,
        target_id: ActorId::from_hex(fields[2])?,
        target_name: intern(fields[3]),
        source_id: ActorId::from_hex(fields[4]),
        source_name: intern(fields[5]),
    }))
}

// 26|timestamp|effect_id|effect_name|duration|source_id|source_name|
//    target_id|target_name|stack_count|target_max_hp|source_max_hp|hash
fn parse_status_apply(fields: &[&str]) -> Option<LogLine> {
    if fields.len() < 10 {
        return None;
    }
    Some(LogLine::StatusApply(StatusApply {
        timestamp: parse_timestamp(fields[1])?,
        effect_id: parse_u32_hex!(fields[2]),
        effect_name: intern(fields[3]),
        duration_secs: fields[4].parse().unwrap_or_default(),
        source_id: ActorId::from_hex(fields[5])?,
        source_name: intern(fields[6]),
        target_id: ActorId::from_hex(fields[7])?,
        target_name: intern(fields[8]),
        stacks: parse_u8_hex!(fields[9]),
        target_max_hp: fields.get(10).map(|f| parse_u32!(f)).unwrap_or_default(),
    }))
}

// 27|timestamp|target_id|target_name|?|?|marker_id|...
fn parse_head_marker(fields: &[&str]) -> Option<LogLine> {
    if fields.len() < 7 {
        return None;
    }
    Some(LogLine::HeadMarker(HeadMarkerLine {
        timestamp: parse_timestamp(fields[1])?,
        target_id: ActorId::from_hex(fields[2])?,
        target_name: intern(fields[3]),
        marker_id: parse_u32_hex!(fields[6]),
    }))
}

// 33|timestamp|instance|command|data0|data1|data2|data3|hash
fn parse_actor_control(fields: &[&str]) -> Option<LogLine> {
    if fields.len() < 8 {
        return None;
    }
    Some(LogLine::ActorControl(ActorControl {
        timestamp: parse_timestamp(fields[1])?,
        instance_id: parse_u32_hex!(fields[2]),
        command: u32::from_str_radix(fields[3], 16).ok()?,
        params: [
            parse_u32_hex!(fields[4]),
            parse_u32_hex!(fields[5]),
            parse_u32_hex!(fields[6]),
            parse_u32_hex!(fields[7]),
        ],
    }))
}

// 37|timestamp|id|name|sequence_id|current_hp|max_hp|current_mp|max_mp|shield_percent|...
fn parse_effect_result(fields: &[&str]) -> Option<LogLine> {
    if fields.len() < 10 {
        return None;
    }
    Some(LogLine::EffectResult(EffectResult {
        timestamp: parse_timestamp(fields[1])?,
        target_id: ActorId::from_hex(fields[2])?,
        target_name: intern(fields[3]),
        sequence_id: parse_u32_hex!(fields[4]),
        current_hp: parse_u32!(fields[5]),
        max_hp: parse_u32!(fields[6]),
        shield_percent: parse_u32!(fields[9]).min(100) as u8,
    }))
}
