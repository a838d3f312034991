//! Damage codec for the packed effect pairs on ability lines.
//!
//! Each ability line carries up to eight (flags, value) hex pairs. The
//! flags word encodes the hit kind in its low byte and the severity
//! (critical / direct hit) in the next one. The value word is not a
//! literal number: large amounts rotate their bytes behind a 0x40 marker,
//! an 0x01 marker in the same byte means the target was invulnerable, and
//! a set sign bit turns the magnitude into a heal.

use serde::Serialize;

const KIND_MISS: u64 = 0x01;
const KIND_DAMAGE: u64 = 0x03;
const KIND_HEAL: u64 = 0x04;
const KIND_BLOCKED: u64 = 0x05;
const KIND_PARRIED: u64 = 0x06;
const KIND_INSTANT_DEATH: u64 = 0x33;

const SEVERITY_CRIT: u64 = 0x20;
const SEVERITY_DIRECT_HIT: u64 = 0x40;

/// Byte-C marker: magnitude exceeds 16 bits and is byte-rotated.
const MARKER_BIG: u32 = 0x40;
/// Byte-C marker: no damage taken (invulnerability).
const MARKER_HALLOWED: u32 = 0x01;
/// Sign bit on a plain 16-bit magnitude: value is a heal.
const SIGN_BIT: u32 = 0x8000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HitKind {
    Damage,
    Heal,
    Miss,
    Dodge,
    Invulnerable,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HitQualifier {
    Normal,
    Critical,
    DirectHit,
    CriticalDirectHit,
}

/// One decoded sub-hit from an ability line's effect pair block.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DecodedHit {
    pub kind: HitKind,
    pub qualifier: HitQualifier,
    pub amount: u32,
}

impl DecodedHit {
    /// Fallback for malformed tokens: nothing useful decoded, but the
    /// line stays alive.
    pub fn unknown() -> Self {
        Self {
            kind: HitKind::Unknown,
            qualifier: HitQualifier::Normal,
            amount: 0,
        }
    }

    #[inline]
    pub fn deals_damage(&self) -> bool {
        self.kind == HitKind::Damage
    }
}

/// Decode one (flags, value) pair. Malformed tokens decode to amount 0 /
/// kind Unknown rather than an error.
pub fn decode_pair(flags: &str, value: &str) -> DecodedHit {
    let Ok(flags_word) = u64::from_str_radix(flags, 16) else {
        return DecodedHit::unknown();
    };

    let kind_byte = flags_word & 0xFF;
    let severity = (flags_word >> 8) & 0xFF;

    let qualifier = match (
        severity & SEVERITY_CRIT != 0,
        severity & SEVERITY_DIRECT_HIT != 0,
    ) {
        (true, true) => HitQualifier::CriticalDirectHit,
        (true, false) => HitQualifier::Critical,
        (false, true) => HitQualifier::DirectHit,
        (false, false) => HitQualifier::Normal,
    };

    let mut kind = match kind_byte {
        KIND_MISS => {
            if severity == 0 {
                HitKind::Miss
            } else {
                HitKind::Dodge
            }
        }
        KIND_DAMAGE | KIND_BLOCKED | KIND_PARRIED | KIND_INSTANT_DEATH => HitKind::Damage,
        KIND_HEAL => HitKind::Heal,
        _ => HitKind::Unknown,
    };

    let raw = if value.is_empty() || value == "0" {
        0
    } else {
        match u32::from_str_radix(value, 16) {
            Ok(v) => v,
            Err(_) => return DecodedHit::unknown(),
        }
    };

    // Bytes of the padded word are A B C D, A most significant.
    let byte_a = (raw >> 24) & 0xFF;
    let byte_b = (raw >> 16) & 0xFF;
    let byte_c = (raw >> 8) & 0xFF;
    let byte_d = raw & 0xFF;

    let mut amount = if byte_c & MARKER_BIG != 0 {
        // Rotated: D is the high byte, A B the low ones.
        (byte_d << 16) | (byte_a << 8) | byte_b
    } else {
        let magnitude = (raw >> 16) & 0xFFFF;
        if magnitude & SIGN_BIT != 0 {
            // Negative-looking magnitude: a heal, not damage.
            if kind == HitKind::Damage {
                kind = HitKind::Heal;
            }
            magnitude & !SIGN_BIT
        } else {
            magnitude
        }
    };

    if byte_c & MARKER_HALLOWED != 0 && byte_c & MARKER_BIG == 0 {
        kind = HitKind::Invulnerable;
        amount = 0;
    }

    DecodedHit {
        kind,
        qualifier,
        amount,
    }
}

/// Decode the eight-pair effect block of an ability line, returning every
/// populated sub-hit in order. Empty or all-zero pairs terminate nothing;
/// they are simply skipped, since some abilities leave gaps.
pub fn decode_effect_block(fields: &[&str]) -> Vec<DecodedHit> {
    let mut hits = Vec::new();
    for pair in fields.chunks_exact(2) {
        let (flags, value) = (pair[0], pair[1]);
        if matches!(flags, "" | "0") && matches!(value, "" | "0") {
            continue;
        }
        hits.push(decode_pair(flags, value));
    }
    hits
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_plain_damage() {
        let hit = decode_pair("750003", "A8450000");
        assert_eq!(hit.kind, HitKind::Damage);
        assert_eq!(hit.qualifier, HitQualifier::Normal);
        assert_eq!(hit.amount, 0xA845);
    }

    #[test]
    fn test_decode_big_damage_rotation() {
        // Bytes A=42 B=3F C=40 D=0F recombine as D A B = 0x0F423F.
        let hit = decode_pair("750003", "423F400F");
        assert_eq!(hit.kind, HitKind::Damage);
        assert_eq!(hit.amount, 999_999);
    }

    #[test]
    fn test_decode_crit_and_direct_hit() {
        assert_eq!(
            decode_pair("752003", "640000").qualifier,
            HitQualifier::Critical
        );
        assert_eq!(
            decode_pair("754003", "640000").qualifier,
            HitQualifier::DirectHit
        );
        assert_eq!(
            decode_pair("756003", "640000").qualifier,
            HitQualifier::CriticalDirectHit
        );
    }

    #[test]
    fn test_decode_miss() {
        let hit = decode_pair("01", "0");
        assert_eq!(hit.kind, HitKind::Miss);
        assert_eq!(hit.amount, 0);
    }

    #[test]
    fn test_decode_heal() {
        let hit = decode_pair("4", "C80000");
        assert_eq!(hit.kind, HitKind::Heal);
        assert_eq!(hit.amount, 0xC8);
    }

    #[test]
    fn test_decode_sign_bit_flips_damage_to_heal() {
        // 0x8064 has the sign bit set: heal of 0x64.
        let hit = decode_pair("750003", "80640000");
        assert_eq!(hit.kind, HitKind::Heal);
        assert_eq!(hit.amount, 100);
    }

    #[test]
    fn test_decode_hallowed_is_invulnerable() {
        let hit = decode_pair("750003", "100");
        assert_eq!(hit.kind, HitKind::Invulnerable);
        assert_eq!(hit.amount, 0);
    }

    #[test]
    fn test_decode_malformed_token_is_unknown() {
        let hit = decode_pair("750003", "ZZZZ");
        assert_eq!(hit.kind, HitKind::Unknown);
        assert_eq!(hit.amount, 0);

        let hit = decode_pair("not-hex", "640000");
        assert_eq!(hit.kind, HitKind::Unknown);
        assert_eq!(hit.amount, 0);
    }

    #[test]
    fn test_decode_effect_block_multi_hit() {
        let fields = [
            "750003", "640000", // 100 damage
            "750003", "C80000", // 200 damage
            "0", "0", "0", "0", "0", "0", "0", "0", "0", "0", "0", "0",
        ];
        let hits = decode_effect_block(&fields);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].amount, 100);
        assert_eq!(hits[1].amount, 200);
    }

    #[test]
    fn test_decode_effect_block_empty() {
        let fields = ["0", "0", "0", "0"];
        assert!(decode_effect_block(&fields).is_empty());
    }
}
