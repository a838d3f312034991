mod head_markers;
mod hit_types;
mod jobs;
mod mitigations;
mod zones;

pub use head_markers::{head_marker_label, head_marker_name};
pub use hit_types::HitType;
pub use jobs::{Role, job_name, job_role};
pub use mitigations::{MitigationInfo, MitigationKind, lookup_effect, lookup_effect_by_name};
pub use zones::is_non_combat_zone;

use phf::phf_set;

/// Director commands carried on control-signal (33) lines.
pub mod control_command {
    /// Pull begins.
    pub const COMMENCE: u32 = 0x4000_0001;
    /// Encounter cleared.
    pub const VICTORY: u32 = 0x4000_0003;
    /// Wipe fade-out begins.
    pub const WIPE_FADEOUT: u32 = 0x4000_0005;
    /// Retry after a wipe.
    pub const RECOMMENCE: u32 = 0x4000_0006;
    /// Arena barrier restored, reset complete.
    pub const BARRIER_UP: u32 = 0x4000_0011;
}

// Player-controlled pets carry enemy-range ids but must not be treated as
// enemy debuff sources.
static PLAYER_PETS: phf::Set<&'static str> = phf_set! {
    "eos",
    "selene",
    "seraph",
    "earthly star",
    "carbuncle",
    "emerald carbuncle",
    "topaz carbuncle",
    "ruby carbuncle",
    "ifrit-egi",
    "titan-egi",
    "garuda-egi",
    "demi-bahamut",
    "demi-phoenix",
    "solar bahamut",
    "automaton queen",
    "rook autoturret",
};

pub fn is_player_pet(name: &str) -> bool {
    PLAYER_PETS.contains(name.to_ascii_lowercase().as_str())
}
