//! Non-combat zone detection.
//!
//! Cities and hub zones never open a Fight; everything else is treated as
//! instanced combat content.

use phf::phf_set;

static NON_COMBAT_ZONES: phf::Set<&'static str> = phf_set! {
    "solution nine",
    "limsa lominsa",
    "ul'dah",
    "gridania",
    "ishgard",
    "kugane",
    "crystarium",
    "eulmore",
    "old sharlayan",
    "radz-at-han",
    "tuliyollal",
};

pub fn is_non_combat_zone(zone_name: &str) -> bool {
    NON_COMBAT_ZONES.contains(zone_name.to_ascii_lowercase().as_str())
}

#[cfg(test)]
mod tests {
    use super::is_non_combat_zone;

    #[test]
    fn test_zone_classification() {
        assert!(is_non_combat_zone("Old Sharlayan"));
        assert!(!is_non_combat_zone("Hell on Rails (Extreme)"));
    }
}
