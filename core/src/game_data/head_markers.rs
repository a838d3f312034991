//! Head marker id lookup.
//!
//! High-end content shifts marker ids per instance since patch 5.2, so
//! raw ids are only meaningful within a single log; the names here cover
//! the common unshifted mechanics.

use phf::phf_map;

static HEAD_MARKERS: phf::Map<u32, &'static str> = phf_map! {
    // Common mechanics
    0x0017u32 => "Spread",
    0x0064u32 => "Stack",
    0x003Eu32 => "Stack",
    0x00A1u32 => "Stack",
    0x0048u32 => "Stack",
    0x005Du32 => "Tank Stack",
    0x0057u32 => "Flare",
    0x0028u32 => "Earth Shaker",
    0x004Bu32 => "Acceleration Bomb",
    0x0061u32 => "Chain Tether",
    0x0037u32 => "Red Dorito",
    // Spread circles
    0x0039u32 => "Spread (Purple Large)",
    0x008Au32 => "Spread (Orange Large)",
    0x008Bu32 => "Spread (Purple Small)",
    0x0060u32 => "Spread (Orange Small)",
    0x0078u32 => "Spread (Orange Large)",
    0x00A9u32 => "Spread (Orange Small)",
    0x00BDu32 => "Spread (Purple Giant)",
    0x004Cu32 => "Purple Fire Circle",
    // Prey / target markers
    0x0001u32 => "Prey (Orange)",
    0x0002u32 => "Prey (Orange)",
    0x0004u32 => "Prey (Orange)",
    0x000Eu32 => "Prey (Blue)",
    0x001Eu32 => "Prey Sphere (Orange)",
    0x001Fu32 => "Prey Sphere (Blue)",
    0x005Cu32 => "Prey (Dark)",
    0x0076u32 => "Prey (Dark)",
    0x0087u32 => "Prey Sphere (Blue)",
    // Meteors
    0x0007u32 => "Green Meteor",
    0x0008u32 => "Ghost Meteor",
    0x0009u32 => "Red Meteor",
    0x000Au32 => "Yellow Meteor",
    0x015Au32 => "Meteor",
    // Pinwheels
    0x0046u32 => "Green Pinwheel",
    0x00AEu32 => "Blue Pinwheel",
    // Limit cut order
    0x004Fu32 => "Limit Cut 1",
    0x0050u32 => "Limit Cut 2",
    0x0051u32 => "Limit Cut 3",
    0x0052u32 => "Limit Cut 4",
    0x0053u32 => "Limit Cut 5",
    0x0054u32 => "Limit Cut 6",
    0x0055u32 => "Limit Cut 7",
    0x0056u32 => "Limit Cut 8",
    // Misc
    0x000Du32 => "Devour Flower",
    0x001Cu32 => "Gravity Puddle",
    0x0065u32 => "Spread Bubble",
    0x007Bu32 => "Scatter",
    0x007Cu32 => "Turn Away",
    0x00ABu32 => "Green Poison",
    0x00ACu32 => "Reprobation Tether",
    0x00BFu32 => "Granite Gaol",
    // Playstation markers
    0x01A0u32 => "Circle (Playstation)",
    0x01A1u32 => "Triangle (Playstation)",
    0x01A2u32 => "Square (Playstation)",
    0x01A3u32 => "Cross (Playstation)",
    // Tank busters
    0x0157u32 => "Tank Buster",
    0x01D4u32 => "Duality of Death",
    // Ultimate-specific
    0x014Au32 => "Defamation",
    0x01B3u32 => "Comet Marker",
};

pub fn head_marker_name(marker_id: u32) -> Option<&'static str> {
    HEAD_MARKERS.get(&marker_id).copied()
}

/// Display label with a hex fallback for unknown markers.
pub fn head_marker_label(marker_id: u32) -> String {
    match head_marker_name(marker_id) {
        Some(name) => name.to_string(),
        None => format!("Head Marker 0x{marker_id:04X}"),
    }
}
