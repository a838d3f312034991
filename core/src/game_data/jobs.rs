//! Job id lookup and role classification.
//!
//! Job ids arrive as a hex byte on combatant registration lines. The role
//! split matters for the tank-only mitigation tables and the CLI's roster
//! display.

use phf::phf_map;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Tank,
    Healer,
    Dps,
    Unknown,
}

#[derive(Debug, Clone, Copy)]
pub struct JobInfo {
    pub name: &'static str,
    pub role: Role,
}

const fn job(name: &'static str, role: Role) -> JobInfo {
    JobInfo { name, role }
}

static JOBS: phf::Map<u8, JobInfo> = phf_map! {
    // Base classes
    0x01u8 => job("Gladiator", Role::Tank),
    0x02u8 => job("Pugilist", Role::Dps),
    0x03u8 => job("Marauder", Role::Tank),
    0x04u8 => job("Lancer", Role::Dps),
    0x05u8 => job("Archer", Role::Dps),
    0x06u8 => job("Conjurer", Role::Healer),
    0x07u8 => job("Thaumaturge", Role::Dps),
    0x1Au8 => job("Arcanist", Role::Dps),
    0x1Du8 => job("Rogue", Role::Dps),
    // Tanks
    0x13u8 => job("Paladin", Role::Tank),
    0x15u8 => job("Warrior", Role::Tank),
    0x20u8 => job("Dark Knight", Role::Tank),
    0x25u8 => job("Gunbreaker", Role::Tank),
    // Healers
    0x18u8 => job("White Mage", Role::Healer),
    0x1Cu8 => job("Scholar", Role::Healer),
    0x21u8 => job("Astrologian", Role::Healer),
    0x28u8 => job("Sage", Role::Healer),
    // Melee DPS
    0x14u8 => job("Monk", Role::Dps),
    0x16u8 => job("Dragoon", Role::Dps),
    0x1Eu8 => job("Ninja", Role::Dps),
    0x22u8 => job("Samurai", Role::Dps),
    0x27u8 => job("Reaper", Role::Dps),
    0x29u8 => job("Viper", Role::Dps),
    // Physical ranged DPS
    0x17u8 => job("Bard", Role::Dps),
    0x1Fu8 => job("Machinist", Role::Dps),
    0x26u8 => job("Dancer", Role::Dps),
    // Magical ranged DPS
    0x19u8 => job("Black Mage", Role::Dps),
    0x1Bu8 => job("Summoner", Role::Dps),
    0x23u8 => job("Red Mage", Role::Dps),
    0x2Au8 => job("Pictomancer", Role::Dps),
    // Limited
    0x24u8 => job("Blue Mage", Role::Dps),
};

pub fn job_name(job_id: u8) -> &'static str {
    JOBS.get(&job_id).map(|j| j.name).unwrap_or("Unknown")
}

pub fn job_role(job_id: u8) -> Role {
    JOBS.get(&job_id).map(|j| j.role).unwrap_or(Role::Unknown)
}
