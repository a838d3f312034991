//! Combatant registry.
//!
//! Entities register on combatant lines and persist for the whole session
//! since later fights may reference them. Registration is idempotent:
//! re-registering an id updates its mutable fields in place.

use hashbrown::HashMap;
use serde::Serialize;

use crate::combat_log::ActorId;
use crate::context::{IStr, empty_istr, resolve, serialize_istr};
use crate::game_data::{Role, job_name, job_role};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityCategory {
    Player,
    Enemy,
    Other,
}

impl EntityCategory {
    fn from_id(id: ActorId) -> Self {
        if id.is_player() {
            EntityCategory::Player
        } else if id.is_enemy() {
            EntityCategory::Enemy
        } else {
            EntityCategory::Other
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Entity {
    pub id: ActorId,
    #[serde(serialize_with = "serialize_istr")]
    pub name: IStr,
    pub category: EntityCategory,
    /// Player job, when known. NPCs carry no job.
    pub job_id: Option<u8>,
    pub role: Role,
    pub max_hp: u32,
    pub last_known_hp: u32,
}

impl Entity {
    pub fn job_name(&self) -> Option<&'static str> {
        self.job_id.map(job_name)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct EntityRegistry {
    entities: HashMap<ActorId, Entity>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or update a combatant. Names and health refresh on
    /// re-registration; an empty name never overwrites a known one.
    pub fn register(&mut self, id: ActorId, name: IStr, job_id: Option<u8>, max_hp: u32) {
        let entry = self.entities.entry(id).or_insert_with(|| Entity {
            id,
            name: empty_istr(),
            category: EntityCategory::from_id(id),
            job_id: None,
            role: Role::Unknown,
            max_hp: 0,
            last_known_hp: 0,
        });

        if !resolve(name).is_empty() {
            entry.name = name;
        }
        if let Some(job) = job_id
            && job != 0
        {
            entry.job_id = Some(job);
            entry.role = job_role(job);
        }
        if max_hp > 0 {
            entry.max_hp = max_hp;
            if entry.last_known_hp == 0 {
                entry.last_known_hp = max_hp;
            }
        }
    }

    /// Record last-seen health for an entity already observed in combat.
    pub fn update_health(&mut self, id: ActorId, current_hp: u32, max_hp: u32) {
        if let Some(entity) = self.entities.get_mut(&id) {
            entity.last_known_hp = current_hp;
            if max_hp > 0 {
                entity.max_hp = max_hp;
            }
        }
    }

    pub fn lookup(&self, id: ActorId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// The id-range convention is authoritative - an unregistered id with
    /// the player prefix still counts as a player.
    pub fn is_player(&self, id: ActorId) -> bool {
        id.is_player()
    }

    pub fn players(&self) -> impl Iterator<Item = &Entity> {
        self.entities
            .values()
            .filter(|e| e.category == EntityCategory::Player)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
