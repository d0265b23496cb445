//! Game state aggregate - the world plus every NPC the player has met.

use std::collections::HashMap;

use crate::aggregates::npc_memory::NpcMemory;
use crate::ids::NpcId;
use crate::value_objects::WorldState;

/// Everything that gets saved to a slot.
///
/// # Invariants
///
/// - exactly one `WorldState`
/// - at most one `NpcMemory` per `NpcId`, keyed by its own id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameState {
    world: WorldState,
    npcs: HashMap<NpcId, NpcMemory>,
}

impl GameState {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn world(&self) -> &WorldState {
        &self.world
    }

    #[inline]
    pub fn world_mut(&mut self) -> &mut WorldState {
        &mut self.world
    }

    /// Memory for `npc_id`, created empty on first reference.
    pub fn get_or_create_npc(&mut self, npc_id: &NpcId) -> &mut NpcMemory {
        self.npcs
            .entry(npc_id.clone())
            .or_insert_with(|| NpcMemory::new(npc_id.clone()))
    }

    pub fn npc(&self, npc_id: &NpcId) -> Option<&NpcMemory> {
        self.npcs.get(npc_id)
    }

    /// All NPC records, in no particular order.
    pub fn npcs(&self) -> impl ExactSizeIterator<Item = &NpcMemory> {
        self.npcs.values()
    }

    /// All NPC records sorted by id, for stable output.
    pub fn npcs_sorted(&self) -> Vec<&NpcMemory> {
        let mut npcs: Vec<&NpcMemory> = self.npcs.values().collect();
        npcs.sort_by(|a, b| a.npc_id().cmp(b.npc_id()));
        npcs
    }

    /// Replace the world; `None` restores the default world.
    pub fn replace_world(&mut self, world: Option<WorldState>) {
        self.world = world.unwrap_or_default();
    }

    /// Replace every NPC record. Later records with the same id win.
    pub fn replace_all_npcs(&mut self, npcs: impl IntoIterator<Item = NpcMemory>) {
        self.npcs = npcs
            .into_iter()
            .map(|npc| (npc.npc_id().clone(), npc))
            .collect();
    }
}
