//! `StateStore` — everything the colony remembers between ticks.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use cb_agent::{AgentMemory, RoleState};
use cb_core::{AgentId, Role};
use cb_economy::EconomyLedger;
use cb_mobility::MobilityState;

use crate::ColonyResult;

/// The colony's persistent state, passed into every tick and written back
/// at its end.  Nothing else survives a tick.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StateStore {
    /// Per-agent memory blobs, keyed by agent.
    pub memories: BTreeMap<AgentId, AgentMemory>,
    /// Route caches and stuck counters.
    pub mobility: MobilityState,
    /// Per-source economic records.
    pub ledger:   EconomyLedger,
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the stored memory for `agent`, or a fresh one if there is none
    /// or it belongs to a different kind of role.
    pub fn take_memory(&mut self, agent: AgentId, role: Role) -> AgentMemory {
        match self.memories.remove(&agent) {
            Some(memory) if same_kind(memory.state, RoleState::initial(role)) => memory,
            _ => AgentMemory::for_role(role),
        }
    }

    /// Drop every entry of agents for which `alive` is false.  Returns the
    /// number of memories removed.
    pub fn prune(&mut self, mut alive: impl FnMut(AgentId) -> bool) -> usize {
        let before = self.memories.len();
        self.memories.retain(|id, _| alive(*id));
        self.mobility.retain(alive);
        before - self.memories.len()
    }

    pub fn to_json(&self) -> ColonyResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> ColonyResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn save(&self, path: &Path) -> ColonyResult<()> {
        std::fs::write(path, serde_json::to_vec_pretty(self)?)?;
        Ok(())
    }

    pub fn load(path: &Path) -> ColonyResult<Self> {
        let bytes = std::fs::read(path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

fn same_kind(a: RoleState, b: RoleState) -> bool {
    std::mem::discriminant(&a) == std::mem::discriminant(&b)
}
