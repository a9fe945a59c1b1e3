//! `AgentStore` — arena of live agents keyed by stable identity.
//!
//! Agents come and go, so unlike a dense `Vec` indexed by position the store
//! is an `FxHashMap` keyed by `AgentId` with O(1) lookup.  Anything that
//! iterates agents for decision-making goes through [`AgentStore::ids`],
//! which returns ascending `AgentId` order: processing order decides who wins
//! a contested cell or target, so it must never depend on hash order.

use rustc_hash::FxHashMap;

use cb_core::{AgentId, CoreError, CoreResult, GridCell, Role, RoleMap};

use crate::{Agent, Capacity};

#[derive(Default, Clone, Debug)]
pub struct AgentStore {
    agents:  FxHashMap<AgentId, Agent>,
    next_id: u32,
}

impl AgentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new agent with a freshly allocated identity.
    pub fn spawn(&mut self, role: Role, cell: GridCell, capacity: Capacity) -> AgentId {
        let id = AgentId(self.next_id);
        self.next_id += 1;
        self.agents.insert(id, Agent::new(id, role, cell, capacity));
        id
    }

    /// Insert (or replace) an agent whose identity was assigned elsewhere.
    pub fn insert(&mut self, agent: Agent) {
        self.next_id = self.next_id.max(agent.id.0.saturating_add(1));
        self.agents.insert(agent.id, agent);
    }

    pub fn remove(&mut self, id: AgentId) -> Option<Agent> {
        self.agents.remove(&id)
    }

    #[inline]
    pub fn get(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(&id)
    }

    #[inline]
    pub fn get_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.agents.get_mut(&id)
    }

    /// Like [`get`](Self::get) but a missing agent is an explicit error.
    pub fn require(&self, id: AgentId) -> CoreResult<&Agent> {
        self.agents.get(&id).ok_or(CoreError::AgentNotFound(id))
    }

    pub fn contains(&self, id: AgentId) -> bool {
        self.agents.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Every live `AgentId` in ascending order.
    pub fn ids(&self) -> Vec<AgentId> {
        let mut ids: Vec<AgentId> = self.agents.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Agents of one role, in ascending `AgentId` order.
    pub fn ids_with_role(&self, role: Role) -> Vec<AgentId> {
        let mut ids: Vec<AgentId> = self
            .agents
            .values()
            .filter(|a| a.role == role)
            .map(|a| a.id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// `(id, cell)` for every agent in ascending `AgentId` order.
    pub fn positions(&self) -> Vec<(AgentId, GridCell)> {
        let mut out: Vec<(AgentId, GridCell)> =
            self.agents.values().map(|a| (a.id, a.cell)).collect();
        out.sort_unstable_by_key(|(id, _)| *id);
        out
    }

    /// Live head-count per role.
    pub fn counts_by_role(&self) -> RoleMap<u32> {
        let mut counts = RoleMap::<u32>::default();
        for agent in self.agents.values() {
            counts[agent.role] += 1;
        }
        counts
    }

    /// Unordered iteration; use only for order-independent work.
    pub fn iter(&self) -> impl Iterator<Item = &Agent> {
        self.agents.values()
    }
}
