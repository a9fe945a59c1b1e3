//! A single agent: identity, position, role, carry capacity, and memory.

use serde::{Deserialize, Serialize};

use cb_core::{AgentId, GridCell, Role};

use crate::AgentMemory;

/// Carried resource against total carry capacity.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Capacity {
    pub used:  u32,
    pub total: u32,
}

impl Capacity {
    #[inline]
    pub fn new(used: u32, total: u32) -> Self {
        Self { used: used.min(total), total }
    }

    #[inline]
    pub fn empty(total: u32) -> Self {
        Self { used: 0, total }
    }

    #[inline]
    pub fn free(self) -> u32 {
        self.total.saturating_sub(self.used)
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.used == 0
    }

    /// `true` once nothing more fits.  An agent with no capacity is always full.
    #[inline]
    pub fn is_full(self) -> bool {
        self.used >= self.total
    }
}

/// A mobile unit as seen by the decision core.
///
/// `cell` and `capacity` mirror the live world each tick.  `memory` is the
/// per-agent blob owned by role behaviours; the core reads it for movement
/// and allocation and writes only the reservation field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id:       AgentId,
    pub role:     Role,
    pub cell:     GridCell,
    pub capacity: Capacity,
    pub memory:   AgentMemory,
}

impl Agent {
    /// A freshly produced agent with the role's initial memory.
    pub fn new(id: AgentId, role: Role, cell: GridCell, capacity: Capacity) -> Self {
        Self {
            id,
            role,
            cell,
            capacity,
            memory: AgentMemory::for_role(role),
        }
    }
}
