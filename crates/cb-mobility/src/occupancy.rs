//! The per-tick occupancy snapshot: grid cell → occupying agent.

use rustc_hash::FxHashMap;
use tracing::warn;

use cb_agent::AgentStore;
use cb_core::{AgentId, GridCell};

use crate::{MobilityError, MobilityResult};

/// Which agent stands on which cell, valid for exactly one tick.
///
/// Rebuilt from scratch at the start of every tick; there is no incremental
/// update path, so nothing stale can leak across ticks.  Within the tick the
/// coordinator moves entries as it commits steps, keeping the cell → agent
/// map a function at every point.
#[derive(Clone, Debug, Default)]
pub struct OccupancySnapshot {
    by_cell:  FxHashMap<GridCell, AgentId>,
    by_agent: FxHashMap<AgentId, GridCell>,
}

impl OccupancySnapshot {
    /// Build from `(agent, cell)` pairs.
    ///
    /// If two agents report the same cell, the one listed first keeps it; the
    /// other still knows its own position but does not own the cell.  Pass
    /// pairs in ascending `AgentId` order for a deterministic winner.
    pub fn build(positions: impl IntoIterator<Item = (AgentId, GridCell)>) -> Self {
        let mut snapshot = Self::default();
        for (agent, cell) in positions {
            snapshot.by_agent.insert(agent, cell);
            match snapshot.by_cell.get(&cell) {
                Some(&holder) => {
                    warn!(%cell, %holder, duplicate = %agent, "two agents report the same cell");
                }
                None => {
                    snapshot.by_cell.insert(cell, agent);
                }
            }
        }
        snapshot
    }

    /// Build from the live agent arena.
    pub fn from_agents(agents: &AgentStore) -> Self {
        Self::build(agents.positions())
    }

    #[inline]
    pub fn occupant(&self, cell: GridCell) -> Option<AgentId> {
        self.by_cell.get(&cell).copied()
    }

    #[inline]
    pub fn is_occupied(&self, cell: GridCell) -> bool {
        self.by_cell.contains_key(&cell)
    }

    #[inline]
    pub fn position(&self, agent: AgentId) -> Option<GridCell> {
        self.by_agent.get(&agent).copied()
    }

    /// Number of occupied cells.
    pub fn len(&self) -> usize {
        self.by_cell.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_cell.is_empty()
    }

    /// `true` when every tracked agent owns exactly the cell it reports.
    pub fn is_consistent(&self) -> bool {
        self.by_cell.len() == self.by_agent.len()
            && self.by_cell.iter().all(|(cell, agent)| self.by_agent.get(agent) == Some(cell))
    }

    /// Move `agent` onto the free cell `to`.
    pub(crate) fn relocate(&mut self, agent: AgentId, to: GridCell) -> MobilityResult<()> {
        let from = self.position(agent).ok_or(MobilityError::UnknownAgent(agent))?;
        if let Some(by) = self.occupant(to) {
            if by != agent {
                return Err(MobilityError::CellOccupied { cell: to, by });
            }
        }
        if self.by_cell.get(&from) == Some(&agent) {
            self.by_cell.remove(&from);
        }
        self.by_cell.insert(to, agent);
        self.by_agent.insert(agent, to);
        Ok(())
    }

    /// Exchange the cells of `a` and `b` in one step.
    pub(crate) fn swap(&mut self, a: AgentId, b: AgentId) -> MobilityResult<()> {
        let cell_a = self.position(a).ok_or(MobilityError::UnknownAgent(a))?;
        let cell_b = self.position(b).ok_or(MobilityError::UnknownAgent(b))?;
        self.by_cell.insert(cell_a, b);
        self.by_cell.insert(cell_b, a);
        self.by_agent.insert(a, cell_b);
        self.by_agent.insert(b, cell_a);
        Ok(())
    }
}
