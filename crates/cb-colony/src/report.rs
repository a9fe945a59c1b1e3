//! `TickReport` — what one colony tick decided.

use cb_behavior::AllocationReport;
use cb_core::{RoleMap, Tick};
use cb_mobility::MovementStats;
use cb_spawn::SpawnOutcome;

/// Summary of one [`Colony::tick`][crate::Colony::tick].
#[derive(Clone, Debug)]
pub struct TickReport {
    pub tick:       Tick,
    /// Live agents seen this tick.
    pub agents:     usize,
    pub actual:     RoleMap<u32>,
    pub desired:    RoleMap<u32>,
    pub spawn:      SpawnOutcome,
    pub movement:   MovementStats,
    pub allocation: AllocationReport,
    /// Hostile agents in the home region.
    pub hostiles:   usize,
    /// Memories dropped because their agent no longer exists.
    pub pruned:     usize,
    /// Behaviour failures absorbed during the tick.
    pub errors:     u32,
}

impl TickReport {
    /// Roles whose desired count is above the actual count.
    pub fn shortfall(&self) -> RoleMap<u32> {
        RoleMap::from_fn(|role| self.desired[role].saturating_sub(self.actual[role]))
    }
}
