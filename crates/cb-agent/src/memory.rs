//! Per-agent memory and the explicit per-role state machines.
//!
//! Role behaviours used to track their phase with loose booleans that were
//! re-checked every tick.  Here each role has a named-state machine whose
//! transitions are guarded by the agent's carry capacity, so every state and
//! transition can be tested exhaustively.

use serde::{Deserialize, Serialize};

use cb_core::{RegionId, Role, SourceId, TargetId};

use crate::Capacity;

// ── WorkPhase ─────────────────────────────────────────────────────────────────

/// Two-phase work cycle shared by extractors, carriers, and sustainers.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkPhase {
    /// Filling up: harvesting, or picking up a reserved target.
    #[default]
    Gathering,
    /// Emptying out: delivering, building, or upgrading.
    Spending,
}

impl WorkPhase {
    /// Apply the transition guard for the current load.
    ///
    /// | From        | Guard          | To          |
    /// |-------------|----------------|-------------|
    /// | `Gathering` | capacity full  | `Spending`  |
    /// | `Spending`  | capacity empty | `Gathering` |
    pub fn advance(self, capacity: Capacity) -> WorkPhase {
        match self {
            WorkPhase::Gathering if capacity.is_full()  => WorkPhase::Spending,
            WorkPhase::Spending  if capacity.is_empty() => WorkPhase::Gathering,
            same => same,
        }
    }
}

// ── ScoutPhase ────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoutPhase {
    /// Waiting for an exploration assignment.
    #[default]
    Idle,
    Travelling(RegionId),
    Surveying(RegionId),
}

impl ScoutPhase {
    /// Take an assignment.  Only an idle scout accepts one.
    pub fn assign(self, region: RegionId) -> ScoutPhase {
        match self {
            ScoutPhase::Idle => ScoutPhase::Travelling(region),
            busy => busy,
        }
    }

    /// The scout has entered `region`.
    pub fn arrive(self, region: RegionId) -> ScoutPhase {
        match self {
            ScoutPhase::Travelling(target) if target == region => ScoutPhase::Surveying(region),
            other => other,
        }
    }

    /// Survey done; ready for the next assignment.
    pub fn finish(self) -> ScoutPhase {
        match self {
            ScoutPhase::Surveying(_) => ScoutPhase::Idle,
            other => other,
        }
    }
}

// ── RoleState ─────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleState {
    Work(WorkPhase),
    Scout(ScoutPhase),
}

impl RoleState {
    pub fn initial(role: Role) -> RoleState {
        match role {
            Role::Scout => RoleState::Scout(ScoutPhase::Idle),
            Role::Extractor | Role::Carrier | Role::Sustainer => RoleState::Work(WorkPhase::Gathering),
        }
    }

    /// The work phase, if this is a work-cycle role.
    pub fn work_phase(self) -> Option<WorkPhase> {
        match self {
            RoleState::Work(phase) => Some(phase),
            RoleState::Scout(_) => None,
        }
    }
}

// ── AgentMemory ───────────────────────────────────────────────────────────────

/// The mutable per-agent blob.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentMemory {
    pub state: RoleState,

    /// Pickup target claimed by the task allocator (carriers only).
    pub reservation: Option<TargetId>,

    /// Resource node this agent works (extractors only).
    pub assigned_source: Option<SourceId>,
}

impl AgentMemory {
    pub fn for_role(role: Role) -> Self {
        Self {
            state:           RoleState::initial(role),
            reservation:     None,
            assigned_source: None,
        }
    }

    /// Advance a work-cycle state machine for the current load.
    ///
    /// Entering `Spending` drops any pickup reservation: the carrier no
    /// longer needs it and another one may claim the target.
    pub fn advance_work(&mut self, capacity: Capacity) {
        if let RoleState::Work(phase) = self.state {
            let next = phase.advance(capacity);
            if next == WorkPhase::Spending && phase == WorkPhase::Gathering {
                self.reservation = None;
            }
            self.state = RoleState::Work(next);
        }
    }
}
