//! The spawn scheduler: which role to produce next.

use serde::{Deserialize, Serialize};

use cb_core::{BootstrapTrigger, Role, RoleMap, SpawnPolicy};

/// State of one production slot.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotState {
    #[default]
    Idle,
    /// The slot is building something; no selection happens.
    Producing,
}

/// Selects at most one role per pass by fixed priority, with the bootstrap
/// override lifting carriers above extractors until each node has one.
#[derive(Clone, Debug)]
pub struct SpawnScheduler {
    priorities: RoleMap<u32>,
    bootstrap:  BootstrapTrigger,
}

impl SpawnScheduler {
    pub fn new(policy: &SpawnPolicy) -> Self {
        Self {
            priorities: policy.priorities.to_role_map(),
            bootstrap:  policy.bootstrap,
        }
    }

    /// `true` when carriers should jump ahead of extractors this pass.
    pub fn bootstrap_applies(&self, desired: &RoleMap<u32>, actual: &RoleMap<u32>, node_count: u32) -> bool {
        let extractors_ready = match self.bootstrap {
            BootstrapTrigger::OnePerNode     => actual[Role::Extractor] >= node_count,
            BootstrapTrigger::FullComplement => actual[Role::Extractor] >= desired[Role::Extractor],
        };
        extractors_ready && actual[Role::Carrier] < node_count
    }

    /// Priorities for this pass, with the bootstrap override applied.
    pub fn effective_priorities(&self, desired: &RoleMap<u32>, actual: &RoleMap<u32>, node_count: u32) -> RoleMap<u32> {
        let mut priorities = self.priorities.clone();
        if self.bootstrap_applies(desired, actual, node_count) {
            let lifted = priorities[Role::Extractor].saturating_add(1);
            priorities[Role::Carrier] = priorities[Role::Carrier].max(lifted);
        }
        priorities
    }

    /// The single role to produce, or `None` if the slot is busy or every
    /// role's demand is met.
    ///
    /// Only roles with `desired > actual` are candidates.  Equal priorities
    /// go to the role earlier in [`Role::ALL`].
    pub fn select(
        &self,
        slot:       SlotState,
        desired:    &RoleMap<u32>,
        actual:     &RoleMap<u32>,
        node_count: u32,
    ) -> Option<Role> {
        if slot == SlotState::Producing {
            return None;
        }
        let priorities = self.effective_priorities(desired, actual, node_count);
        let mut best: Option<(Role, u32)> = None;
        for role in Role::ALL {
            if desired[role] <= actual[role] {
                continue;
            }
            if best.is_none_or(|(_, p)| priorities[role] > p) {
                best = Some((role, priorities[role]));
            }
        }
        best.map(|(role, _)| role)
    }
}
