//! The `RoleBehavior` trait and the role → behaviour dispatch table.

use cb_agent::Agent;
use cb_core::{Role, RoleMap};

use crate::{BehaviorContext, BehaviorResult, NoopBehavior};
use crate::roles::{CarrierBehavior, ExtractorBehavior, ScoutBehavior, SustainerBehavior};

/// What one role does with one agent for one tick.
///
/// Called once per agent per tick, in ascending `AgentId` order.  The
/// behaviour may update `agent.memory`, move through
/// [`BehaviorContext::move_toward`], and issue commands; it must not hold on
/// to anything from `ctx` past the call.
pub trait RoleBehavior {
    fn run(&self, agent: &mut Agent, ctx: &mut BehaviorContext<'_, '_>) -> BehaviorResult<()>;
}

/// One behaviour per [`Role`], resolved once when the colony is built.
pub struct BehaviorTable {
    behaviors: RoleMap<Box<dyn RoleBehavior>>,
}

impl BehaviorTable {
    pub fn new(f: impl FnMut(Role) -> Box<dyn RoleBehavior>) -> Self {
        Self { behaviors: RoleMap::from_fn(f) }
    }

    /// The built-in behaviours for every role.
    pub fn standard() -> Self {
        Self::new(|role| match role {
            Role::Extractor => Box::new(ExtractorBehavior),
            Role::Carrier   => Box::new(CarrierBehavior),
            Role::Scout     => Box::new(ScoutBehavior),
            Role::Sustainer => Box::new(SustainerBehavior),
        })
    }

    /// Every role does nothing.
    pub fn idle() -> Self {
        Self::new(|_| Box::new(NoopBehavior))
    }

    /// Replace one role's behaviour.
    pub fn with(mut self, role: Role, behavior: impl RoleBehavior + 'static) -> Self {
        self.behaviors[role] = Box::new(behavior);
        self
    }

    pub fn get(&self, role: Role) -> &dyn RoleBehavior {
        self.behaviors[role].as_ref()
    }
}

impl Default for BehaviorTable {
    fn default() -> Self {
        Self::standard()
    }
}
