//! A behaviour that does nothing.

use cb_agent::Agent;

use crate::{BehaviorContext, BehaviorResult, RoleBehavior};

/// Leaves the agent where it is.  Useful in tests and for roles a host
/// drives itself.
pub struct NoopBehavior;

impl RoleBehavior for NoopBehavior {
    fn run(&self, _agent: &mut Agent, _ctx: &mut BehaviorContext<'_, '_>) -> BehaviorResult<()> {
        Ok(())
    }
}
