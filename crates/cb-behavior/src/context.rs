//! Per-tick state handed to every role behaviour.

use cb_agent::Agent;
use cb_core::{AgentId, GridCell, Tick};
use cb_mobility::{MoveOutcome, MovementCoordinator};
use cb_spatial::Pathfinder;

use crate::{BehaviorResult, Command, CommandResult, World};

/// What a behaviour did about a target this tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Approach {
    /// In reach; the command was issued.
    Acted(CommandResult),
    /// Out of reach; moved (or tried to) toward the target.
    Moving(MoveOutcome),
}

/// Built once per tick by the colony and lent to each behaviour in turn.
///
/// Movement goes through the tick's [`MovementCoordinator`], so a behaviour
/// never moves an agent directly: it asks for a step and gets an outcome.
pub struct BehaviorContext<'c, 'm> {
    pub tick:     Tick,
    pub world:    &'c mut dyn World,
    pub movement: &'c mut MovementCoordinator<'m, dyn Pathfinder + 'm>,
}

impl<'c, 'm> BehaviorContext<'c, 'm> {
    pub fn new(
        tick:     Tick,
        world:    &'c mut dyn World,
        movement: &'c mut MovementCoordinator<'m, dyn Pathfinder + 'm>,
    ) -> Self {
        Self { tick, world, movement }
    }

    pub fn move_toward(&mut self, agent: AgentId, destination: GridCell) -> BehaviorResult<MoveOutcome> {
        Ok(self.movement.move_toward(agent, destination)?)
    }

    pub fn issue(&mut self, agent: AgentId, command: Command) -> CommandResult {
        self.world.issue(agent, command)
    }

    /// Issue `command` if `agent` is within one step of `target`, otherwise
    /// move toward it.
    pub fn act_at(&mut self, agent: &Agent, target: GridCell, command: Command) -> BehaviorResult<Approach> {
        if agent.cell.distance(target).is_some_and(|d| d <= 1) {
            let result = self.issue(agent.id, command);
            if result != CommandResult::TooFar {
                return Ok(Approach::Acted(result));
            }
        }
        self.move_toward(agent.id, target).map(Approach::Moving)
    }
}
