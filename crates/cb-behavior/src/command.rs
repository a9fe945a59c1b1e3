//! Command primitives issued to agents.

use cb_core::{AgentId, Direction, RegionId, SourceId, TargetId};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Move(Direction),
    Harvest(SourceId),
    Pickup(TargetId),
    /// Hand all carried energy to a structure.
    Transfer(TargetId),
    /// Drop all carried energy on the agent's cell.
    Drop,
    Build(TargetId),
    Upgrade(TargetId),
    /// Enter and record a neighbouring region.
    Explore(RegionId),
}

/// Result code of a command.  Commands are intents: the host applies them in
/// its own time and reports only this code.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CommandResult {
    Ok,
    TooFar,
    NotEnoughResource,
    Failed,
}

pub trait AgentCommander {
    fn issue(&mut self, agent: AgentId, command: Command) -> CommandResult;
}

/// A host that can be both queried and commanded.
pub trait World: crate::WorldQuery + AgentCommander {}

impl<T: crate::WorldQuery + AgentCommander + ?Sized> World for T {}
