//! Built-in role behaviours.
//!
//! These are deliberately plain: pick a target, walk to it, act on it.
//! Hosts with smarter strategies replace them through
//! [`BehaviorTable::with`][crate::BehaviorTable::with].

use tracing::{debug, warn};

use cb_agent::{Agent, RoleState, ScoutPhase, WorkPhase};
use cb_core::GridCell;

use crate::{
    Approach, BehaviorContext, BehaviorResult, Command, CommandResult, RoleBehavior, StructureKind,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// The item closest to `from` by grid distance; ties go to the earlier item.
fn nearest<T: Copy>(from: GridCell, items: &[T], cell_of: impl Fn(&T) -> GridCell) -> Option<T> {
    items
        .iter()
        .enumerate()
        .filter_map(|(i, item)| from.distance(cell_of(item)).map(|d| (d, i, *item)))
        .min_by_key(|&(d, i, _)| (d, i))
        .map(|(_, _, item)| item)
}

fn work_phase(agent: &mut Agent) -> WorkPhase {
    agent.memory.advance_work(agent.capacity);
    agent.memory.state.work_phase().unwrap_or_default()
}

// ── Extractor ─────────────────────────────────────────────────────────────────

/// Harvests its assigned source and drops the energy where it stands.
pub struct ExtractorBehavior;

impl RoleBehavior for ExtractorBehavior {
    fn run(&self, agent: &mut Agent, ctx: &mut BehaviorContext<'_, '_>) -> BehaviorResult<()> {
        let phase = work_phase(agent);
        let Some(id) = agent.memory.assigned_source else {
            return Ok(());
        };
        let Some(source) = ctx.world.source(id) else {
            warn!(agent = %agent.id, source = %id, "assigned source is gone");
            agent.memory.assigned_source = None;
            return Ok(());
        };
        // Without carry parts the host drops the harvest straight to the ground.
        if phase == WorkPhase::Gathering || agent.capacity.total == 0 {
            ctx.act_at(agent, source.cell, Command::Harvest(id))?;
        } else {
            ctx.issue(agent.id, Command::Drop);
        }
        Ok(())
    }
}

// ── Carrier ───────────────────────────────────────────────────────────────────

/// Collects its reserved pickup target, then fills spawns and extensions,
/// falling back to storage.
pub struct CarrierBehavior;

impl RoleBehavior for CarrierBehavior {
    fn run(&self, agent: &mut Agent, ctx: &mut BehaviorContext<'_, '_>) -> BehaviorResult<()> {
        match work_phase(agent) {
            WorkPhase::Gathering => {
                let Some(id) = agent.memory.reservation else {
                    return Ok(());
                };
                let Some(target) = ctx.world.pickup(id) else {
                    debug!(agent = %agent.id, target = %id, "reserved pickup vanished");
                    agent.memory.reservation = None;
                    return Ok(());
                };
                if let Approach::Acted(CommandResult::NotEnoughResource | CommandResult::Failed) =
                    ctx.act_at(agent, target.cell, Command::Pickup(id))?
                {
                    agent.memory.reservation = None;
                }
            }
            WorkPhase::Spending => {
                let structures = ctx.world.structures(ctx.world.home_region());
                let consumers: Vec<_> = structures
                    .iter()
                    .copied()
                    .filter(|s| s.kind.is_consumer() && s.free() > 0)
                    .collect();
                let stores: Vec<_> = structures
                    .iter()
                    .copied()
                    .filter(|s| s.kind == StructureKind::Storage && s.free() > 0)
                    .collect();
                let target = nearest(agent.cell, &consumers, |s| s.cell)
                    .or_else(|| nearest(agent.cell, &stores, |s| s.cell));
                if let Some(target) = target {
                    ctx.act_at(agent, target.cell, Command::Transfer(target.id))?;
                }
            }
        }
        Ok(())
    }
}

// ── Sustainer ─────────────────────────────────────────────────────────────────

/// Takes energy from the nearest pickup (or harvests), then builds pending
/// construction sites before feeding the controller.
pub struct SustainerBehavior;

impl RoleBehavior for SustainerBehavior {
    fn run(&self, agent: &mut Agent, ctx: &mut BehaviorContext<'_, '_>) -> BehaviorResult<()> {
        let region = ctx.world.home_region();
        match work_phase(agent) {
            WorkPhase::Gathering => {
                let pickups = ctx.world.pickup_candidates(region);
                if let Some(p) = nearest(agent.cell, &pickups, |p| p.cell) {
                    ctx.act_at(agent, p.cell, Command::Pickup(p.id))?;
                } else if let Some(s) = nearest(agent.cell, &ctx.world.sources(region), |s| s.cell) {
                    ctx.act_at(agent, s.cell, Command::Harvest(s.id))?;
                }
            }
            WorkPhase::Spending => {
                let sites = ctx.world.construction_sites(region);
                if let Some(site) = nearest(agent.cell, &sites, |s| s.cell) {
                    ctx.act_at(agent, site.cell, Command::Build(site.id))?;
                    return Ok(());
                }
                let controller = ctx
                    .world
                    .structures(region)
                    .into_iter()
                    .find(|s| s.kind == StructureKind::Controller);
                if let Some(c) = controller {
                    ctx.act_at(agent, c.cell, Command::Upgrade(c.id))?;
                }
            }
        }
        Ok(())
    }
}

// ── Scout ─────────────────────────────────────────────────────────────────────

/// Works through the exploration backlog one region at a time.
pub struct ScoutBehavior;

impl RoleBehavior for ScoutBehavior {
    fn run(&self, agent: &mut Agent, ctx: &mut BehaviorContext<'_, '_>) -> BehaviorResult<()> {
        let RoleState::Scout(phase) = agent.memory.state else {
            return Ok(());
        };
        let next = match phase {
            ScoutPhase::Idle => match ctx.world.exploration_backlog().first() {
                Some(&region) => phase.assign(region),
                None => phase,
            },
            ScoutPhase::Travelling(region) => {
                match ctx.world.exit_toward(agent.cell.region, region) {
                    None => {
                        debug!(agent = %agent.id, %region, "no way into region; dropping it");
                        ScoutPhase::Idle
                    }
                    Some(exit) => match ctx.act_at(agent, exit, Command::Explore(region))? {
                        Approach::Acted(CommandResult::Ok) => phase.arrive(region),
                        Approach::Acted(_) => ScoutPhase::Idle,
                        Approach::Moving(_) => phase,
                    },
                }
            }
            ScoutPhase::Surveying(_) => phase.finish(),
        };
        agent.memory.state = RoleState::Scout(next);
        Ok(())
    }
}
