//! The per-tick orchestrator.

use tracing::{debug, warn};

use cb_agent::{Agent, AgentStore};
use cb_behavior::{BehaviorContext, BehaviorTable, Command, CommandResult, TaskAllocator, World};
use cb_core::{ColonyConfig, SourceId, Tick};
use cb_economy::{DemandCalculator, RoomState};
use cb_mobility::{MovementCoordinator, OccupancySnapshot};
use cb_spatial::Pathfinder;
use cb_spawn::{SpawnPlanner, Spawner};

use crate::survey::{assign_extractors, survey_sources};
use crate::{ColonyObserver, ColonyResult, StateStore, TickReport};

/// The colony's decision core.
///
/// Construct via [`ColonyBuilder`][crate::ColonyBuilder].  A `Colony` holds
/// only immutable policy; everything that changes between ticks lives in the
/// [`StateStore`] the caller passes in.
pub struct Colony<P: Pathfinder> {
    pub(crate) config:     ColonyConfig,
    pub(crate) seed:       u64,
    pub(crate) pathfinder: P,
    pub(crate) behaviors:  BehaviorTable,
    pub(crate) planner:    SpawnPlanner,
}

impl<P: Pathfinder> Colony<P> {
    pub fn config(&self) -> &ColonyConfig {
        &self.config
    }

    /// The seed every per-agent random stream is derived from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn pathfinder(&self) -> &P {
        &self.pathfinder
    }

    pub fn planner(&self) -> &SpawnPlanner {
        &self.planner
    }

    /// [`tick`][Self::tick] wrapped in observer callbacks.
    pub fn step<W: World + Spawner>(
        &self,
        now:      Tick,
        world:    &mut W,
        state:    &mut StateStore,
        observer: &mut dyn ColonyObserver,
    ) -> ColonyResult<TickReport> {
        observer.on_tick_start(now);
        let report = self.tick(now, world, state)?;
        observer.on_tick_end(now, &report);
        Ok(report)
    }

    /// Process one tick end to end.
    ///
    /// Order within the tick:
    /// 1. rebuild the agent arena from the host, restoring memories and
    ///    pruning state of agents that no longer exist;
    /// 2. survey sources and (re)assign extractors;
    /// 3. run the task allocator over all carriers;
    /// 4. run every agent's role behaviour in id order through one
    ///    movement coordinator, then issue the resulting move commands;
    /// 5. compute demand and run one spawn scheduling pass;
    /// 6. write memories back into `state`.
    ///
    /// Failures of individual behaviours and commands are logged and
    /// counted, never propagated.  An `Err` means the state store itself
    /// could not be updated.
    pub fn tick<W: World + Spawner>(
        &self,
        now:   Tick,
        world: &mut W,
        state: &mut StateStore,
    ) -> ColonyResult<TickReport> {
        let home = world.home_region();

        // ── Agents ────────────────────────────────────────────────────────────
        let mut agents = AgentStore::new();
        for view in world.agents() {
            let mut agent = Agent::new(view.id, view.role, view.cell, view.capacity);
            agent.memory = state.take_memory(view.id, view.role);
            agents.insert(agent);
        }
        let pruned = state.prune(|id| agents.contains(id));
        if pruned > 0 {
            debug!(%now, pruned, "dropped memories of dead agents");
        }

        // ── Survey ────────────────────────────────────────────────────────────
        let sources = world.sources(home);
        let structures = world.structures(home);
        survey_sources(&mut state.ledger, &self.pathfinder, &sources, &structures, now)?;

        let source_ids: Vec<SourceId> = sources.iter().map(|s| s.id).collect();
        let rate = self.config.economy.extraction_rate;
        for (source, workers) in assign_extractors(&mut agents, &source_ids) {
            state.ledger.set_assigned(source, workers, rate)?;
        }

        let room = RoomState {
            node_count:          sources.len() as u32,
            stored_energy:       world.stored_energy(home),
            maturity_tier:       world.maturity_tier(home),
            exploration_backlog: world.exploration_backlog().len() as u32,
        };

        // ── Allocation ────────────────────────────────────────────────────────
        let allocation = TaskAllocator::new(&self.pathfinder).allocate(&*world, &mut agents);

        // ── Behaviours and movement ───────────────────────────────────────────
        let pathfinder: &dyn Pathfinder = &self.pathfinder;
        let mut coordinator = MovementCoordinator::new(
            &self.config.movement,
            pathfinder,
            &mut state.mobility,
            OccupancySnapshot::from_agents(&agents),
            now,
            self.seed,
        );
        let mut errors = 0u32;
        {
            let mut ctx = BehaviorContext::new(now, &mut *world, &mut coordinator);
            for id in agents.ids() {
                let Some(agent) = agents.get_mut(id) else { continue };
                if let Err(err) = self.behaviors.get(agent.role).run(agent, &mut ctx) {
                    warn!(agent = %id, role = %agent.role, %err, "behaviour failed");
                    errors += 1;
                }
            }
        }
        let movement = coordinator.finish();

        for order in &movement.orders {
            let result = world.issue(order.agent, Command::Move(order.direction));
            if result != CommandResult::Ok {
                warn!(agent = %order.agent, direction = %order.direction, ?result, "move command refused");
                errors += 1;
            }
        }

        // ── Spawning ──────────────────────────────────────────────────────────
        let actual = agents.counts_by_role();
        let desired = DemandCalculator::new(&self.config.demand, &self.config.economy)
            .desired(&room, state.ledger.active(&source_ids));
        let spawn = self.planner.run(&mut *world, &desired, &actual, room.node_count);

        // ── Write back ────────────────────────────────────────────────────────
        for agent in agents.iter() {
            state.memories.insert(agent.id, agent.memory.clone());
        }

        Ok(TickReport {
            tick: now,
            agents: agents.len(),
            actual,
            desired,
            spawn,
            movement: movement.stats,
            allocation,
            hostiles: world.hostiles(home).len(),
            pruned,
            errors,
        })
    }
}
