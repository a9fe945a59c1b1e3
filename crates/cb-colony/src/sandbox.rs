//! `SandboxWorld` — an in-memory room implementing every host contract.
//!
//! Commands take effect immediately.  Production, source regeneration, and
//! spawn refill advance only in [`SandboxWorld::end_tick`], which a driver
//! calls after each colony tick.

use std::collections::BTreeMap;

use tracing::debug;

use cb_agent::Capacity;
use cb_behavior::{
    AgentCommander, AgentView, Command, CommandResult, DroppedInfo, SiteInfo, SourceInfo,
    StructureInfo, StructureKind, WorldQuery,
};
use cb_core::{AgentId, GridCell, RegionId, Role, SourceId, TargetId};
use cb_spatial::{Terrain, TerrainGrid, Tile};
use cb_spawn::{Loadout, Part, SpawnError, SpawnResult, Spawner};

/// Energy one work part extracts per harvest.
pub const HARVEST_PER_WORK: u32 = 2;
/// Construction progress one work part adds per build.
pub const BUILD_PER_WORK: u32 = 5;
/// Capacity of one carry part.
pub const CARRY_CAPACITY: u32 = 50;
/// Ticks of production per part.
pub const TICKS_PER_PART: u32 = 3;
/// Controller progress per maturity tier.
pub const PROGRESS_PER_TIER: u32 = 200;

#[derive(Clone, Debug)]
pub struct SandboxAgent {
    pub role:       Role,
    pub cell:       GridCell,
    pub capacity:   Capacity,
    pub work_parts: u32,
}

#[derive(Clone, Debug)]
pub struct SandboxSource {
    pub info:   SourceInfo,
    pub max:    u32,
    pub regen:  u32,
}

#[derive(Clone, Debug)]
struct Production {
    role:      Role,
    loadout:   Loadout,
    remaining: u32,
}

pub struct SandboxWorld {
    home:       RegionId,
    terrain:    TerrainGrid,
    agents:     BTreeMap<AgentId, SandboxAgent>,
    sources:    Vec<SandboxSource>,
    structures: Vec<StructureInfo>,
    sites:      Vec<SiteInfo>,
    dropped:    BTreeMap<GridCell, DroppedInfo>,
    hostiles:   Vec<GridCell>,
    backlog:    Vec<RegionId>,
    exits:      BTreeMap<RegionId, GridCell>,
    tier:       u8,
    production: Option<Production>,
    next_agent: u32,
    next_target: u32,
}

impl SandboxWorld {
    /// An empty, all-plain home region.
    pub fn new(home: RegionId) -> Self {
        let mut terrain = TerrainGrid::new();
        terrain.add_region(home);
        Self {
            home,
            terrain,
            agents:      BTreeMap::new(),
            sources:     Vec::new(),
            structures:  Vec::new(),
            sites:       Vec::new(),
            dropped:     BTreeMap::new(),
            hostiles:    Vec::new(),
            backlog:     Vec::new(),
            exits:       BTreeMap::new(),
            tier:        1,
            production:  None,
            next_agent:  0,
            next_target: 0,
        }
    }

    /// A small starting room: one spawn, two sources, a storage, a
    /// controller, one construction site, a swamp patch, and two
    /// neighbouring regions to explore.
    pub fn outpost() -> Self {
        let home = RegionId(0);
        let mut world = Self::new(home);
        let at = |x, y| GridCell::new(home, x, y);

        for x in 30..34 {
            for y in 16..20 {
                world.terrain.set(at(x, y), Tile::Swamp);
            }
        }
        for y in 5..15 {
            world.terrain.set(at(20, y), Tile::Wall);
        }

        world.add_structure(StructureKind::Spawn, at(25, 25), 300, 300);
        world.add_structure(StructureKind::Storage, at(28, 25), 0, 10_000);
        world.add_structure(StructureKind::Controller, at(25, 35), 0, PROGRESS_PER_TIER);
        world.add_source(at(12, 10), 1500, 10);
        world.add_source(at(40, 12), 1500, 10);
        world.add_site(at(22, 25), 100);

        world.add_exit(RegionId(1), at(0, 25));
        world.add_exit(RegionId(2), at(49, 25));
        world
    }

    // ── Setup ─────────────────────────────────────────────────────────────────

    pub fn terrain(&self) -> &TerrainGrid {
        &self.terrain
    }

    pub fn terrain_mut(&mut self) -> &mut TerrainGrid {
        &mut self.terrain
    }

    fn next_target_id(&mut self) -> TargetId {
        let id = TargetId(self.next_target);
        self.next_target += 1;
        id
    }

    pub fn add_structure(&mut self, kind: StructureKind, cell: GridCell, energy: u32, capacity: u32) -> TargetId {
        let id = self.next_target_id();
        self.structures.push(StructureInfo { id, kind, cell, energy, capacity });
        id
    }

    pub fn add_source(&mut self, cell: GridCell, max: u32, regen: u32) -> SourceId {
        let id = SourceId(self.sources.len() as u32);
        self.sources.push(SandboxSource {
            info: SourceInfo { id, cell, energy: max },
            max,
            regen,
        });
        id
    }

    pub fn add_site(&mut self, cell: GridCell, total: u32) -> TargetId {
        let id = self.next_target_id();
        self.sites.push(SiteInfo { id, cell, progress: 0, total });
        id
    }

    pub fn add_exit(&mut self, region: RegionId, cell: GridCell) {
        self.exits.insert(region, cell);
        self.backlog.push(region);
    }

    pub fn add_hostile(&mut self, cell: GridCell) {
        self.hostiles.push(cell);
    }

    /// Place an agent directly, bypassing production.
    pub fn add_agent(&mut self, role: Role, cell: GridCell, loadout: &Loadout) -> AgentId {
        let id = AgentId(self.next_agent);
        self.next_agent += 1;
        self.agents.insert(id, SandboxAgent {
            role,
            cell,
            capacity:   Capacity::empty(loadout.count(Part::Carry) as u32 * CARRY_CAPACITY),
            work_parts: loadout.count(Part::Work) as u32,
        });
        id
    }

    pub fn remove_agent(&mut self, id: AgentId) -> Option<SandboxAgent> {
        self.agents.remove(&id)
    }

    pub fn agent(&self, id: AgentId) -> Option<&SandboxAgent> {
        self.agents.get(&id)
    }

    pub fn agent_mut(&mut self, id: AgentId) -> Option<&mut SandboxAgent> {
        self.agents.get_mut(&id)
    }

    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    /// Energy in spawn-type structures, the production budget.
    pub fn spawn_energy(&self) -> u32 {
        self.structures
            .iter()
            .filter(|s| s.kind.is_consumer())
            .map(|s| s.energy)
            .sum()
    }

    // ── Tick ──────────────────────────────────────────────────────────────────

    /// Advance production, regenerate sources, and refill the spawn by one.
    pub fn end_tick(&mut self) {
        if let Some(mut job) = self.production.take() {
            job.remaining = job.remaining.saturating_sub(1);
            if job.remaining > 0 {
                self.production = Some(job);
            } else if let Some(cell) = self.free_spawn_cell() {
                let id = self.add_agent(job.role, cell, &job.loadout);
                debug!(agent = %id, role = %job.role, %cell, "sandbox agent produced");
            } else {
                self.production = Some(job);
            }
        }
        for source in &mut self.sources {
            source.info.energy = (source.info.energy + source.regen).min(source.max);
        }
        for s in &mut self.structures {
            if s.kind == StructureKind::Spawn && s.energy < s.capacity {
                s.energy += 1;
            }
        }
    }

    fn free_spawn_cell(&self) -> Option<GridCell> {
        let spawn = self.structures.iter().find(|s| s.kind == StructureKind::Spawn)?;
        spawn
            .cell
            .neighbours()
            .map(|(_, cell)| cell)
            .find(|&cell| self.terrain.is_passable(cell) && !self.agents.values().any(|a| a.cell == cell))
    }

    fn pay(&mut self, mut cost: u32) {
        for s in self.structures.iter_mut().filter(|s| s.kind.is_consumer()) {
            let take = s.energy.min(cost);
            s.energy -= take;
            cost -= take;
        }
    }

    // ── Command handlers ──────────────────────────────────────────────────────

    fn in_reach(agent: &SandboxAgent, cell: GridCell) -> bool {
        agent.cell.distance(cell).is_some_and(|d| d <= 1)
    }

    fn harvest(&mut self, id: AgentId, source: SourceId) -> CommandResult {
        let Some(agent) = self.agents.get_mut(&id) else { return CommandResult::Failed };
        let Some(src) = self.sources.iter_mut().find(|s| s.info.id == source) else {
            return CommandResult::Failed;
        };
        if !Self::in_reach(agent, src.info.cell) {
            return CommandResult::TooFar;
        }
        if src.info.energy == 0 || agent.work_parts == 0 {
            return CommandResult::NotEnoughResource;
        }
        let mut amount = (agent.work_parts * HARVEST_PER_WORK).min(src.info.energy);
        let spill = if agent.capacity.total > 0 {
            amount = amount.min(agent.capacity.free());
            if amount == 0 {
                return CommandResult::Failed;
            }
            agent.capacity.used += amount;
            None
        } else {
            Some(agent.cell)
        };
        src.info.energy -= amount;
        if let Some(cell) = spill {
            self.drop_at(cell, amount);
        }
        CommandResult::Ok
    }

    fn drop_at(&mut self, cell: GridCell, amount: u32) {
        if let Some(pile) = self.dropped.get_mut(&cell) {
            pile.amount += amount;
            return;
        }
        let id = self.next_target_id();
        self.dropped.insert(cell, DroppedInfo { id, cell, amount });
    }

    fn pickup(&mut self, id: AgentId, target: TargetId) -> CommandResult {
        let Some(agent) = self.agents.get_mut(&id) else { return CommandResult::Failed };
        let free = agent.capacity.free();
        let pile_cell = self.dropped.values().find(|d| d.id == target).map(|d| d.cell);
        if let Some(cell) = pile_cell {
            if !Self::in_reach(agent, cell) {
                return CommandResult::TooFar;
            }
            let Some(pile) = self.dropped.get_mut(&cell) else { return CommandResult::Failed };
            let amount = pile.amount.min(free);
            if amount == 0 {
                return CommandResult::NotEnoughResource;
            }
            pile.amount -= amount;
            agent.capacity.used += amount;
            if pile.amount == 0 {
                self.dropped.remove(&cell);
            }
            return CommandResult::Ok;
        }
        let Some(store) = self.structures.iter_mut().find(|s| s.id == target && s.kind.is_store()) else {
            return CommandResult::Failed;
        };
        if !Self::in_reach(agent, store.cell) {
            return CommandResult::TooFar;
        }
        let amount = store.energy.min(free);
        if amount == 0 {
            return CommandResult::NotEnoughResource;
        }
        store.energy -= amount;
        agent.capacity.used += amount;
        CommandResult::Ok
    }

    fn transfer(&mut self, id: AgentId, target: TargetId) -> CommandResult {
        let Some(agent) = self.agents.get_mut(&id) else { return CommandResult::Failed };
        let Some(s) = self.structures.iter_mut().find(|s| s.id == target) else {
            return CommandResult::Failed;
        };
        if !Self::in_reach(agent, s.cell) {
            return CommandResult::TooFar;
        }
        if agent.capacity.used == 0 {
            return CommandResult::NotEnoughResource;
        }
        let amount = agent.capacity.used.min(s.free());
        if amount == 0 {
            return CommandResult::Failed;
        }
        s.energy += amount;
        agent.capacity.used -= amount;
        CommandResult::Ok
    }

    fn build(&mut self, id: AgentId, target: TargetId) -> CommandResult {
        let Some(agent) = self.agents.get_mut(&id) else { return CommandResult::Failed };
        let Some(index) = self.sites.iter().position(|s| s.id == target) else {
            return CommandResult::Failed;
        };
        let site = &mut self.sites[index];
        if !Self::in_reach(agent, site.cell) {
            return CommandResult::TooFar;
        }
        let amount = (agent.work_parts * BUILD_PER_WORK)
            .min(agent.capacity.used)
            .min(site.total - site.progress);
        if amount == 0 {
            return CommandResult::NotEnoughResource;
        }
        agent.capacity.used -= amount;
        site.progress += amount;
        if site.progress >= site.total {
            let done = self.sites.remove(index);
            debug!(site = %done.id, cell = %done.cell, "construction finished");
            self.add_structure(StructureKind::Extension, done.cell, 0, 50);
        }
        CommandResult::Ok
    }

    fn upgrade(&mut self, id: AgentId, target: TargetId) -> CommandResult {
        let Some(agent) = self.agents.get_mut(&id) else { return CommandResult::Failed };
        let Some(c) = self
            .structures
            .iter_mut()
            .find(|s| s.id == target && s.kind == StructureKind::Controller)
        else {
            return CommandResult::Failed;
        };
        if !Self::in_reach(agent, c.cell) {
            return CommandResult::TooFar;
        }
        let amount = agent.work_parts.min(agent.capacity.used);
        if amount == 0 {
            return CommandResult::NotEnoughResource;
        }
        agent.capacity.used -= amount;
        c.energy += amount;
        if c.energy >= c.capacity {
            c.energy -= c.capacity;
            self.tier = self.tier.saturating_add(1);
            debug!(tier = self.tier, "controller upgraded");
        }
        CommandResult::Ok
    }

    fn explore(&mut self, id: AgentId, region: RegionId) -> CommandResult {
        let Some(agent) = self.agents.get(&id) else { return CommandResult::Failed };
        let Some(&exit) = self.exits.get(&region) else { return CommandResult::Failed };
        if !Self::in_reach(agent, exit) {
            return CommandResult::TooFar;
        }
        self.backlog.retain(|&r| r != region);
        debug!(agent = %id, %region, "region explored");
        CommandResult::Ok
    }
}

// ── Host contracts ────────────────────────────────────────────────────────────

impl WorldQuery for SandboxWorld {
    fn home_region(&self) -> RegionId {
        self.home
    }

    fn agents(&self) -> Vec<AgentView> {
        self.agents
            .iter()
            .map(|(&id, a)| AgentView { id, role: a.role, cell: a.cell, capacity: a.capacity })
            .collect()
    }

    fn sources(&self, region: RegionId) -> Vec<SourceInfo> {
        self.sources
            .iter()
            .map(|s| s.info)
            .filter(|s| s.cell.region == region)
            .collect()
    }

    fn structures(&self, region: RegionId) -> Vec<StructureInfo> {
        self.structures.iter().copied().filter(|s| s.cell.region == region).collect()
    }

    fn hostiles(&self, region: RegionId) -> Vec<GridCell> {
        self.hostiles.iter().copied().filter(|c| c.region == region).collect()
    }

    fn construction_sites(&self, region: RegionId) -> Vec<SiteInfo> {
        self.sites.iter().copied().filter(|s| s.cell.region == region).collect()
    }

    fn dropped_resources(&self, region: RegionId) -> Vec<DroppedInfo> {
        self.dropped.values().copied().filter(|d| d.cell.region == region).collect()
    }

    fn maturity_tier(&self, region: RegionId) -> u8 {
        if region == self.home { self.tier } else { 0 }
    }

    fn exploration_backlog(&self) -> Vec<RegionId> {
        self.backlog.clone()
    }

    fn exit_toward(&self, from: RegionId, to: RegionId) -> Option<GridCell> {
        (from == self.home).then(|| self.exits.get(&to).copied()).flatten()
    }
}

impl AgentCommander for SandboxWorld {
    fn issue(&mut self, agent: AgentId, command: Command) -> CommandResult {
        match command {
            Command::Move(dir) => {
                let Some(a) = self.agents.get_mut(&agent) else { return CommandResult::Failed };
                match a.cell.step(dir) {
                    Some(next) if self.terrain.is_passable(next) => {
                        a.cell = next;
                        CommandResult::Ok
                    }
                    _ => CommandResult::Failed,
                }
            }
            Command::Harvest(source) => self.harvest(agent, source),
            Command::Pickup(target) => self.pickup(agent, target),
            Command::Transfer(target) => self.transfer(agent, target),
            Command::Drop => {
                let Some(a) = self.agents.get_mut(&agent) else { return CommandResult::Failed };
                if a.capacity.used == 0 {
                    return CommandResult::NotEnoughResource;
                }
                let (cell, amount) = (a.cell, a.capacity.used);
                a.capacity.used = 0;
                self.drop_at(cell, amount);
                CommandResult::Ok
            }
            Command::Build(target) => self.build(agent, target),
            Command::Upgrade(target) => self.upgrade(agent, target),
            Command::Explore(region) => self.explore(agent, region),
        }
    }
}

impl Spawner for SandboxWorld {
    fn is_producing(&self) -> bool {
        self.production.is_some()
    }

    fn energy_available(&self) -> u32 {
        self.spawn_energy()
    }

    fn produce(&mut self, role: Role, loadout: &Loadout) -> SpawnResult<()> {
        if self.production.is_some() {
            return Err(SpawnError::Busy);
        }
        let available = self.spawn_energy();
        if loadout.cost > available {
            return Err(SpawnError::NotEnoughEnergy { needed: loadout.cost, available });
        }
        if loadout.parts.is_empty() {
            return Err(SpawnError::Rejected("empty loadout".into()));
        }
        self.pay(loadout.cost);
        self.production = Some(Production {
            role,
            loadout:   loadout.clone(),
            remaining: loadout.parts.len() as u32 * TICKS_PER_PART,
        });
        Ok(())
    }
}
