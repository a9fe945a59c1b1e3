//! Colony configuration: every policy constant in one serde-loadable tree.
//!
//! Typically loaded from a JSON file by the host process and handed to the
//! colony builder.  Every field has a default, so a partial file such as
//! `{"movement": {"stuck_threshold": 8}}` is valid.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{CoreError, CoreResult, Role, RoleMap};

// ── ColonyConfig ──────────────────────────────────────────────────────────────

/// Top-level configuration.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ColonyConfig {
    /// Master RNG seed.  `None` seeds from OS entropy at startup.
    pub seed: Option<u64>,

    pub movement: MovementPolicy,
    pub economy:  EconomyPolicy,
    pub demand:   DemandPolicy,
    pub spawn:    SpawnPolicy,
}

impl ColonyConfig {
    /// Parse a JSON document and validate it.
    pub fn from_json_str(json: &str) -> CoreResult<Self> {
        let config: ColonyConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON config file.
    pub fn load(path: &Path) -> CoreResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Reject values that would make a component misbehave.
    pub fn validate(&self) -> CoreResult<()> {
        if self.movement.route_reuse == 0 {
            return Err(CoreError::Config("movement.route_reuse must be at least 1".into()));
        }
        if self.economy.carrier_capacity == 0 {
            return Err(CoreError::Config("economy.carrier_capacity must be positive".into()));
        }
        let tiers = &self.demand.sustainer_energy_tiers;
        if tiers.windows(2).any(|w| w[0].min_stored_energy <= w[1].min_stored_energy) {
            return Err(CoreError::Config(
                "demand.sustainer_energy_tiers must be sorted by descending min_stored_energy".into(),
            ));
        }
        Ok(())
    }
}

// ── Movement ──────────────────────────────────────────────────────────────────

/// Escalation thresholds and route-cache budgets for the movement coordinator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementPolicy {
    /// Consecutive ticks blocked by the same neighbour before a forced replan.
    pub block_threshold: u32,
    /// Consecutive failed ticks before a randomized sidestep.
    pub stuck_threshold: u32,
    /// Steps a cached route may be followed before it must be recomputed.
    pub route_reuse: u32,
    /// Lookups an `Unreachable` cache entry survives before pathfinding is retried.
    pub unreachable_retry: u32,
    /// Extra cost of an agent-occupied cell when replanning around agents.
    pub agent_avoid_cost: u32,
    /// Search budget handed to the pathfinder.
    pub max_path_ops: u32,
}

impl Default for MovementPolicy {
    fn default() -> Self {
        Self {
            block_threshold:   3,
            stuck_threshold:   5,
            route_reuse:       10,
            unreachable_retry: 5,
            agent_avoid_cost:  20,
            max_path_ops:      4_000,
        }
    }
}

// ── Economy ───────────────────────────────────────────────────────────────────

/// Inputs to the economic flow estimator that are not measured per source.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyPolicy {
    /// One-way distance assumed for a source that has not been measured yet.
    pub default_distance: u32,
    /// Energy extracted per worker per tick.
    pub extraction_rate: u32,
    /// Energy one carrier moves per trip.
    pub carrier_capacity: u32,
}

impl Default for EconomyPolicy {
    fn default() -> Self {
        Self {
            default_distance: 20,
            extraction_rate:  2,
            carrier_capacity: 200,
        }
    }
}

// ── Demand ────────────────────────────────────────────────────────────────────

/// A stored-energy band and the sustainer count it warrants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnergyTier {
    /// Applies when stored energy is strictly greater than this.
    pub min_stored_energy: u32,
    pub sustainers:        u32,
}

/// Constants of the per-role demand formulas.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemandPolicy {
    pub extractors_per_node: u32,
    pub min_carriers: u32,
    pub scout_cap: u32,
    /// Below this maturity tier the colony keeps a flat sustainer count.
    pub sustainer_maturity_tier: u8,
    pub sustainer_early: u32,
    /// Checked in order; the first matching band wins.
    pub sustainer_energy_tiers: Vec<EnergyTier>,
    pub sustainer_floor: u32,
}

impl Default for DemandPolicy {
    fn default() -> Self {
        Self {
            extractors_per_node:     2,
            min_carriers:            1,
            scout_cap:               3,
            sustainer_maturity_tier: 2,
            sustainer_early:         3,
            sustainer_energy_tiers:  vec![
                EnergyTier { min_stored_energy: 30_000, sustainers: 10 },
                EnergyTier { min_stored_energy: 5_000,  sustainers: 3 },
            ],
            sustainer_floor: 1,
        }
    }
}

// ── Spawn ─────────────────────────────────────────────────────────────────────

/// When the bootstrap override lifts carriers above extractors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BootstrapTrigger {
    /// Once there is at least one extractor per resource node.
    #[default]
    OnePerNode,
    /// Only once the full desired extractor complement exists.
    FullComplement,
}

/// Fixed priority score per role; higher is produced first.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RolePriorities {
    pub extractor: u32,
    pub carrier:   u32,
    pub scout:     u32,
    pub sustainer: u32,
}

impl Default for RolePriorities {
    fn default() -> Self {
        Self { extractor: 40, carrier: 30, scout: 20, sustainer: 10 }
    }
}

impl RolePriorities {
    pub fn to_role_map(&self) -> RoleMap<u32> {
        RoleMap::from_fn(|role| match role {
            Role::Extractor => self.extractor,
            Role::Carrier   => self.carrier,
            Role::Scout     => self.scout,
            Role::Sustainer => self.sustainer,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnPolicy {
    pub priorities: RolePriorities,
    pub bootstrap:  BootstrapTrigger,
}
