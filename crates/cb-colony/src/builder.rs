//! `ColonyBuilder` — validated construction of a [`Colony`].

use tracing::info;

use cb_behavior::BehaviorTable;
use cb_core::{entropy_seed, ColonyConfig};
use cb_spatial::Pathfinder;
use cb_spawn::{LoadoutComposer, SpawnPlanner, SpawnScheduler};

use crate::{Colony, ColonyResult};

/// Builder for a [`Colony`].
///
/// # Example
///
/// ```rust,ignore
/// let colony = ColonyBuilder::new(GridPathfinder::new(terrain))
///     .config(ColonyConfig::load(path)?)
///     .build()?;
/// ```
pub struct ColonyBuilder<P: Pathfinder> {
    pathfinder: P,
    config:     ColonyConfig,
    behaviors:  Option<BehaviorTable>,
    composer:   Option<LoadoutComposer>,
}

impl<P: Pathfinder> ColonyBuilder<P> {
    pub fn new(pathfinder: P) -> Self {
        Self {
            pathfinder,
            config:    ColonyConfig::default(),
            behaviors: None,
            composer:  None,
        }
    }

    pub fn config(mut self, config: ColonyConfig) -> Self {
        self.config = config;
        self
    }

    /// Override the role behaviours.  Defaults to [`BehaviorTable::standard`].
    pub fn behaviors(mut self, behaviors: BehaviorTable) -> Self {
        self.behaviors = Some(behaviors);
        self
    }

    /// Override the loadout tier tables.  Defaults to the built-in tiers.
    pub fn composer(mut self, composer: LoadoutComposer) -> Self {
        self.composer = Some(composer);
        self
    }

    /// Validate the configuration and build the colony.
    ///
    /// Without a configured seed one is drawn from entropy; the chosen seed
    /// is logged so a run can be reproduced.
    pub fn build(self) -> ColonyResult<Colony<P>> {
        self.config.validate()?;
        let seed = self.config.seed.unwrap_or_else(entropy_seed);
        info!(seed, "colony built");

        let planner = SpawnPlanner::new(
            SpawnScheduler::new(&self.config.spawn),
            self.composer.unwrap_or_default(),
        );
        Ok(Colony {
            config: self.config,
            seed,
            pathfinder: self.pathfinder,
            behaviors: self.behaviors.unwrap_or_default(),
            planner,
        })
    }
}
