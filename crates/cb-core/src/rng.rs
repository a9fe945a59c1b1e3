//! Deterministic, injectable randomness.
//!
//! # Determinism strategy
//!
//! Randomness is only used to break gridlock (shuffled sidestep candidates).
//! Each draw comes from a `SmallRng` seeded by:
//!
//!   seed = global_seed XOR (agent_id * MIXING_CONSTANT) XOR (tick * MIXING_CONSTANT²)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio.
//! Because the stream depends only on `(seed, agent, tick)`, re-running a tick
//! with the same inputs reproduces the same choices, and no RNG state has to
//! be carried between ticks.  Tests pass a fixed `global_seed`; production
//! seeds it once from [`entropy_seed`].

use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::{AgentId, Tick};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Draw a fresh global seed from operating-system entropy.
pub fn entropy_seed() -> u64 {
    rand::random()
}

/// Per-agent, per-tick deterministic RNG.
pub struct AgentRng(SmallRng);

impl AgentRng {
    /// Seed deterministically from the run's global seed, an agent, and a tick.
    pub fn for_tick(global_seed: u64, agent: AgentId, tick: Tick) -> Self {
        let seed = global_seed
            ^ (agent.0 as u64).wrapping_mul(MIXING_CONSTANT)
            ^ tick.0.wrapping_mul(MIXING_CONSTANT.wrapping_mul(MIXING_CONSTANT));
        AgentRng(SmallRng::seed_from_u64(seed))
    }

    /// Shuffle a mutable slice in-place (Fisher-Yates).
    #[inline]
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.0);
    }
}
