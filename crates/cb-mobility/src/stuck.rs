//! Stuck detection: per-agent failure counters and per-cell contest records.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use cb_core::{AgentId, GridCell, Tick};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct StuckCounter {
    count:     u32,
    last_tick: Tick,
}

/// Who has been standing in a contested cell, and for how many consecutive ticks.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContestRecord {
    pub blocker:   AgentId,
    pub count:     u32,
    pub last_tick: Tick,
}

/// Counters that drive the two escalation steps of movement: a forced
/// replan when the same neighbour keeps blocking a cell, and a random
/// sidestep when an agent keeps failing to move at all.
///
/// Both counters advance at most once per tick, so calling the coordinator
/// twice for the same agent in one tick does not double-count.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StuckTracker {
    agents:    FxHashMap<AgentId, StuckCounter>,
    #[serde(with = "cell_keyed")]
    contested: FxHashMap<GridCell, ContestRecord>,
}

impl StuckTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consecutive failed move attempts of `agent`.
    pub fn failures(&self, agent: AgentId) -> u32 {
        self.agents.get(&agent).map_or(0, |c| c.count)
    }

    /// Count one failed attempt at `tick` and return the new total.
    pub fn record_failure(&mut self, agent: AgentId, tick: Tick) -> u32 {
        let counter = self
            .agents
            .entry(agent)
            .or_insert(StuckCounter { count: 0, last_tick: tick });
        if counter.count == 0 || counter.last_tick != tick {
            counter.count += 1;
            counter.last_tick = tick;
        }
        counter.count
    }

    /// A successful step clears the agent's counter.
    pub fn reset(&mut self, agent: AgentId) {
        self.agents.remove(&agent);
    }

    pub fn contest(&self, cell: GridCell) -> Option<&ContestRecord> {
        self.contested.get(&cell)
    }

    /// Record that `blocker` holds `cell` at `tick` and return the number of
    /// consecutive ticks it has done so.
    ///
    /// A different blocker or a skipped tick starts the count over at 1.
    pub fn record_contest(&mut self, cell: GridCell, blocker: AgentId, tick: Tick) -> u32 {
        let record = self.contested.entry(cell).or_insert(ContestRecord {
            blocker,
            count: 0,
            last_tick: tick,
        });
        if record.blocker != blocker {
            *record = ContestRecord { blocker, count: 1, last_tick: tick };
        } else if record.count == 0 || tick.follows(record.last_tick) {
            record.count += 1;
            record.last_tick = tick;
        } else if record.last_tick != tick {
            record.count = 1;
            record.last_tick = tick;
        }
        record.count
    }

    pub fn clear_contest(&mut self, cell: GridCell) {
        self.contested.remove(&cell);
    }

    /// Drop counters of agents that no longer exist, including contest
    /// records whose blocker is gone.
    pub fn retain(&mut self, mut alive: impl FnMut(AgentId) -> bool) {
        self.agents.retain(|id, _| alive(*id));
        self.contested.retain(|_, record| alive(record.blocker));
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty() && self.contested.is_empty()
    }
}

/// JSON object keys must be strings, so cell-keyed maps travel as a sorted
/// list of `(cell, record)` pairs.
mod cell_keyed {
    use super::*;

    pub fn serialize<S: Serializer>(
        map: &FxHashMap<GridCell, ContestRecord>,
        s:   S,
    ) -> Result<S::Ok, S::Error> {
        let mut pairs: Vec<(&GridCell, &ContestRecord)> = map.iter().collect();
        pairs.sort_by_key(|(cell, _)| **cell);
        s.collect_seq(pairs)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<FxHashMap<GridCell, ContestRecord>, D::Error> {
        let pairs: Vec<(GridCell, ContestRecord)> = Vec::deserialize(d)?;
        Ok(pairs.into_iter().collect())
    }
}
