//! Per-source economic records, created on first survey and never deleted.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use cb_core::{GridCell, SourceId, Tick};

use crate::{EconomyError, EconomyResult};

/// What the colony knows about one resource node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRecord {
    pub source:           SourceId,
    pub cell:             GridCell,
    /// Extractors currently assigned to this source.
    pub assigned_workers: u32,
    /// Measured one-way step distance to the nearest delivery point.
    pub distance:         Option<u32>,
    /// Energy per tick the assigned workers were extracting at last survey.
    pub last_throughput:  u32,
    pub surveyed_at:      Tick,
}

impl SourceRecord {
    pub fn new(source: SourceId, cell: GridCell, tick: Tick) -> Self {
        Self {
            source,
            cell,
            assigned_workers: 0,
            distance: None,
            last_throughput: 0,
            surveyed_at: tick,
        }
    }

    /// `true` once a distance has been measured.
    pub fn is_measured(&self) -> bool {
        self.distance.is_some()
    }
}

/// All source records of a colony, ordered by `SourceId`.
///
/// Ordered storage keeps iteration (and therefore carrier demand sums and
/// serialized output) independent of insertion history.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EconomyLedger {
    records: BTreeMap<SourceId, SourceRecord>,
}

impl EconomyLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Note that `source` was seen at `cell` on `tick`, creating its record
    /// on first sight.
    pub fn survey(&mut self, source: SourceId, cell: GridCell, tick: Tick) -> &mut SourceRecord {
        let record = self.records.entry(source).or_insert_with(|| {
            debug!(%source, %cell, "new source record");
            SourceRecord::new(source, cell, tick)
        });
        if record.cell != cell {
            // Same id reported elsewhere: the old measurement no longer applies.
            record.cell = cell;
            record.distance = None;
        }
        record.surveyed_at = tick;
        record
    }

    pub fn get(&self, source: SourceId) -> Option<&SourceRecord> {
        self.records.get(&source)
    }

    fn require_mut(&mut self, source: SourceId) -> EconomyResult<&mut SourceRecord> {
        self.records
            .get_mut(&source)
            .ok_or(EconomyError::UnknownSource(source))
    }

    pub fn record_distance(&mut self, source: SourceId, distance: u32) -> EconomyResult<()> {
        self.require_mut(source)?.distance = Some(distance);
        Ok(())
    }

    /// Update the assigned-worker count and the throughput it implies.
    pub fn set_assigned(&mut self, source: SourceId, workers: u32, extraction_rate: u32) -> EconomyResult<()> {
        let record = self.require_mut(source)?;
        record.assigned_workers = workers;
        record.last_throughput = workers.saturating_mul(extraction_rate);
        Ok(())
    }

    /// Every record, stale ones included.
    pub fn records(&self) -> impl Iterator<Item = &SourceRecord> {
        self.records.values()
    }

    /// Records of the given sources only; ids without a record are skipped.
    pub fn active<'a>(&'a self, sources: &'a [SourceId]) -> impl Iterator<Item = &'a SourceRecord> + 'a {
        let mut ids = sources.to_vec();
        ids.sort_unstable();
        ids.dedup();
        ids.into_iter().filter_map(move |id| self.records.get(&id))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
