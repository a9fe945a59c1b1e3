//! Source survey and extractor assignment.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use cb_agent::AgentStore;
use cb_behavior::{SourceInfo, StructureInfo, StructureKind};
use cb_core::{GridCell, Role, SourceId, Tick};
use cb_economy::EconomyLedger;
use cb_spatial::Pathfinder;

use crate::ColonyResult;

/// Structures a carrier can deliver to.
fn is_delivery_point(kind: StructureKind) -> bool {
    kind.is_consumer() || kind == StructureKind::Storage
}

/// Record every source in the ledger and measure the distance of those not
/// yet measured.  A source with no reachable delivery point stays
/// unmeasured and is retried next tick.
pub fn survey_sources<P: Pathfinder + ?Sized>(
    ledger:     &mut EconomyLedger,
    pathfinder: &P,
    sources:    &[SourceInfo],
    structures: &[StructureInfo],
    now:        Tick,
) -> ColonyResult<()> {
    let sinks: Vec<GridCell> = structures
        .iter()
        .filter(|s| is_delivery_point(s.kind))
        .map(|s| s.cell)
        .collect();

    for source in sources {
        if ledger.survey(source.id, source.cell, now).is_measured() {
            continue;
        }
        let nearest = sinks
            .iter()
            .filter_map(|&sink| pathfinder.path_distance(source.cell, sink, 1))
            .min();
        match nearest {
            Some(distance) => {
                debug!(source = %source.id, distance, "measured source distance");
                ledger.record_distance(source.id, distance)?;
            }
            None => debug!(source = %source.id, "no delivery point in reach"),
        }
    }
    Ok(())
}

/// Give every unassigned extractor the least-loaded source (ties to the
/// lower id) and return the resulting load per source.
///
/// Assignments to sources that no longer exist are cleared first.
pub fn assign_extractors(agents: &mut AgentStore, sources: &[SourceId]) -> BTreeMap<SourceId, u32> {
    let mut load: BTreeMap<SourceId, u32> = sources.iter().map(|&s| (s, 0)).collect();
    let extractors = agents.ids_with_role(Role::Extractor);

    for &id in &extractors {
        let Some(agent) = agents.get_mut(id) else { continue };
        let Some(source) = agent.memory.assigned_source else { continue };
        match load.get_mut(&source) {
            Some(n) => *n += 1,
            None => {
                warn!(agent = %id, %source, "assigned source no longer reported");
                agent.memory.assigned_source = None;
            }
        }
    }

    for &id in &extractors {
        let Some(agent) = agents.get_mut(id) else { continue };
        if agent.memory.assigned_source.is_some() {
            continue;
        }
        let Some((&source, n)) = load.iter_mut().min_by_key(|(s, n)| (**n, **s)) else {
            break;
        };
        *n += 1;
        agent.memory.assigned_source = Some(source);
        debug!(agent = %id, %source, "extractor assigned");
    }
    load
}
