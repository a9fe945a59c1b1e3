//! Unit tests for cb-economy.

use proptest::prelude::*;

use cb_core::{DemandPolicy, EconomyPolicy, GridCell, RegionId, Role, SourceId, Tick};

use crate::{
    required_carriers, DemandCalculator, EconomyError, EconomyLedger, FlowEstimator, RoomState,
    SourceRecord,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn cell(x: u8, y: u8) -> GridCell {
    GridCell::new(RegionId(0), x, y)
}

fn record(workers: u32, distance: Option<u32>) -> SourceRecord {
    let mut r = SourceRecord::new(SourceId(0), cell(10, 10), Tick(1));
    r.assigned_workers = workers;
    r.distance = distance;
    r
}

fn room(node_count: u32, stored_energy: u32, maturity_tier: u8, exploration_backlog: u32) -> RoomState {
    RoomState { node_count, stored_energy, maturity_tier, exploration_backlog }
}

// ── Ledger ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod ledger {
    use super::*;

    #[test]
    fn survey_creates_once() {
        let mut ledger = EconomyLedger::new();
        ledger.survey(SourceId(3), cell(1, 1), Tick(1));
        ledger.record_distance(SourceId(3), 14).unwrap();
        ledger.survey(SourceId(3), cell(1, 1), Tick(9));
        let r = ledger.get(SourceId(3)).unwrap();
        assert_eq!(ledger.len(), 1);
        assert_eq!(r.distance, Some(14));
        assert_eq!(r.surveyed_at, Tick(9));
    }

    #[test]
    fn moved_source_loses_measurement() {
        let mut ledger = EconomyLedger::new();
        ledger.survey(SourceId(3), cell(1, 1), Tick(1));
        ledger.record_distance(SourceId(3), 14).unwrap();
        ledger.survey(SourceId(3), cell(5, 5), Tick(2));
        assert!(!ledger.get(SourceId(3)).unwrap().is_measured());
    }

    #[test]
    fn updates_to_unknown_source_fail() {
        let mut ledger = EconomyLedger::new();
        assert_eq!(
            ledger.record_distance(SourceId(1), 5),
            Err(EconomyError::UnknownSource(SourceId(1)))
        );
        assert!(ledger.set_assigned(SourceId(1), 2, 2).is_err());
    }

    #[test]
    fn set_assigned_updates_throughput() {
        let mut ledger = EconomyLedger::new();
        ledger.survey(SourceId(1), cell(0, 0), Tick(1));
        ledger.set_assigned(SourceId(1), 3, 2).unwrap();
        assert_eq!(ledger.get(SourceId(1)).unwrap().last_throughput, 6);
    }

    #[test]
    fn active_skips_stale_and_unknown() {
        let mut ledger = EconomyLedger::new();
        ledger.survey(SourceId(1), cell(0, 0), Tick(1));
        ledger.survey(SourceId(2), cell(0, 1), Tick(1));
        let ids: Vec<SourceId> = ledger
            .active(&[SourceId(2), SourceId(7), SourceId(2)])
            .map(|r| r.source)
            .collect();
        assert_eq!(ids, vec![SourceId(2)]);
        assert_eq!(ledger.records().count(), 2);
    }

    #[test]
    fn json_round_trip() {
        let mut ledger = EconomyLedger::new();
        ledger.survey(SourceId(4), cell(2, 3), Tick(5));
        ledger.record_distance(SourceId(4), 11).unwrap();
        let json = serde_json::to_string(&ledger).unwrap();
        let back: EconomyLedger = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ledger);
    }
}

// ── Flow estimator ────────────────────────────────────────────────────────────

#[cfg(test)]
mod flow {
    use super::*;

    #[test]
    fn worked_example() {
        // 2 workers × 2/tick × 40-step round trip / 200 capacity.
        assert_eq!(required_carriers(2, 2, 20, 200), 1);
        assert_eq!(required_carriers(5, 2, 30, 100), 6);
    }

    #[test]
    fn zero_capacity_is_treated_as_one() {
        assert_eq!(required_carriers(1, 1, 1, 0), 2);
    }

    #[test]
    fn unmeasured_source_uses_default_distance() {
        let policy = EconomyPolicy::default();
        let est = FlowEstimator::new(&policy);
        assert_eq!(est.distance(&record(2, None)), 20);
        assert_eq!(est.carriers_for(&record(2, None)), 1);
    }

    #[test]
    fn worked_source_needs_at_least_one() {
        let policy = EconomyPolicy { carrier_capacity: 10_000, ..EconomyPolicy::default() };
        let est = FlowEstimator::new(&policy);
        assert_eq!(est.carriers_for(&record(1, Some(1))), 1);
        assert_eq!(est.carriers_for(&record(0, Some(50))), 0);
    }

    #[test]
    fn total_sums_sources() {
        let policy = EconomyPolicy::default();
        let est = FlowEstimator::new(&policy);
        let records = [record(2, Some(20)), record(4, Some(50))];
        // 1 + ceil(4·2·100/200) = 1 + 4
        assert_eq!(est.total_carriers(&records), 5);
    }

    proptest! {
        #[test]
        fn non_decreasing_in_workers(w in 0u32..1_000, rate in 0u32..50, d in 0u32..200, c in 0u32..5_000) {
            prop_assert!(required_carriers(w, rate, d, c) <= required_carriers(w + 1, rate, d, c));
        }

        #[test]
        fn non_increasing_in_capacity(w in 0u32..1_000, rate in 0u32..50, d in 0u32..200, c in 0u32..5_000) {
            prop_assert!(required_carriers(w, rate, d, c + 1) <= required_carriers(w, rate, d, c));
        }
    }
}

// ── Demand calculator ─────────────────────────────────────────────────────────

#[cfg(test)]
mod demand {
    use super::*;

    fn desired(room: &RoomState, records: &[SourceRecord]) -> cb_core::RoleMap<u32> {
        let demand = DemandPolicy::default();
        let economy = EconomyPolicy::default();
        DemandCalculator::new(&demand, &economy).desired(room, records)
    }

    #[test]
    fn end_to_end_single_source() {
        let out = desired(&room(1, 0, 1, 0), &[record(2, Some(20))]);
        assert_eq!(out[Role::Extractor], 2);
        assert_eq!(out[Role::Carrier], 1);
    }

    #[test]
    fn carriers_have_a_floor() {
        let out = desired(&room(0, 0, 1, 0), &[]);
        assert_eq!(out[Role::Carrier], 1);
    }

    #[test]
    fn scouts_clamped_between_one_and_cap() {
        assert_eq!(desired(&room(1, 0, 0, 0), &[])[Role::Scout], 1);
        assert_eq!(desired(&room(1, 0, 0, 2), &[])[Role::Scout], 2);
        assert_eq!(desired(&room(1, 0, 0, 9), &[])[Role::Scout], 3);
    }

    #[test]
    fn sustainers_flat_while_immature() {
        assert_eq!(desired(&room(1, 50_000, 1, 0), &[])[Role::Sustainer], 3);
    }

    #[test]
    fn sustainers_follow_energy_bands() {
        assert_eq!(desired(&room(1, 30_001, 2, 0), &[])[Role::Sustainer], 10);
        assert_eq!(desired(&room(1, 30_000, 2, 0), &[])[Role::Sustainer], 3);
        assert_eq!(desired(&room(1, 5_001, 3, 0), &[])[Role::Sustainer], 3);
        assert_eq!(desired(&room(1, 5_000, 3, 0), &[])[Role::Sustainer], 1);
    }

    proptest! {
        #[test]
        fn deterministic(nodes in 0u32..10, energy in 0u32..100_000, tier in 0u8..8, backlog in 0u32..10) {
            let r = room(nodes, energy, tier, backlog);
            prop_assert_eq!(desired(&r, &[]), desired(&r, &[]));
        }
    }
}
