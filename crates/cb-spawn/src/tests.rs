//! Unit tests for cb-spawn.

use std::io::{Cursor, Write};

use proptest::prelude::*;

use cb_core::{BootstrapTrigger, Role, RoleMap, SpawnPolicy};

use crate::{
    load_tiers_csv, load_tiers_reader, Loadout, LoadoutComposer, Part, SlotState, SpawnError,
    SpawnOutcome, SpawnPlanner, SpawnResult, SpawnScheduler, Spawner, TierTable,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// `[extractor, carrier, scout, sustainer]`
fn counts(v: [u32; 4]) -> RoleMap<u32> {
    RoleMap::from_fn(|r| v[r.index()])
}

fn scheduler() -> SpawnScheduler {
    SpawnScheduler::new(&SpawnPolicy::default())
}

/// A loadout of `n` tough parts, which cost 10 each.
fn tough(n: usize) -> Loadout {
    Loadout::of(&[(Part::Tough, n)])
}

struct FakeSpawner {
    producing: bool,
    energy:    u32,
    produced:  Vec<(Role, u32)>,
}

impl FakeSpawner {
    fn idle(energy: u32) -> Self {
        Self { producing: false, energy, produced: Vec::new() }
    }
}

impl Spawner for FakeSpawner {
    fn is_producing(&self) -> bool {
        self.producing
    }

    fn energy_available(&self) -> u32 {
        self.energy
    }

    fn produce(&mut self, role: Role, loadout: &Loadout) -> SpawnResult<()> {
        if loadout.cost > self.energy {
            return Err(SpawnError::NotEnoughEnergy { needed: loadout.cost, available: self.energy });
        }
        self.produced.push((role, loadout.cost));
        self.producing = true;
        Ok(())
    }
}

// ── Loadouts ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loadouts {
    use super::*;

    fn table() -> TierTable {
        TierTable::new(Role::Extractor, vec![tough(25), tough(55), tough(80)]).unwrap()
    }

    #[test]
    fn richest_affordable_tier() {
        assert_eq!(table().richest_within(600).cost, 550);
        assert_eq!(table().richest_within(800).cost, 800);
        assert_eq!(table().richest_within(5_000).cost, 800);
    }

    #[test]
    fn below_cheapest_returns_cheapest() {
        assert_eq!(table().richest_within(10).cost, 250);
    }

    #[test]
    fn rejects_non_increasing_costs() {
        let err = TierTable::new(Role::Carrier, vec![tough(5), tough(5)]).unwrap_err();
        assert!(matches!(err, SpawnError::InvalidTiers { role: Role::Carrier, .. }));
        assert!(TierTable::new(Role::Carrier, vec![]).is_err());
    }

    #[test]
    fn default_tables_are_valid() {
        let composer = LoadoutComposer::default();
        for role in Role::ALL {
            let tiers = composer.table(role).tiers().to_vec();
            assert!(TierTable::new(role, tiers).is_ok(), "{role}");
        }
    }

    #[test]
    fn loadout_cost_and_display() {
        let l = Loadout::of(&[(Part::Work, 2), (Part::Move, 1)]);
        assert_eq!(l.cost, 250);
        assert_eq!(l.count(Part::Work), 2);
        assert_eq!(l.to_string(), "250[work work move]");
    }
}

// ── Loader ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use super::*;

    const CSV: &str = "\
role,cost,parts
carrier,100,carry move
carrier,200,carry carry move move
";

    #[test]
    fn overrides_listed_roles_only() {
        let composer = load_tiers_reader(Cursor::new(CSV)).unwrap();
        let costs: Vec<u32> = composer.table(Role::Carrier).tiers().iter().map(|t| t.cost).collect();
        assert_eq!(costs, vec![100, 200]);
        assert_eq!(
            composer.table(Role::Extractor),
            LoadoutComposer::default().table(Role::Extractor)
        );
    }

    #[test]
    fn cost_mismatch_is_rejected() {
        let csv = "role,cost,parts\nscout,60,move\n";
        let err = load_tiers_reader(Cursor::new(csv)).unwrap_err();
        assert!(matches!(err, SpawnError::CostMismatch { declared: 60, computed: 50, .. }));
    }

    #[test]
    fn unknown_part_and_role_are_rejected() {
        assert!(load_tiers_reader(Cursor::new("role,cost,parts\nscout,50,wing\n")).is_err());
        assert!(load_tiers_reader(Cursor::new("role,cost,parts\npilot,50,move\n")).is_err());
    }

    #[test]
    fn out_of_order_rows_are_rejected() {
        let csv = "role,cost,parts\nscout,100,move move\nscout,50,move\n";
        let err = load_tiers_reader(Cursor::new(csv)).unwrap_err();
        assert!(matches!(err, SpawnError::InvalidTiers { role: Role::Scout, .. }));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CSV.as_bytes()).unwrap();
        let composer = load_tiers_csv(file.path()).unwrap();
        assert_eq!(composer.compose(Role::Carrier, 150).cost, 100);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_tiers_csv(std::path::Path::new("/nonexistent/tiers.csv")).unwrap_err();
        assert!(matches!(err, SpawnError::Io(_)));
    }
}

// ── Scheduler ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod scheduler {
    use super::*;

    #[test]
    fn highest_priority_unmet_role() {
        let desired = counts([2, 1, 1, 3]);
        let actual = counts([0, 0, 0, 0]);
        assert_eq!(scheduler().select(SlotState::Idle, &desired, &actual, 1), Some(Role::Extractor));
    }

    #[test]
    fn bootstrap_override_picks_carrier() {
        let desired = counts([4, 2, 1, 3]);
        let actual = counts([2, 0, 0, 0]);
        assert_eq!(scheduler().select(SlotState::Idle, &desired, &actual, 2), Some(Role::Carrier));
    }

    #[test]
    fn no_override_before_one_extractor_per_node() {
        let desired = counts([4, 2, 1, 3]);
        let actual = counts([1, 0, 0, 0]);
        assert_eq!(scheduler().select(SlotState::Idle, &desired, &actual, 2), Some(Role::Extractor));
    }

    #[test]
    fn full_complement_trigger_waits_for_all_extractors() {
        let policy = SpawnPolicy { bootstrap: BootstrapTrigger::FullComplement, ..SpawnPolicy::default() };
        let s = SpawnScheduler::new(&policy);
        let desired = counts([4, 2, 1, 3]);
        assert_eq!(s.select(SlotState::Idle, &desired, &counts([2, 0, 0, 0]), 2), Some(Role::Extractor));
        assert_eq!(s.select(SlotState::Idle, &desired, &counts([4, 0, 0, 0]), 2), Some(Role::Carrier));
    }

    #[test]
    fn producing_slot_selects_nothing() {
        let desired = counts([2, 1, 1, 3]);
        assert_eq!(scheduler().select(SlotState::Producing, &desired, &counts([0; 4]), 1), None);
    }

    #[test]
    fn satisfied_demand_selects_nothing() {
        let c = counts([2, 1, 1, 3]);
        assert_eq!(scheduler().select(SlotState::Idle, &c, &c, 1), None);
    }

    #[test]
    fn equal_priorities_follow_role_order() {
        let mut policy = SpawnPolicy::default();
        policy.priorities.scout = 5;
        policy.priorities.sustainer = 5;
        let s = SpawnScheduler::new(&policy);
        let desired = counts([0, 0, 1, 1]);
        assert_eq!(s.select(SlotState::Idle, &desired, &counts([0; 4]), 0), Some(Role::Scout));
    }

    proptest! {
        #[test]
        fn never_selects_satisfied_role(
            desired in prop::array::uniform4(0u32..6),
            actual in prop::array::uniform4(0u32..6),
            nodes in 0u32..4,
        ) {
            let (d, a) = (counts(desired), counts(actual));
            if let Some(role) = scheduler().select(SlotState::Idle, &d, &a, nodes) {
                prop_assert!(d[role] > a[role]);
            }
        }
    }
}

// ── Planner ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod planner {
    use super::*;

    fn planner() -> SpawnPlanner {
        SpawnPlanner::new(scheduler(), LoadoutComposer::default())
    }

    #[test]
    fn orders_richest_affordable_loadout() {
        let mut spawner = FakeSpawner::idle(550);
        let out = planner().run(&mut spawner, &counts([2, 1, 1, 1]), &counts([0; 4]), 1);
        let SpawnOutcome::Ordered(order) = out else { panic!("expected an order, got {out:?}") };
        assert_eq!(order.role, Role::Extractor);
        assert_eq!(order.loadout.cost, 500);
        assert_eq!(spawner.produced, vec![(Role::Extractor, 500)]);
    }

    #[test]
    fn busy_spawner_is_left_alone() {
        let mut spawner = FakeSpawner { producing: true, ..FakeSpawner::idle(1_000) };
        let out = planner().run(&mut spawner, &counts([2, 1, 1, 1]), &counts([0; 4]), 1);
        assert_eq!(out, SpawnOutcome::Busy);
        assert!(spawner.produced.is_empty());
    }

    #[test]
    fn rejection_is_reported_not_retried() {
        let mut spawner = FakeSpawner::idle(100);
        let out = planner().run(&mut spawner, &counts([2, 1, 1, 1]), &counts([0; 4]), 1);
        let SpawnOutcome::Rejected { order, .. } = &out else { panic!("expected rejection, got {out:?}") };
        // Below the cheapest tier the cheapest is still requested.
        assert_eq!(order.loadout.cost, 250);
        assert!(spawner.produced.is_empty());
        assert!(!spawner.producing);
    }

    #[test]
    fn end_to_end_selects_carrier() {
        // One node worked by two extractors, no carriers yet.
        let mut spawner = FakeSpawner::idle(300);
        let out = planner().run(&mut spawner, &counts([2, 1, 1, 1]), &counts([2, 0, 1, 1]), 1);
        assert_eq!(out.order().map(|o| o.role), Some(Role::Carrier));
    }

    #[test]
    fn satisfied_when_demand_met() {
        let mut spawner = FakeSpawner::idle(300);
        let c = counts([2, 1, 1, 1]);
        assert_eq!(planner().run(&mut spawner, &c, &c, 1), SpawnOutcome::Satisfied);
    }
}
