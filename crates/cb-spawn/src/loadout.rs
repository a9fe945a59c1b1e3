//! Capability loadouts, per-role tier tables, and the loadout composer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use cb_core::{Role, RoleMap};

use crate::SpawnError;

// ── Part ──────────────────────────────────────────────────────────────────────

/// One capability slot of an agent's body.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Part {
    Work,
    Carry,
    Move,
    Tough,
    Claim,
}

impl Part {
    pub fn cost(self) -> u32 {
        match self {
            Part::Work  => 100,
            Part::Carry => 50,
            Part::Move  => 50,
            Part::Tough => 10,
            Part::Claim => 600,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Part::Work  => "work",
            Part::Carry => "carry",
            Part::Move  => "move",
            Part::Tough => "tough",
            Part::Claim => "claim",
        }
    }
}

impl fmt::Display for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Part {
    type Err = SpawnError;

    fn from_str(s: &str) -> Result<Part, SpawnError> {
        match s.trim() {
            "work"  => Ok(Part::Work),
            "carry" => Ok(Part::Carry),
            "move"  => Ok(Part::Move),
            "tough" => Ok(Part::Tough),
            "claim" => Ok(Part::Claim),
            other   => Err(SpawnError::Parse(format!("unknown part {other:?}"))),
        }
    }
}

// ── Loadout ───────────────────────────────────────────────────────────────────

/// A fixed bundle of parts and what it costs to produce.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loadout {
    pub cost:  u32,
    pub parts: Vec<Part>,
}

impl Loadout {
    pub fn new(parts: Vec<Part>) -> Self {
        let cost = parts.iter().map(|p| p.cost()).sum();
        Self { cost, parts }
    }

    /// `n` copies of each `(part, n)` in order.
    pub fn of(counts: &[(Part, usize)]) -> Self {
        Self::new(
            counts
                .iter()
                .flat_map(|&(part, n)| std::iter::repeat_n(part, n))
                .collect(),
        )
    }

    pub fn count(&self, part: Part) -> usize {
        self.parts.iter().filter(|&&p| p == part).count()
    }
}

impl fmt::Display for Loadout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[", self.cost)?;
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{part}")?;
        }
        f.write_str("]")
    }
}

// ── TierTable ─────────────────────────────────────────────────────────────────

/// A role's loadouts ordered by strictly increasing cost.  Never empty.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TierTable {
    tiers: Vec<Loadout>,
}

impl TierTable {
    pub fn new(role: Role, tiers: Vec<Loadout>) -> Result<Self, SpawnError> {
        if tiers.is_empty() {
            return Err(SpawnError::InvalidTiers { role, reason: "no tiers".into() });
        }
        if let Some(w) = tiers.windows(2).find(|w| w[1].cost <= w[0].cost) {
            return Err(SpawnError::InvalidTiers {
                role,
                reason: format!("cost {} does not increase on {}", w[1].cost, w[0].cost),
            });
        }
        Ok(Self { tiers })
    }

    pub fn tiers(&self) -> &[Loadout] {
        &self.tiers
    }

    pub fn cheapest(&self) -> &Loadout {
        &self.tiers[0]
    }

    /// The richest tier costing at most `budget`, or the cheapest tier if
    /// none is affordable.
    pub fn richest_within(&self, budget: u32) -> &Loadout {
        self.tiers
            .iter()
            .rev()
            .find(|t| t.cost <= budget)
            .unwrap_or(self.cheapest())
    }
}

// ── LoadoutComposer ───────────────────────────────────────────────────────────

/// Picks a loadout for a role from that role's [`TierTable`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadoutComposer {
    tables: RoleMap<TierTable>,
}

impl LoadoutComposer {
    pub fn new(tables: RoleMap<TierTable>) -> Self {
        Self { tables }
    }

    pub fn table(&self, role: Role) -> &TierTable {
        &self.tables[role]
    }

    pub fn set_table(&mut self, role: Role, table: TierTable) {
        self.tables[role] = table;
    }

    pub fn compose(&self, role: Role, budget: u32) -> &Loadout {
        self.tables[role].richest_within(budget)
    }
}

impl Default for LoadoutComposer {
    /// Built-in tiers.
    fn default() -> Self {
        use Part::*;
        let tables = RoleMap::from_fn(|role| {
            let tiers = match role {
                Role::Extractor => vec![
                    Loadout::of(&[(Work, 2), (Move, 1)]),
                    Loadout::of(&[(Work, 4), (Move, 2)]),
                    Loadout::of(&[(Work, 5), (Move, 3)]),
                ],
                Role::Carrier => vec![
                    Loadout::of(&[(Carry, 2), (Move, 1)]),
                    Loadout::of(&[(Carry, 4), (Move, 2)]),
                    Loadout::of(&[(Carry, 6), (Move, 3)]),
                    Loadout::of(&[(Carry, 8), (Move, 4)]),
                ],
                Role::Scout => vec![
                    Loadout::of(&[(Move, 1)]),
                    Loadout::of(&[(Tough, 2), (Move, 2)]),
                ],
                Role::Sustainer => vec![
                    Loadout::of(&[(Work, 1), (Carry, 1), (Move, 1)]),
                    Loadout::of(&[(Work, 2), (Carry, 2), (Move, 2)]),
                    Loadout::of(&[(Work, 4), (Carry, 2), (Move, 3)]),
                ],
            };
            TierTable { tiers }
        });
        Self { tables }
    }
}
