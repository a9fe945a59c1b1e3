//! CSV tier-table loader.
//!
//! # CSV format
//!
//! One row per tier.  Rows for a role must appear in increasing cost order;
//! `parts` is a space-separated list.
//!
//! ```csv
//! role,cost,parts
//! extractor,250,work work move
//! extractor,550,work work work work work move
//! carrier,150,carry carry move
//! ```
//!
//! `cost` must equal the summed cost of `parts`.  Roles absent from the file
//! keep their built-in tiers.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use cb_core::{Role, RoleMap};

use crate::{Loadout, LoadoutComposer, Part, SpawnError, TierTable};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct TierRecord {
    role:  String,
    cost:  u32,
    parts: String,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load tier overrides from a CSV file on top of the built-in tables.
pub fn load_tiers_csv(path: &Path) -> Result<LoadoutComposer, SpawnError> {
    let file = std::fs::File::open(path)?;
    load_tiers_reader(file)
}

/// Like [`load_tiers_csv`] but accepts any `Read` source.
pub fn load_tiers_reader<R: Read>(reader: R) -> Result<LoadoutComposer, SpawnError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut by_role: RoleMap<Vec<Loadout>> = RoleMap::default();

    for result in csv_reader.deserialize::<TierRecord>() {
        let row = result.map_err(|e| SpawnError::Parse(e.to_string()))?;
        let role: Role = row.role.parse().map_err(|e| SpawnError::Parse(format!("{e}")))?;
        let loadout = parse_parts(&row.parts).map(Loadout::new)?;
        if loadout.cost != row.cost {
            return Err(SpawnError::CostMismatch {
                role,
                declared: row.cost,
                computed: loadout.cost,
            });
        }
        by_role[role].push(loadout);
    }

    let mut composer = LoadoutComposer::default();
    for role in Role::ALL {
        let tiers = std::mem::take(&mut by_role[role]);
        if !tiers.is_empty() {
            composer.set_table(role, TierTable::new(role, tiers)?);
        }
    }
    Ok(composer)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn parse_parts(s: &str) -> Result<Vec<Part>, SpawnError> {
    let parts: Vec<Part> = s.split_whitespace().map(str::parse).collect::<Result<_, _>>()?;
    if parts.is_empty() {
        return Err(SpawnError::Parse("tier has no parts".into()));
    }
    Ok(parts)
}
