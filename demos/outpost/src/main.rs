//! outpost — drives the colony core against an in-memory sandbox room.
//!
//! Usage: `outpost [config.json] [ticks] [state.json] [tiers.csv]`
//!
//! Logging is controlled with `RUST_LOG`, e.g. `RUST_LOG=info` for per-tick
//! summaries or `RUST_LOG=cb_mobility=debug` for movement escalations.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;

use cb_colony::{ColonyBuilder, LoggingObserver, SandboxWorld, StateStore};
use cb_core::{ColonyConfig, Role, Tick};
use cb_spatial::GridPathfinder;
use cb_spawn::load_tiers_csv;

// ── Constants ─────────────────────────────────────────────────────────────────

const DEFAULT_TICKS:  u64 = 1_500;
const DEFAULT_SEED:   u64 = 42;
const SUMMARY_EVERY:  u64 = 100;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = match args.first() {
        Some(path) => ColonyConfig::load(path.as_ref())
            .with_context(|| format!("loading config from {path}"))?,
        None => ColonyConfig { seed: Some(DEFAULT_SEED), ..ColonyConfig::default() },
    };
    let ticks: u64 = match args.get(1) {
        Some(n) => n.parse().with_context(|| format!("invalid tick count {n:?}"))?,
        None => DEFAULT_TICKS,
    };
    let state_path = args.get(2).map(PathBuf::from);

    // ── Colony ────────────────────────────────────────────────────────────────
    let mut world = SandboxWorld::outpost();
    let mut builder = ColonyBuilder::new(GridPathfinder::new(world.terrain().clone())).config(config);
    if let Some(path) = args.get(3) {
        let composer = load_tiers_csv(path.as_ref())
            .with_context(|| format!("loading loadout tiers from {path}"))?;
        builder = builder.composer(composer);
    }
    let colony = builder.build()?;

    let mut state = match &state_path {
        Some(path) if path.exists() => StateStore::load(path)
            .with_context(|| format!("loading state from {}", path.display()))?,
        _ => StateStore::new(),
    };

    // ── Run ───────────────────────────────────────────────────────────────────
    let mut observer = LoggingObserver::new(SUMMARY_EVERY);
    let started = Instant::now();
    let mut last = None;
    for t in 0..ticks {
        last = Some(colony.step(Tick(t), &mut world, &mut state, &mut observer)?);
        world.end_tick();
    }
    let elapsed = started.elapsed();

    if let Some(report) = last {
        println!("ran {ticks} ticks in {:.2?}", elapsed);
        for role in Role::ALL {
            println!(
                "  {:<10} actual {:>3}  desired {:>3}",
                role.as_str(),
                report.actual[role],
                report.desired[role],
            );
        }
        println!("  sources tracked: {}", state.ledger.len());
    }

    if let Some(path) = state_path {
        state
            .save(&path)
            .with_context(|| format!("saving state to {}", path.display()))?;
        info!(path = %path.display(), "state saved");
    }
    Ok(())
}
