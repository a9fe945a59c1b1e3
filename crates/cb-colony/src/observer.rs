//! Colony observer trait for progress reporting.

use tracing::info;

use cb_core::Tick;

use crate::TickReport;

/// Callbacks invoked by [`Colony::step`][crate::Colony::step] around each tick.
///
/// All methods default to no-ops.
pub trait ColonyObserver {
    fn on_tick_start(&mut self, _tick: Tick) {}

    fn on_tick_end(&mut self, _tick: Tick, _report: &TickReport) {}
}

/// A [`ColonyObserver`] that does nothing.
pub struct NoopObserver;

impl ColonyObserver for NoopObserver {}

/// Logs a one-line summary every `every` ticks.
pub struct LoggingObserver {
    pub every: u64,
}

impl LoggingObserver {
    pub fn new(every: u64) -> Self {
        Self { every: every.max(1) }
    }
}

impl ColonyObserver for LoggingObserver {
    fn on_tick_end(&mut self, tick: Tick, report: &TickReport) {
        if tick.0 % self.every != 0 {
            return;
        }
        info!(
            %tick,
            agents   = report.agents,
            actual   = %report.actual,
            desired  = %report.desired,
            stepped  = report.movement.stepped,
            blocked  = report.movement.blocked,
            spawn    = ?report.spawn,
            "tick summary"
        );
    }
}
