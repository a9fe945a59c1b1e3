//! Economic flow estimation: how many carriers a source needs.

use cb_core::EconomyPolicy;

use crate::SourceRecord;

/// Carriers needed to move `workers × rate` energy per tick over a round
/// trip of `2 × distance` steps with `capacity` per carrier.
///
/// `ceil(workers × rate × 2 × distance / capacity)`.  A capacity of 0 is
/// treated as 1.
pub fn required_carriers(workers: u32, rate: u32, distance: u32, capacity: u32) -> u32 {
    let flow = u64::from(workers) * u64::from(rate) * 2 * u64::from(distance);
    let carriers = flow.div_ceil(u64::from(capacity.max(1)));
    u32::try_from(carriers).unwrap_or(u32::MAX)
}

/// Applies [`required_carriers`] to ledger records under an [`EconomyPolicy`].
#[derive(Clone, Copy, Debug)]
pub struct FlowEstimator<'a> {
    policy: &'a EconomyPolicy,
}

impl<'a> FlowEstimator<'a> {
    pub fn new(policy: &'a EconomyPolicy) -> Self {
        Self { policy }
    }

    /// Distance used for `record`: measured, or the policy default.
    pub fn distance(&self, record: &SourceRecord) -> u32 {
        record.distance.unwrap_or(self.policy.default_distance)
    }

    /// Carriers needed for one source; at least 1 if anyone works it.
    pub fn carriers_for(&self, record: &SourceRecord) -> u32 {
        let n = required_carriers(
            record.assigned_workers,
            self.policy.extraction_rate,
            self.distance(record),
            self.policy.carrier_capacity,
        );
        if record.assigned_workers > 0 { n.max(1) } else { n }
    }

    pub fn total_carriers<'r>(&self, records: impl IntoIterator<Item = &'r SourceRecord>) -> u32 {
        records
            .into_iter()
            .fold(0u32, |acc, r| acc.saturating_add(self.carriers_for(r)))
    }
}
