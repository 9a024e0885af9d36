use serde::{Deserialize, Serialize};

/// Running counters for a sequencer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequencerStats {
    /// Ids accepted into the ring (in range)
    pub received: u64,
    /// Ids that extended the confirmed prefix
    pub in_order: u64,
    /// In-range ids that arrived while active but out of order
    pub out_of_order: u64,
    /// Ids past capacity, dropped
    pub rejected: u64,
    /// Fetch events raised
    pub fetches_emitted: u64,
    /// Total positions across all fetch events
    pub positions_requested: u64,
    /// Times the ring wrapped and was cleared
    pub overflows: u64,
}

impl SequencerStats {
    /// Share of reconciled arrivals that were in order, as a percentage
    pub fn in_order_rate(&self) -> f64 {
        let reconciled = self.in_order + self.out_of_order;
        if reconciled == 0 {
            return 100.0;
        }
        (self.in_order as f64 / reconciled as f64) * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_order_rate() {
        let stats = SequencerStats {
            in_order: 3,
            out_of_order: 1,
            ..Default::default()
        };
        assert!((stats.in_order_rate() - 75.0).abs() < f64::EPSILON);
        assert!((SequencerStats::default().in_order_rate() - 100.0).abs() < f64::EPSILON);
    }
}
