//! Loop counters

/// Running totals for the refresh loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RefreshStats {
    /// Cycles attempted
    pub cycles: u32,
    /// Cycles that failed
    pub failures: u32,
    /// Failures since the last successful cycle
    pub consecutive_failures: u32,
}

impl RefreshStats {
    pub const fn new() -> Self {
        Self {
            cycles: 0,
            failures: 0,
            consecutive_failures: 0,
        }
    }

    pub fn record_success(&mut self) {
        self.cycles = self.cycles.wrapping_add(1);
        self.consecutive_failures = 0;
    }

    pub fn record_failure(&mut self) {
        self.cycles = self.cycles.wrapping_add(1);
        self.failures = self.failures.wrapping_add(1);
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
    }

    /// Cycles that completed
    pub const fn successes(&self) -> u32 {
        self.cycles.wrapping_sub(self.failures)
    }
}
