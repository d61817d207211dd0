//! Reconnect policy consumed by the transport collaborator.

use std::time::Duration;

/// Parameters bounding the transport's automatic reconnection.
///
/// Immutable for the lifetime of one connection attempt. The default is the
/// gritty contract: effectively unbounded attempts with the delay between
/// attempts capped at five seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconnectPolicy {
    /// Maximum number of consecutive reconnection attempts.
    pub max_attempts: u32,
    /// Delay before the first reconnection attempt.
    pub initial_delay: Duration,
    /// Ceiling on the delay between attempts.
    pub delay_cap: Duration,
    /// Jitter factor in `0.0..=1.0` spread around each computed delay.
    pub randomization: f64,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            max_attempts: u32::MAX,
            initial_delay: Duration::from_millis(1000),
            delay_cap: Duration::from_millis(5000),
            randomization: 0.5,
        }
    }
}

impl ReconnectPolicy {
    /// Base delay before reconnection attempt `attempt` (1-based):
    /// exponential growth from `initial_delay`, truncated at `delay_cap`.
    /// Jitter is applied by the transport on top of this value.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        // The shift is clamped so large attempt counts cannot overflow.
        let exp = attempt.saturating_sub(1).min(16);
        let base = self.initial_delay.saturating_mul(1u32 << exp);
        base.min(self.delay_cap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_contract() {
        let policy = ReconnectPolicy::default();
        assert_eq!(policy.max_attempts, u32::MAX);
        assert_eq!(policy.delay_cap, Duration::from_millis(5000));
    }

    #[test]
    fn delay_grows_then_caps() {
        let policy = ReconnectPolicy::default();
        assert_eq!(policy.delay_for(1), Duration::from_millis(1000));
        assert_eq!(policy.delay_for(2), Duration::from_millis(2000));
        assert_eq!(policy.delay_for(3), Duration::from_millis(4000));
        assert_eq!(policy.delay_for(4), Duration::from_millis(5000));
        assert_eq!(policy.delay_for(100), Duration::from_millis(5000));
    }

    #[test]
    fn huge_attempt_counts_do_not_overflow() {
        let policy = ReconnectPolicy::default();
        assert_eq!(policy.delay_for(u32::MAX), policy.delay_cap);
    }
}
