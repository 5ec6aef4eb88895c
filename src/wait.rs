//! Named wait durations for the provisioning and teardown sequences
//!
//! The orchestrator compensates for eventual consistency in scheduling and
//! control-plane propagation with fixed delays where no stronger readiness
//! signal exists. Gathering them here keeps every sleep named and lets
//! tests zero them out.

use std::time::Duration;

/// Wait durations used across setup and teardown.
#[derive(Clone, Debug)]
pub struct WaitPolicy {
    /// Pause after namespace creation, before dependent operations
    pub namespace_propagation: Duration,
    /// Pause after manifest application, before polling pod readiness
    pub scheduler_settle: Duration,
    /// Bound on the pod readiness wait; expiry is a terminal setup failure
    pub readiness_timeout: Duration,
    /// Pause at the end of setup to let the environment settle
    pub post_setup_settle: Duration,
    /// Pause after dispatching the background namespace deletion, so the
    /// call leaves the process before the caller may exit
    pub deletion_dispatch_grace: Duration,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            namespace_propagation: Duration::from_secs(1),
            scheduler_settle: Duration::from_secs(4),
            readiness_timeout: Duration::from_secs(120),
            post_setup_settle: Duration::from_secs(10),
            deletion_dispatch_grace: Duration::from_millis(100),
        }
    }
}

impl WaitPolicy {
    /// A policy with every wait zeroed, for tests driving mocks.
    pub fn instant() -> Self {
        Self {
            namespace_propagation: Duration::ZERO,
            scheduler_settle: Duration::ZERO,
            readiness_timeout: Duration::ZERO,
            post_setup_settle: Duration::ZERO,
            deletion_dispatch_grace: Duration::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_waits_match_production_values() {
        let waits = WaitPolicy::default();
        assert_eq!(waits.namespace_propagation, Duration::from_secs(1));
        assert_eq!(waits.scheduler_settle, Duration::from_secs(4));
        assert_eq!(waits.readiness_timeout, Duration::from_secs(120));
        assert_eq!(waits.post_setup_settle, Duration::from_secs(10));
        assert_eq!(waits.deletion_dispatch_grace, Duration::from_millis(100));
    }

    #[test]
    fn test_instant_policy_is_all_zero() {
        let waits = WaitPolicy::instant();
        assert_eq!(waits.namespace_propagation, Duration::ZERO);
        assert_eq!(waits.scheduler_settle, Duration::ZERO);
        assert_eq!(waits.readiness_timeout, Duration::ZERO);
        assert_eq!(waits.post_setup_settle, Duration::ZERO);
        assert_eq!(waits.deletion_dispatch_grace, Duration::ZERO);
    }
}
