//! Request numbering and stale response rejection

use std::sync::atomic::{AtomicU64, Ordering};

/// Backend endpoint a request targets. Sequences are independent per endpoint.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, strum::Display)]
pub enum Endpoint {
    Environment,
    Prediction,
}

/// Hands out strictly increasing request numbers, starting at 1.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    environment: AtomicU64,
    prediction: AtomicU64,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Numbers the next request to `endpoint`.
    pub fn next(&self, endpoint: Endpoint) -> u64 {
        self.counter(endpoint).fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Number of the most recently issued request, 0 if none.
    pub fn last_issued(&self, endpoint: Endpoint) -> u64 {
        self.counter(endpoint).load(Ordering::SeqCst)
    }

    fn counter(&self, endpoint: Endpoint) -> &AtomicU64 {
        match endpoint {
            Endpoint::Environment => &self.environment,
            Endpoint::Prediction => &self.prediction,
        }
    }
}

/// Remembers the newest applied request per endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FreshnessGuard {
    environment: u64,
    prediction: u64,
}

impl FreshnessGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepts `seq` if it is newer than everything applied so far and records
    /// it. Only call this for responses that are about to be applied.
    pub fn admit(&mut self, endpoint: Endpoint, seq: u64) -> bool {
        let applied = self.applied_mut(endpoint);
        if seq > *applied {
            *applied = seq;
            true
        } else {
            false
        }
    }

    /// Whether a response numbered `seq` would still be accepted.
    pub fn is_fresh(&self, endpoint: Endpoint, seq: u64) -> bool {
        seq > self.last_applied(endpoint)
    }

    pub fn last_applied(&self, endpoint: Endpoint) -> u64 {
        match endpoint {
            Endpoint::Environment => self.environment,
            Endpoint::Prediction => self.prediction,
        }
    }

    fn applied_mut(&mut self, endpoint: Endpoint) -> &mut u64 {
        match endpoint {
            Endpoint::Environment => &mut self.environment,
            Endpoint::Prediction => &mut self.prediction,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequences_are_per_endpoint() {
        let sequencer = RequestSequencer::new();
        assert_eq!(sequencer.next(Endpoint::Environment), 1);
        assert_eq!(sequencer.next(Endpoint::Environment), 2);
        assert_eq!(sequencer.next(Endpoint::Prediction), 1);
        assert_eq!(sequencer.last_issued(Endpoint::Environment), 2);
    }

    #[test]
    fn test_guard_rejects_older_and_repeated_sequences() {
        let mut guard = FreshnessGuard::new();
        assert!(guard.admit(Endpoint::Environment, 2));
        assert!(!guard.admit(Endpoint::Environment, 1));
        assert!(!guard.admit(Endpoint::Environment, 2));
        assert!(guard.admit(Endpoint::Environment, 3));

        // The other endpoint is unaffected
        assert!(guard.is_fresh(Endpoint::Prediction, 1));
        assert_eq!(guard.last_applied(Endpoint::Environment), 3);
    }
}
