//
// Copyright (c) 2024 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use crate::error::DynamoError;
use rand::Rng;
use std::time::Duration;

/// Controls how failed requests are retried.
///
/// Retries use exponential backoff with "full jitter": the pause before retry
/// `n` is a random duration between zero and `min(max_delay, base_delay * 2^n)`.
/// Only errors for which [`DynamoError::is_retryable()`] is true are retried, and
/// never past the request's timeout.
///
/// The default is 10 retries, a 25 millisecond base delay and a 20 second cap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    max_retries: u32,
    base_delay: Duration,
    max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_retries: 10,
            base_delay: Duration::from_millis(25),
            max_delay: Duration::from_secs(20),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration, max_delay: Duration) -> Self {
        RetryPolicy {
            max_retries,
            base_delay,
            max_delay,
        }
    }

    /// A policy that never retries.
    pub fn none() -> Self {
        RetryPolicy {
            max_retries: 0,
            ..Default::default()
        }
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }

    pub fn max_delay(&self) -> Duration {
        self.max_delay
    }

    pub(crate) fn should_retry(&self, err: &DynamoError, retries: u32) -> bool {
        retries < self.max_retries && err.is_retryable()
    }

    /// The upper bound of the pause before the given retry (zero-based).
    pub(crate) fn max_delay_for(&self, retries: u32) -> Duration {
        let factor = 1u32.checked_shl(retries.min(31)).unwrap_or(u32::MAX);
        match self.base_delay.checked_mul(factor) {
            Some(d) if d < self.max_delay => d,
            _ => self.max_delay,
        }
    }

    pub(crate) fn delay(&self, retries: u32) -> Duration {
        let cap = self.max_delay_for(retries).as_millis() as u64;
        Duration::from_millis(rand::thread_rng().gen_range(0..=cap))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn backoff_grows_to_cap() {
        let p = RetryPolicy::default();
        assert_eq!(p.max_delay_for(0), Duration::from_millis(25));
        assert_eq!(p.max_delay_for(1), Duration::from_millis(50));
        assert_eq!(p.max_delay_for(4), Duration::from_millis(400));
        assert_eq!(p.max_delay_for(10), Duration::from_secs(20));
        assert_eq!(p.max_delay_for(40), Duration::from_secs(20));
        for i in 0..12 {
            assert!(p.delay(i) <= p.max_delay_for(i));
        }
    }

    #[test]
    fn only_retryable_errors_within_budget() {
        let p = RetryPolicy::new(2, Duration::from_millis(1), Duration::from_millis(5));
        let throttled = DynamoError::new(ErrorCode::ProvisionedThroughputExceeded, "slow down");
        let bad = DynamoError::new(ErrorCode::Validation, "bad");
        assert!(p.should_retry(&throttled, 0));
        assert!(p.should_retry(&throttled, 1));
        assert!(!p.should_retry(&throttled, 2));
        assert!(!p.should_retry(&bad, 0));
        assert!(!RetryPolicy::none().should_retry(&throttled, 0));
    }
}
