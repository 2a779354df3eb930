//! Retry eligibility and exponential backoff.

use std::time::Duration;

use reqwest::Method;
use stakeadmin_domain::RetrySettings;

use super::pipeline::Failure;

/// GET, HEAD and OPTIONS; every other method is sent at most once.
pub fn is_idempotent(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
}

/// Outcome of a failed attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Wait `delay`, then send retry number `attempt` (1-based)
    Retry { attempt: u32, delay: Duration },
    GiveUp,
}

/// Bounded exponential backoff: `min(base * 2^(n-1), cap)` before retry `n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    budget: u32,
    base_delay: Duration,
    max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_settings(&RetrySettings::default())
    }
}

impl RetryPolicy {
    pub fn from_settings(settings: &RetrySettings) -> Self {
        Self {
            budget: settings.budget,
            base_delay: Duration::from_millis(settings.base_delay_ms),
            max_delay: Duration::from_millis(settings.max_delay_ms),
        }
    }

    /// Same backoff with a per-request budget, when one is given
    pub fn with_budget(self, budget: Option<u32>) -> Self {
        Self { budget: budget.unwrap_or(self.budget), ..self }
    }

    pub fn budget(&self) -> u32 {
        self.budget
    }

    /// Delay before retry number `attempt` (1-based; 0 is treated as 1)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let shift = attempt.saturating_sub(1).min(31);
        let multiplier = 1u32 << shift;
        self.base_delay.saturating_mul(multiplier).min(self.max_delay)
    }

    /// Decide what follows a failure after `retries_so_far` retries.
    ///
    /// Only transport faults (no response, timeout) on idempotent methods are
    /// retried; HTTP error responses never are.
    pub fn decide(&self, method: &Method, failure: &Failure, retries_so_far: u32) -> RetryDecision {
        let transient = matches!(failure, Failure::Transport(fault) if fault.is_retryable());
        if !transient || !is_idempotent(method) {
            return RetryDecision::GiveUp;
        }
        let attempt = retries_so_far.saturating_add(1);
        if attempt > self.budget {
            return RetryDecision::GiveUp;
        }
        RetryDecision::Retry { attempt, delay: self.delay_for(attempt) }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::errors::TransportFault;
    use crate::http::pipeline::HttpFailure;

    fn network() -> Failure {
        Failure::Transport(TransportFault::Network("connection refused".into()))
    }

    #[test]
    fn idempotent_methods() {
        assert!(is_idempotent(&Method::GET));
        assert!(is_idempotent(&Method::HEAD));
        assert!(is_idempotent(&Method::OPTIONS));
        for method in [Method::POST, Method::PUT, Method::PATCH, Method::DELETE] {
            assert!(!is_idempotent(&method), "{method} must not be retried");
        }
    }

    #[test]
    fn backoff_doubles_up_to_cap() {
        let policy = RetryPolicy::default();
        let delays: Vec<u64> =
            (1..=6).map(|n| u64::try_from(policy.delay_for(n).as_millis()).unwrap()).collect();
        assert_eq!(delays, vec![1000, 2000, 4000, 4000, 4000, 4000]);
        assert_eq!(policy.delay_for(0), Duration::from_millis(1000));
        assert_eq!(policy.delay_for(u32::MAX), Duration::from_millis(4000));
    }

    #[test]
    fn retries_until_budget_is_spent() {
        let policy = RetryPolicy::default();
        assert_eq!(
            policy.decide(&Method::GET, &network(), 0),
            RetryDecision::Retry { attempt: 1, delay: Duration::from_millis(1000) }
        );
        assert_eq!(
            policy.decide(&Method::GET, &network(), 1),
            RetryDecision::Retry { attempt: 2, delay: Duration::from_millis(2000) }
        );
        assert_eq!(policy.decide(&Method::GET, &network(), 2), RetryDecision::GiveUp);
    }

    #[test]
    fn timeouts_are_retried_for_idempotent_methods_only() {
        let timeout = Failure::Transport(TransportFault::Timeout("deadline".into()));
        let policy = RetryPolicy::default();
        assert!(matches!(policy.decide(&Method::HEAD, &timeout, 0), RetryDecision::Retry { .. }));
        assert_eq!(policy.decide(&Method::POST, &timeout, 0), RetryDecision::GiveUp);
        assert_eq!(policy.decide(&Method::DELETE, &network(), 0), RetryDecision::GiveUp);
    }

    #[test]
    fn http_errors_and_bad_requests_are_final() {
        let policy = RetryPolicy::default();
        let http = Failure::Http(HttpFailure::from_parts(503, None, HashMap::new(), ""));
        let invalid = Failure::Transport(TransportFault::InvalidRequest("bad url".into()));
        assert_eq!(policy.decide(&Method::GET, &http, 0), RetryDecision::GiveUp);
        assert_eq!(policy.decide(&Method::GET, &invalid, 0), RetryDecision::GiveUp);
    }

    #[test]
    fn per_request_budget_overrides_default() {
        let policy = RetryPolicy::default().with_budget(Some(0));
        assert_eq!(policy.decide(&Method::GET, &network(), 0), RetryDecision::GiveUp);
        assert_eq!(RetryPolicy::default().with_budget(None).budget(), 2);
    }
}
