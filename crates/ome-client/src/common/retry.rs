//! # Request retry policy
//!
//! Transport failures (connection refused, TLS handshake, timeouts) are retried a
//! bounded number of times. The wait between attempts follows either a fixed
//! interval or an exponential sequence capped at a maximum.
//!
//! Exponential sequence with the defaults: 1s, 2s, 4s, 8s, ... capped at 30s.

use std::time::Duration;

/// How the delay between two attempts grows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// Same delay before every retry
    Fixed(Duration),
    /// Doubles after each retry, starting at `initial`, never above `max`
    Exponential {
        /// Delay before the first retry
        initial: Duration,
        /// Upper bound of any single delay
        max: Duration,
    },
}

impl Default for Backoff {
    fn default() -> Self {
        Backoff::Exponential {
            initial: Duration::from_secs(1),
            max: Duration::from_secs(30),
        }
    }
}

/// Bounded retry configuration for the REST client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first one
    pub max_attempts: u32,
    /// Delay strategy between attempts
    pub backoff: Backoff,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Backoff::default(),
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries
    #[must_use]
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            backoff: Backoff::Fixed(Duration::ZERO),
        }
    }

    /// Create the stateful delay sequence for one request
    #[must_use]
    pub fn delays(&self) -> RetryDelays {
        RetryDelays {
            backoff: self.backoff,
            current: match self.backoff {
                Backoff::Fixed(d) => d,
                Backoff::Exponential { initial, .. } => initial,
            },
        }
    }
}

/// Delay sequence for a single request
///
/// Each call to `next_delay()` returns the wait before the next attempt and
/// advances the sequence.
#[derive(Debug, Clone)]
pub struct RetryDelays {
    backoff: Backoff,
    current: Duration,
}

impl RetryDelays {
    /// Get the next delay and advance the sequence
    pub fn next_delay(&mut self) -> Duration {
        let result = self.current;
        if let Backoff::Exponential { max, .. } = self.backoff {
            self.current = std::cmp::min(self.current.saturating_mul(2), max);
        }
        result
    }

    /// Reset the sequence to its first delay
    pub fn reset(&mut self) {
        self.current = match self.backoff {
            Backoff::Fixed(d) => d,
            Backoff::Exponential { initial, .. } => initial,
        };
    }
}
