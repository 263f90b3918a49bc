// SPDX-FileCopyrightText: 2026 EchoOS Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bounded exponential backoff.

use std::time::Duration;

use echoos_config::model::RetryConfig;

/// Attempt limit and wait schedule for retried calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub multiplier: Duration,
    pub min_wait: Duration,
    pub max_wait: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            multiplier: Duration::from_secs(config.multiplier_secs),
            min_wait: Duration::from_secs(config.min_wait_secs),
            max_wait: Duration::from_secs(config.max_wait_secs),
        }
    }

    /// The wait after failed attempt `attempt` (1-based): `multiplier * 2^(attempt - 1)`,
    /// clamped to `[min_wait, max_wait]`.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(31);
        let raw = self.multiplier.saturating_mul(1u32 << exponent);
        raw.clamp(self.min_wait, self.max_wait.max(self.min_wait))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}
