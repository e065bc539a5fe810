use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::errors::{PilotError, PilotResult};

/// Something that can be sampled until it holds.
///
/// Takes `&mut self` so a condition may carry state between samples; the engine
/// never runs two checks of one condition at the same time.
#[async_trait]
pub trait Condition: Send {
    async fn check(&mut self) -> PilotResult<bool>;
}

#[async_trait]
impl<F, Fut> Condition for F
where
    F: FnMut() -> Fut + Send,
    Fut: Future<Output = PilotResult<bool>> + Send + 'static,
{
    async fn check(&mut self) -> PilotResult<bool> {
        (self)().await
    }
}

#[derive(Debug, Clone)]
pub struct PollOptions {
    pub interval: Duration,
    /// Number of false samples tolerated. 0 polls until the condition holds.
    pub max_checks: u32,
    /// On exhausting `max_checks`: `true` fails with `Timeout`, `false` returns `TimedOut`.
    pub reject_on_timeout: bool,
}

impl PollOptions {
    pub fn new(interval: Duration, max_checks: u32) -> Self {
        Self {
            interval,
            max_checks,
            reject_on_timeout: true,
        }
    }

    pub fn best_effort(mut self) -> Self {
        self.reject_on_timeout = false;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    Resolved,
    /// Checks ran out in best-effort mode.
    TimedOut,
}

impl PollOutcome {
    pub fn is_resolved(self) -> bool {
        matches!(self, PollOutcome::Resolved)
    }
}

/// Samples `condition` once per `interval` until it returns true or the check budget runs out.
///
/// The first sample happens one interval after the call. Each sample is awaited before the
/// next sleep starts, so only one timer is ever pending. Dropping the returned future drops
/// that timer; cancelling `cancel` ends the wait with [`PilotError::Cancelled`], including
/// while a check is still in flight.
pub async fn wait_for<C>(
    mut condition: C,
    options: &PollOptions,
    cancel: &CancellationToken,
) -> PilotResult<PollOutcome>
where
    C: Condition,
{
    let mut checks: u32 = 0;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::debug!(checks, "poll cancelled");
                return Err(PilotError::Cancelled);
            }
            _ = tokio::time::sleep(options.interval) => {}
        }

        let met = tokio::select! {
            _ = cancel.cancelled() => {
                tracing::debug!(checks, "poll cancelled during check");
                return Err(PilotError::Cancelled);
            }
            met = condition.check() => met?,
        };
        if met {
            tracing::debug!(checks = checks.saturating_add(1), "condition met");
            return Ok(PollOutcome::Resolved);
        }

        checks = checks.saturating_add(1);
        if options.max_checks != 0 && checks >= options.max_checks {
            if options.reject_on_timeout {
                tracing::warn!(checks, "timed out waiting for condition");
                return Err(PilotError::Timeout { checks });
            }
            tracing::debug!(checks, "check budget exhausted, resolving anyway");
            return Ok(PollOutcome::TimedOut);
        }
    }
}
