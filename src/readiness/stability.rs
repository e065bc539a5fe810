use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::errors::{PilotError, PilotResult};
use crate::readiness::polling::{wait_for, Condition, PollOptions, PollOutcome};

/// Consecutive equal, non-zero samples needed before a page counts as rendered.
pub const MIN_STABLE_SAMPLES: u32 = 3;

#[derive(Debug, Clone)]
pub struct StabilityOptions {
    pub interval: Duration,
    /// Zero waits until stable with no upper bound.
    pub timeout: Duration,
    /// Defaults to false: a page that never settles resolves as [`PollOutcome::TimedOut`].
    pub reject_on_timeout: bool,
}

impl Default for StabilityOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(200),
            timeout: Duration::from_millis(5000),
            reject_on_timeout: false,
        }
    }
}

impl StabilityOptions {
    pub fn new(interval: Duration, timeout: Duration) -> Self {
        Self {
            interval,
            timeout,
            reject_on_timeout: false,
        }
    }

    pub fn strict(mut self) -> Self {
        self.reject_on_timeout = true;
        self
    }

    /// `ceil(timeout / interval)`, so a timeout shorter than one interval still samples once.
    pub fn max_checks(&self) -> PilotResult<u32> {
        let interval = self.interval.as_nanos();
        if interval == 0 {
            return Err(PilotError::Config(
                "stability interval must be non-zero".into(),
            ));
        }
        let checks = self.timeout.as_nanos().div_ceil(interval);
        Ok(u32::try_from(checks).unwrap_or(u32::MAX))
    }

    fn poll_options(&self) -> PilotResult<PollOptions> {
        Ok(PollOptions {
            interval: self.interval,
            max_checks: self.max_checks()?,
            reject_on_timeout: self.reject_on_timeout,
        })
    }
}

/// Per-call stability state.
#[derive(Debug, Default, Clone)]
pub struct StabilityTracker {
    last_measurement: u64,
    consecutive_stable: u32,
}

impl StabilityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one sample; returns true once it is the third consecutive repeat of a
    /// non-zero measurement.
    pub fn observe(&mut self, current: u64) -> bool {
        tracing::debug!(last = self.last_measurement, current, "stability sample");

        if self.last_measurement != 0 && current == self.last_measurement {
            self.consecutive_stable += 1;
        } else {
            self.consecutive_stable = 0;
        }

        if self.consecutive_stable >= MIN_STABLE_SAMPLES {
            tracing::info!(measurement = current, "measurement stable, assuming fully rendered");
            return true;
        }

        self.last_measurement = current;
        false
    }

    pub fn consecutive_stable(&self) -> u32 {
        self.consecutive_stable
    }
}

struct StabilityProbe<M> {
    measure: M,
    tracker: StabilityTracker,
}

#[async_trait]
impl<M, Fut> Condition for StabilityProbe<M>
where
    M: FnMut() -> Fut + Send,
    Fut: Future<Output = PilotResult<u64>> + Send + 'static,
{
    async fn check(&mut self) -> PilotResult<bool> {
        let current = (self.measure)().await?;
        Ok(self.tracker.observe(current))
    }
}

/// Polls `measure` (for example, a count of matched elements) until it stops changing.
pub async fn wait_till_stable<M, Fut>(
    measure: M,
    options: &StabilityOptions,
    cancel: &CancellationToken,
) -> PilotResult<PollOutcome>
where
    M: FnMut() -> Fut + Send,
    Fut: Future<Output = PilotResult<u64>> + Send + 'static,
{
    let poll = options.poll_options()?;
    let probe = StabilityProbe {
        measure,
        tracker: StabilityTracker::new(),
    };
    let outcome = wait_for(probe, &poll, cancel).await?;
    if outcome == PollOutcome::TimedOut {
        tracing::warn!(
            timeout_ms = options.timeout.as_millis() as u64,
            "page never stabilised, continuing anyway"
        );
    }
    Ok(outcome)
}
