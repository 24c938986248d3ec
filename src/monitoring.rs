//! Continuous monitoring: repeat the full check at a fixed cadence.
//!
//! The sampler only counts completed cycles; per-sample reports are
//! dropped. Cancellation is cooperative and takes effect at the next
//! interval boundary; a check already in flight runs to completion.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::Notify;
use tokio::time::{interval_at, sleep_until, Instant, MissedTickBehavior};

use crate::check::CheckRunner;
use crate::core::{EscopeError, Result};

/// How a sampling run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SamplingOutcome {
    Completed,
    Cancelled,
}

/// Outcome of a bounded monitoring run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonitoringResult {
    pub sample_count: usize,
    pub outcome: SamplingOutcome,
}

/// Stops a running [`ContinuousSampler`]. Cheap to clone.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    shutdown: Arc<AtomicBool>,
    wake: Arc<Notify>,
}

impl CancelHandle {
    /// Request cancellation. A sampler that was cancelled stays cancelled.
    pub fn cancel(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
        self.wake.notify_one();
    }

    pub fn is_cancelled(&self) -> bool {
        self.shutdown.load(Ordering::Relaxed)
    }
}

/// Runs the full check repeatedly for a bounded window.
pub struct ContinuousSampler {
    runner: CheckRunner,
    default_interval: Duration,
    shutdown: Arc<AtomicBool>,
    wake: Arc<Notify>,
}

impl ContinuousSampler {
    pub fn new(runner: CheckRunner, default_interval: Duration) -> Self {
        Self {
            runner,
            default_interval,
            shutdown: Arc::new(AtomicBool::new(false)),
            wake: Arc::new(Notify::new()),
        }
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            shutdown: Arc::clone(&self.shutdown),
            wake: Arc::clone(&self.wake),
        }
    }

    /// Parse both spans, then sample until `duration` elapses or the run is
    /// cancelled. An empty `interval` uses the configured default.
    ///
    /// Malformed input is rejected before the first sample.
    pub async fn start(&self, duration: &str, interval: &str) -> Result<MonitoringResult> {
        let duration = parse_duration(duration)?;
        let interval = if interval.trim().is_empty() {
            self.default_interval
        } else {
            parse_interval(interval)?
        };

        Ok(self.run_for(duration, interval).await)
    }

    /// Sample at `interval` until `duration` has elapsed.
    ///
    /// Samples start at t = 0, interval, 2 × interval and so on; a tick that
    /// lands exactly on the end of the window is not sampled, so 10s at 2s
    /// yields five samples.
    pub async fn run_for(&self, duration: Duration, interval: Duration) -> MonitoringResult {
        let started = Instant::now();
        let deadline = started + duration;
        let mut ticker = interval_at(started, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(
            duration = %humantime::format_duration(duration),
            interval = %humantime::format_duration(interval),
            "Starting continuous monitoring"
        );

        let mut sample_count = 0;
        let outcome = loop {
            if self.is_cancelled() {
                break SamplingOutcome::Cancelled;
            }

            tokio::select! {
                biased;
                _ = self.wake.notified() => {},
                _ = sleep_until(deadline) => {},
                _ = ticker.tick() => {},
            }

            if self.is_cancelled() {
                break SamplingOutcome::Cancelled;
            }
            if Instant::now() >= deadline {
                break SamplingOutcome::Completed;
            }

            let report = self.runner.run().await;
            sample_count += 1;
            tracing::debug!(sample = sample_count, failed = report.failures().len(), "Sample collected");
        };

        tracing::info!(samples = sample_count, ?outcome, "Continuous monitoring finished");
        MonitoringResult {
            sample_count,
            outcome,
        }
    }

    fn is_cancelled(&self) -> bool {
        self.shutdown.load(Ordering::Relaxed)
    }
}

/// Parse a positive monitoring window such as `1m` or `1h`.
pub fn parse_duration(text: &str) -> Result<Duration> {
    parse_positive(text).ok_or_else(|| EscopeError::InvalidDuration(text.to_string()))
}

/// Parse a positive sampling interval such as `2s` or `5s`.
pub fn parse_interval(text: &str) -> Result<Duration> {
    parse_positive(text).ok_or_else(|| EscopeError::InvalidInterval(text.to_string()))
}

fn parse_positive(text: &str) -> Option<Duration> {
    humantime::parse_duration(text.trim())
        .ok()
        .filter(|d| !d.is_zero())
}
